//! # wxwatch-app
//!
//! 샘플링 사이클 드라이버와 라이프사이클 관리.
//! 바이너리(`wxwatch`)는 이 모듈들에 어댑터를 주입해 실행한다.

pub mod lifecycle;
pub mod sampler;
