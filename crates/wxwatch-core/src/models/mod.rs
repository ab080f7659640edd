//! WXWATCH 도메인 모델.
//!
//! 샘플링 사이클 한 번 안에서 생성·소비·폐기되는 데이터 구조체와,
//! 사이클 간에 유일하게 남는 상태 행(`StatusRecord`)을 정의한다.

pub mod frame;
pub mod geometry;
pub mod status;
pub mod text;
