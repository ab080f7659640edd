//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 각 어댑터 crate가 이 trait들을 구현하며,
//! `wxwatch-app`에서 `Arc<dyn T>`로 샘플링 드라이버에 주입한다.
//!
//! 모든 포트는 "없음"을 `Ok(None)` / 빈 `Vec`으로 표현한다.
//! `Err`는 협력자 장애이며, 드라이버가 "없음"으로 낮춰서 분류기에 넘긴다.

pub mod monitor;
pub mod ocr_provider;
pub mod storage;
pub mod vision;
