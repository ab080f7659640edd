//! # wxwatch-core
//!
//! WXWATCH 도메인 모델, 포트(trait) 정의, 에러 타입, 상태 분류 로직.
//! 어댑터 crate와 바이너리가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 좌표, OCR 후보, 상태 코드 등 도메인 데이터
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`normalizer`]: OCR 텍스트 화이트리스트 정규화
//! - [`matcher`]: 퍼지 라벨 매칭 (Ratcliff/Obershelp)
//! - [`classifier`]: 신호 융합 분류기
//! - [`probe`]: 선택 강조색 프로브
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`] / [`config_manager`]: 설정 구조체와 파일 관리

pub mod classifier;
pub mod config;
pub mod config_manager;
pub mod error;
pub mod matcher;
pub mod models;
pub mod normalizer;
pub mod ports;
pub mod probe;
