//! # wxwatch-storage
//!
//! 상태 저장소 어댑터.
//! 매 사이클의 분류 결과를 SQLite 단일 행 `status` 테이블에 덮어쓴다.
//! 외부 소비자(대시보드 등)는 다른 연결로 이 행을 읽는다.
//!
//! ## 모듈
//! - `sqlite`: 상태 저장소 (StatusStore 구현)
//! - `migration`: 스키마 마이그레이션

pub mod migration;
pub mod sqlite;
