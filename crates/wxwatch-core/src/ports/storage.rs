//! 상태 저장소 포트.
//!
//! 구현: `wxwatch-storage` crate (rusqlite)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::status::{Classification, StatusRecord};

/// 단일 행 상태 저장소
///
/// 최대 한 행만 존재한다. `publish`는 "전체 삭제 + 한 행 삽입"을
/// 원자적으로 수행해야 한다. 동시 독자가 0행을 관측해서는 안 된다.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// 분류 결과로 상태 행 덮어쓰기
    async fn publish(&self, classification: &Classification) -> Result<(), CoreError>;

    /// 현재 상태 행 조회
    async fn latest(&self) -> Result<Option<StatusRecord>, CoreError>;
}
