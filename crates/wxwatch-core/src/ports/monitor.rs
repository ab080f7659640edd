//! 창 탐색 포트.
//!
//! 구현: `wxwatch-monitor` crate (플랫폼별 전략은 시작 시 한 번 선택)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::geometry::WindowBounds;

/// 제목으로 최상위 창 위치/크기 조회
#[async_trait]
pub trait WindowLocator: Send + Sync {
    /// 제목에 `title`을 포함하는 첫 번째 창의 위치/크기.
    ///
    /// 창이 없으면 `Ok(None)`.
    async fn locate(&self, title: &str) -> Result<Option<WindowBounds>, CoreError>;

    /// 전략 이름 (예: "wmctrl", "win32")
    fn name(&self) -> &str;
}
