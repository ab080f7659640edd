//! 플랫폼 창 탐색기.
//!
//! `WindowLocator` 포트 구현. 플랫폼 API 호출은 블로킹이라
//! `spawn_blocking`으로 런타임 스레드 밖에서 실행한다.

use async_trait::async_trait;
use tracing::debug;
use wxwatch_core::error::CoreError;
use wxwatch_core::models::geometry::WindowBounds;
use wxwatch_core::ports::monitor::WindowLocator;

/// 열거된 최상위 창 하나
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowEntry {
    pub title: String,
    pub bounds: WindowBounds,
}

/// 제목에 `needle`을 포함하는 첫 번째 창
///
/// 빈 창(너비나 높이가 0)은 건너뛴다.
pub fn select_window<I>(entries: I, needle: &str) -> Option<WindowBounds>
where
    I: IntoIterator<Item = WindowEntry>,
{
    entries
        .into_iter()
        .find(|e| e.title.contains(needle) && e.bounds.width > 0 && e.bounds.height > 0)
        .map(|e| e.bounds)
}

/// 현재 플랫폼의 창 탐색기
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformWindowLocator;

impl PlatformWindowLocator {
    pub fn new() -> Self {
        Self
    }
}

/// 플랫폼별 최상위 창 목록
///
/// - Windows: Win32 EnumWindows
/// - Linux: wmctrl -lpG (X11/XWayland)
/// - 그 외: 빈 목록
fn list_windows() -> Result<Vec<WindowEntry>, CoreError> {
    #[cfg(target_os = "windows")]
    {
        crate::windows::list_windows_windows()
    }

    #[cfg(target_os = "linux")]
    {
        crate::linux::list_windows_linux()
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux")))]
    {
        debug!("지원되지 않는 플랫폼 - 창 탐색 불가");
        Ok(Vec::new())
    }
}

#[async_trait]
impl WindowLocator for PlatformWindowLocator {
    async fn locate(&self, title: &str) -> Result<Option<WindowBounds>, CoreError> {
        let entries = tokio::task::spawn_blocking(list_windows)
            .await
            .map_err(|e| CoreError::Internal(format!("창 목록 작업 실패: {e}")))??;

        let found = select_window(entries, title);
        debug!(title, ?found, "창 탐색");
        Ok(found)
    }

    fn name(&self) -> &str {
        if cfg!(target_os = "windows") {
            "win32"
        } else if cfg!(target_os = "linux") {
            "wmctrl"
        } else {
            "unsupported"
        }
    }
}
