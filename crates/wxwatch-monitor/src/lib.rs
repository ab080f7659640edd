//! # wxwatch-monitor
//!
//! 창 탐색 어댑터.
//! 제목 부분 문자열로 최상위 창을 찾아 화면 절대 좌표의 위치/크기를 돌려준다.
//! 플랫폼별(Windows, Linux) 네이티브 수단으로 구현하며, 그 외 플랫폼은 항상 "없음".

pub mod window;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "linux")]
pub mod linux;

use std::sync::Arc;

use wxwatch_core::ports::monitor::WindowLocator;

pub use window::PlatformWindowLocator;

/// 현재 플랫폼의 창 탐색기 생성
///
/// 플랫폼 선택은 프로세스 시작 시 한 번만 일어난다.
pub fn create_platform_locator() -> Arc<dyn WindowLocator> {
    Arc::new(PlatformWindowLocator::new())
}
