//! Windows 플랫폼: 최상위 창 열거.
//!
//! Win32 API `EnumWindows` + `GetWindowTextW` + `GetWindowRect` 기반.

#![cfg(target_os = "windows")]

use windows_sys::core::BOOL;
use windows_sys::Win32::Foundation::{HWND, LPARAM, RECT};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindowRect, GetWindowTextW, IsWindowVisible,
};
use wxwatch_core::error::CoreError;
use wxwatch_core::models::geometry::WindowBounds;

use crate::window::WindowEntry;

/// 보이는 최상위 창 목록 (Z 순서)
pub fn list_windows_windows() -> Result<Vec<WindowEntry>, CoreError> {
    let mut entries: Vec<WindowEntry> = Vec::new();
    // SAFETY: 콜백은 EnumWindows가 반환하기 전까지만 lparam 포인터를 사용한다
    let ok = unsafe { EnumWindows(Some(collect_window), &mut entries as *mut _ as LPARAM) };
    if ok == 0 {
        return Err(CoreError::Internal("EnumWindows 실패".to_string()));
    }
    Ok(entries)
}

unsafe extern "system" fn collect_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let entries = &mut *(lparam as *mut Vec<WindowEntry>);

    if IsWindowVisible(hwnd) == 0 {
        return 1;
    }

    let mut title_buf = [0u16; 512];
    let len = GetWindowTextW(hwnd, title_buf.as_mut_ptr(), title_buf.len() as i32);
    if len <= 0 {
        return 1;
    }
    let title = String::from_utf16_lossy(&title_buf[..len as usize]);

    if let Some(bounds) = window_bounds(hwnd) {
        entries.push(WindowEntry { title, bounds });
    }
    1
}

/// 창 위치/크기
fn window_bounds(hwnd: HWND) -> Option<WindowBounds> {
    unsafe {
        let mut rect: RECT = std::mem::zeroed();
        if GetWindowRect(hwnd, &mut rect) == 0 {
            return None;
        }
        let width = (rect.right - rect.left).max(0) as u32;
        let height = (rect.bottom - rect.top).max(0) as u32;
        Some(WindowBounds {
            x: rect.left,
            y: rect.top,
            width,
            height,
        })
    }
}
