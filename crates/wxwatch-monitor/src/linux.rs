//! Linux 플랫폼 지원.
//!
//! `wmctrl -lpG`로 최상위 창 목록과 위치/크기를 읽는다 (X11, XWayland).
//! Wayland 네이티브 창은 보이지 않는다.

use std::process::Command;

use tracing::debug;
use wxwatch_core::error::CoreError;
use wxwatch_core::models::geometry::WindowBounds;

use crate::window::WindowEntry;

/// wmctrl로 최상위 창 목록 조회
///
/// wmctrl이 없거나 실패하면 빈 목록 (창 없음과 같은 취급).
pub fn list_windows_linux() -> Result<Vec<WindowEntry>, CoreError> {
    let output = match Command::new("wmctrl").arg("-lpG").output() {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("wmctrl 실패: {}", stderr.trim());
            return Ok(Vec::new());
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::NotFound {
                debug!("wmctrl 미설치 - 'sudo apt install wmctrl' 실행 필요");
            } else {
                debug!("wmctrl 실행 실패: {}", e);
            }
            return Ok(Vec::new());
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_wmctrl_output(&stdout))
}

/// `wmctrl -lpG` 출력 전체 파싱 (형식이 맞지 않는 줄은 무시)
pub fn parse_wmctrl_output(stdout: &str) -> Vec<WindowEntry> {
    stdout.lines().filter_map(parse_wmctrl_line).collect()
}

/// `wmctrl -lpG` 한 줄 파싱
///
/// 형식: `<id> <desktop> <pid> <x> <y> <w> <h> <host> <title...>`
/// 제목에는 공백이 들어갈 수 있다.
pub fn parse_wmctrl_line(line: &str) -> Option<WindowEntry> {
    let mut rest = line.trim_start();
    let mut fields = [""; 8];
    for field in fields.iter_mut() {
        if rest.is_empty() {
            return None;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        *field = &rest[..end];
        rest = rest[end..].trim_start();
    }

    // fields: id, desktop, pid, x, y, w, h, host
    let bounds = WindowBounds {
        x: fields[3].parse().ok()?,
        y: fields[4].parse().ok()?,
        width: fields[5].parse().ok()?,
        height: fields[6].parse().ok()?,
    };

    Some(WindowEntry {
        title: rest.trim_end().to_string(),
        bounds,
    })
}
