//! 스크린 캡처.
//!
//! xcap 기반. 영역 캡처는 영역 좌상단이 속한 모니터를 통째로 찍은 뒤 잘라낸다.
//! xcap 호출은 블로킹이라 비동기 포트에서는 `spawn_blocking`으로 실행한다.
//! 동기 포트인 픽셀 샘플링은 멀티스레드 런타임 안이면 `block_in_place`로 감싼다.

use async_trait::async_trait;
use image::RgbaImage;
use tokio::runtime::RuntimeFlavor;
use tracing::debug;
use wxwatch_core::error::CoreError;
use wxwatch_core::models::frame::Frame;
use wxwatch_core::models::geometry::{Point, Rgb, WindowBounds};
use wxwatch_core::ports::vision::{PixelSampler, ScreenCapturer};
use xcap::Monitor;

/// 스크린 캡처: xcap 기반
pub struct ScreenCapture;

impl ScreenCapture {
    /// 새 캡처 인스턴스 생성
    pub fn new() -> Self {
        Self
    }

    /// 주 모니터 스크린 캡처 (동기)
    pub fn capture_primary(&self) -> Result<Frame, CoreError> {
        let monitors = Monitor::all()
            .map_err(|e| CoreError::Capture(format!("모니터 목록 조회 실패: {e}")))?;

        let monitor = monitors
            .iter()
            .find(|m| m.is_primary().unwrap_or(false))
            .or_else(|| monitors.first())
            .ok_or_else(|| CoreError::Capture("모니터를 찾을 수 없음".to_string()))?;

        let (origin, image) = capture_monitor(monitor)?;
        debug!("스크린 캡처 완료: {}x{}", image.width(), image.height());
        Ok(Frame::new(origin, image))
    }

    /// 화면 절대 좌표 영역 캡처 (동기)
    ///
    /// 영역이 모니터 밖이면 `Ok(None)`. 모니터 경계를 넘는 부분은 잘린다.
    pub fn capture_bounds(&self, region: WindowBounds) -> Result<Option<Frame>, CoreError> {
        let Some(monitor) = monitor_at(region.origin()) else {
            debug!(x = region.x, y = region.y, "영역이 어느 모니터에도 속하지 않음");
            return Ok(None);
        };

        let (origin, image) = capture_monitor(&monitor)?;
        let screen = WindowBounds {
            x: origin.x,
            y: origin.y,
            width: image.width(),
            height: image.height(),
        };

        let Some(clip) = intersect(region, screen) else {
            return Ok(None);
        };

        let cropped = image::imageops::crop_imm(
            &image,
            (clip.x - screen.x) as u32,
            (clip.y - screen.y) as u32,
            clip.width,
            clip.height,
        )
        .to_image();

        debug!(
            "영역 캡처 완료: {}x{} at ({}, {})",
            clip.width, clip.height, clip.x, clip.y
        );
        Ok(Some(Frame::new(clip.origin(), cropped)))
    }
}

impl Default for ScreenCapture {
    fn default() -> Self {
        Self::new()
    }
}

/// 좌표를 포함하는 모니터
fn monitor_at(point: Point) -> Option<Monitor> {
    Monitor::from_point(point.x, point.y).ok()
}

/// 모니터 전체 캡처 → (모니터 원점, 이미지)
fn capture_monitor(monitor: &Monitor) -> Result<(Point, RgbaImage), CoreError> {
    let x = monitor
        .x()
        .map_err(|e| CoreError::Capture(format!("모니터 위치 조회 실패: {e}")))?;
    let y = monitor
        .y()
        .map_err(|e| CoreError::Capture(format!("모니터 위치 조회 실패: {e}")))?;
    let image = monitor
        .capture_image()
        .map_err(|e| CoreError::Capture(format!("스크린 캡처 실패: {e}")))?;
    Ok((Point::new(x, y), image))
}

/// 두 사각형의 교집합 (비어 있으면 None)
pub fn intersect(a: WindowBounds, b: WindowBounds) -> Option<WindowBounds> {
    let left = a.x.max(b.x) as i64;
    let top = a.y.max(b.y) as i64;
    let right = (a.x as i64 + a.width as i64).min(b.x as i64 + b.width as i64);
    let bottom = (a.y as i64 + a.height as i64).min(b.y as i64 + b.height as i64);
    if right <= left || bottom <= top {
        return None;
    }
    Some(WindowBounds {
        x: left as i32,
        y: top as i32,
        width: (right - left) as u32,
        height: (bottom - top) as u32,
    })
}

/// 프레임에서 화면 좌표의 픽셀 (프레임 밖이면 None)
pub fn pixel_at(frame: &Frame, point: Point) -> Option<Rgb> {
    let dx = point.x.checked_sub(frame.origin.x)?;
    let dy = point.y.checked_sub(frame.origin.y)?;
    if dx < 0 || dy < 0 || dx as u32 >= frame.width() || dy as u32 >= frame.height() {
        return None;
    }
    let [r, g, b, _] = frame.image.get_pixel(dx as u32, dy as u32).0;
    Some(Rgb::new(r, g, b))
}

async fn run_blocking<T, F>(task: F) -> Result<T, CoreError>
where
    F: FnOnce() -> Result<T, CoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| CoreError::Internal(format!("캡처 작업 조인 실패: {e}")))?
}

/// 동기 블로킹 작업 실행
///
/// 멀티스레드 런타임 워커에서는 `block_in_place`로 워커를 넘겨주고,
/// 그 밖(런타임 없음, current_thread)에서는 그대로 호출한다.
fn run_in_place<T>(task: impl FnOnce() -> T) -> T {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(task)
        }
        _ => task(),
    }
}

#[async_trait]
impl ScreenCapturer for ScreenCapture {
    async fn capture_region(&self, region: WindowBounds) -> Result<Option<Frame>, CoreError> {
        if region.width == 0 || region.height == 0 {
            return Ok(None);
        }
        run_blocking(move || ScreenCapture::new().capture_bounds(region)).await
    }

    async fn capture_screen(&self) -> Result<Option<Frame>, CoreError> {
        run_blocking(|| ScreenCapture::new().capture_primary().map(Some)).await
    }
}

impl PixelSampler for ScreenCapture {
    fn sample(&self, point: Point) -> Result<Option<Rgb>, CoreError> {
        let region = WindowBounds {
            x: point.x,
            y: point.y,
            width: 1,
            height: 1,
        };
        let frame = run_in_place(|| self.capture_bounds(region))?;
        Ok(frame.and_then(|f| pixel_at(&f, point)))
    }
}
