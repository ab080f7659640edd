//! 비전 포트: 화면 캡처, 픽셀 샘플링, 광학 심볼(QR) 디코딩.
//!
//! 구현: `wxwatch-vision` crate (xcap, image, rqrr)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::frame::Frame;
use crate::models::geometry::{Point, Rgb, WindowBounds};

/// 스크린 캡처
#[async_trait]
pub trait ScreenCapturer: Send + Sync {
    /// 화면 절대 좌표 영역 캡처
    async fn capture_region(&self, region: WindowBounds) -> Result<Option<Frame>, CoreError>;

    /// 주 모니터 전체 캡처
    async fn capture_screen(&self) -> Result<Option<Frame>, CoreError>;
}

/// 단일 픽셀 샘플링
///
/// 분류기 안에서 동기적으로 호출되므로 동기 trait이다.
/// 1×1 영역만 읽는 유한한 작업이어야 한다.
pub trait PixelSampler: Send + Sync {
    /// 화면 좌표의 RGB 값. 화면 밖이면 `Ok(None)`.
    fn sample(&self, point: Point) -> Result<Option<Rgb>, CoreError>;
}

/// 광학 심볼(QR 코드) 디코더
#[async_trait]
pub trait SymbolDecoder: Send + Sync {
    /// 프레임에서 첫 번째로 디코딩된 심볼 내용. 없으면 `Ok(None)`.
    async fn decode(&self, frame: &Frame) -> Result<Option<String>, CoreError>;
}
