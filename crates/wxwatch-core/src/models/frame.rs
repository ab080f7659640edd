//! 캡처 프레임 모델.
//!
//! 캡처 어댑터가 만든 픽셀 버퍼를 OCR / QR 디코더로 넘길 때 사용한다.

use image::RgbaImage;

use super::geometry::Point;

/// 캡처된 화면 영역
#[derive(Debug, Clone)]
pub struct Frame {
    /// 픽셀 (0, 0)의 화면 절대 좌표
    pub origin: Point,
    /// RGBA 픽셀 버퍼
    pub image: RgbaImage,
}

impl Frame {
    pub fn new(origin: Point, image: RgbaImage) -> Self {
        Self { origin, image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// 빈 프레임 여부 (너비 또는 높이가 0)
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}
