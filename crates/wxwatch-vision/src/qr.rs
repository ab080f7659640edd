//! QR 코드 디코딩.
//!
//! `rqrr` 기반. 프레임을 그레이스케일로 바꾸고 격자를 찾아
//! 처음으로 디코딩에 성공한 내용을 돌려준다.

use async_trait::async_trait;
use image::RgbaImage;
use tracing::{debug, trace};
use wxwatch_core::error::CoreError;
use wxwatch_core::models::frame::Frame;
use wxwatch_core::ports::vision::SymbolDecoder;

/// QR 코드 디코더: `SymbolDecoder` 포트 구현
#[derive(Debug, Default, Clone, Copy)]
pub struct QrSymbolDecoder;

impl QrSymbolDecoder {
    pub fn new() -> Self {
        Self
    }
}

/// 이미지에서 첫 번째로 디코딩된 QR 내용 (동기)
pub fn decode_first(image: &RgbaImage) -> Option<String> {
    let (w, h) = (image.width() as usize, image.height() as usize);
    if w == 0 || h == 0 {
        return None;
    }

    let gray = image::imageops::grayscale(image);
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(w, h, |x, y| {
        gray.get_pixel(x as u32, y as u32).0[0]
    });
    let grids = prepared.detect_grids();
    trace!("QR 격자 {}개 감지", grids.len());

    grids.iter().find_map(|grid| match grid.decode() {
        Ok((_meta, content)) => Some(content),
        Err(e) => {
            trace!("QR 디코딩 실패: {e}");
            None
        }
    })
}

#[async_trait]
impl SymbolDecoder for QrSymbolDecoder {
    async fn decode(&self, frame: &Frame) -> Result<Option<String>, CoreError> {
        if frame.is_empty() {
            return Ok(None);
        }

        // 전체 화면 그레이스케일 변환 + 격자 탐색은 CPU 바운드
        let image = frame.image.clone();
        let decoded = tokio::task::spawn_blocking(move || decode_first(&image))
            .await
            .map_err(|e| CoreError::Internal(format!("QR 디코딩 작업 조인 실패: {e}")))?;

        debug!(found = decoded.is_some(), "QR 디코딩");
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use wxwatch_core::models::geometry::Point;

    const LOGIN_URL: &str = "https://weixin.qq.com/x";

    /// 흰 화면 (300, 150) 위치에 QR 코드를 그린 800x600 캔버스
    fn screen_with_code(payload: &str) -> RgbaImage {
        let code = qrcode::QrCode::new(payload.as_bytes())
            .unwrap()
            .render::<image::Luma<u8>>()
            .quiet_zone(true)
            .module_dimensions(4, 4)
            .build();
        let code = image::DynamicImage::ImageLuma8(code).to_rgba8();

        let mut canvas = RgbaImage::from_pixel(800, 600, Rgba([255, 255, 255, 255]));
        image::imageops::overlay(&mut canvas, &code, 300, 150);
        canvas
    }

    #[test]
    fn decodes_code_placed_on_screen() {
        let canvas = screen_with_code(LOGIN_URL);
        assert_eq!(decode_first(&canvas), Some(LOGIN_URL.to_string()));
    }

    #[test]
    fn decodes_code_on_colored_background() {
        let mut canvas = screen_with_code(LOGIN_URL);
        // 조용한 영역 바깥을 위챗 회색 사이드바처럼 칠함
        for y in 0..600 {
            for x in 0..200 {
                canvas.put_pixel(x, y, Rgba([46, 46, 46, 255]));
            }
        }
        assert_eq!(decode_first(&canvas), Some(LOGIN_URL.to_string()));
    }

    #[test]
    fn blank_image_has_no_code() {
        let image = RgbaImage::from_pixel(64, 64, Rgba([255, 255, 255, 255]));
        assert_eq!(decode_first(&image), None);
        assert_eq!(decode_first(&RgbaImage::new(0, 0)), None);
    }

    #[test]
    fn stripes_are_not_a_code() {
        let image = RgbaImage::from_fn(120, 120, |x, _| {
            if (x / 7) % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        assert_eq!(decode_first(&image), None);
    }

    #[tokio::test]
    async fn decoder_port_returns_absent_for_blank_frame() {
        let frame = Frame::new(
            Point::new(0, 0),
            RgbaImage::from_pixel(32, 32, Rgba([255, 255, 255, 255])),
        );
        let decoded = QrSymbolDecoder::new().decode(&frame).await.unwrap();
        assert!(decoded.is_none());
    }

    #[tokio::test]
    async fn decoder_port_returns_code_content() {
        let frame = Frame::new(Point::new(0, 0), screen_with_code(LOGIN_URL));
        let decoded = QrSymbolDecoder::new().decode(&frame).await.unwrap();
        assert_eq!(decoded.as_deref(), Some(LOGIN_URL));
    }
}
