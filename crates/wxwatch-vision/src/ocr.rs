//! OCR 텍스트 추출 모듈.
//!
//! `leptess` 기반 Tesseract OCR 래퍼.
//! `ocr` feature flag 활성화 시에만 빌드된다.
//!
//! 텍스트 줄(RIL_TEXTLINE) 단위로 박스를 구하고, 박스마다 인식 영역을 좁혀
//! 텍스트와 평균 신뢰도를 읽는다.

use std::io::Cursor;
use std::path::PathBuf;

use image::{ImageFormat, RgbaImage};
use thiserror::Error;
use tracing::debug;
use wxwatch_core::models::text::RecognizedText;

/// OCR 에러 타입
#[derive(Debug, Error)]
pub enum OcrError {
    /// Tesseract 초기화 실패
    #[error("OCR 초기화 실패: {0}")]
    Init(String),

    /// 이미지 설정 실패
    #[error("OCR 이미지 설정 실패: {0}")]
    ImageSetup(String),

    /// 텍스트 추출 실패
    #[error("OCR 텍스트 추출 실패: {0}")]
    Extraction(String),

    /// 빈 이미지 입력
    #[error("빈 이미지: 너비 또는 높이가 0")]
    EmptyImage,

    /// 비동기 작업 실패
    #[error("OCR 비동기 작업 실패: {0}")]
    Async(String),
}

/// OCR 텍스트 줄 추출기
#[derive(Debug, Clone)]
pub struct OcrExtractor {
    /// Tesseract 데이터 경로 (None이면 시스템 기본값)
    tessdata_path: Option<PathBuf>,
    /// 인식 언어 (예: "chi_sim")
    language: String,
}

impl OcrExtractor {
    /// 새 OCR 추출기 생성
    pub fn new(tessdata_path: Option<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            tessdata_path,
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// 텍스트 줄 + 사각형 + 신뢰도 추출 (동기)
    pub fn extract_lines(&self, image: &RgbaImage) -> Result<Vec<RecognizedText>, OcrError> {
        let (w, h) = (image.width(), image.height());
        if w == 0 || h == 0 {
            return Err(OcrError::EmptyImage);
        }

        // leptonica가 읽을 수 있는 PNG로 넘긴다
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| OcrError::ImageSetup(format!("PNG 인코딩 실패: {e}")))?;

        let tessdata = self
            .tessdata_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string());

        let mut lt = leptess::LepTess::new(tessdata.as_deref(), &self.language)
            .map_err(|e| OcrError::Init(format!("{e}")))?;

        lt.set_image_from_mem(&png)
            .map_err(|e| OcrError::ImageSetup(format!("{e}")))?;

        let Some(boxes) =
            lt.get_component_boxes(leptess::capi::TessPageIteratorLevel_RIL_TEXTLINE, true)
        else {
            debug!("텍스트 줄 없음");
            return Ok(Vec::new());
        };

        let mut lines = Vec::new();
        for b in &boxes {
            let geom = b.get_geometry();
            lt.set_rectangle(&b);
            let text = lt
                .get_utf8_text()
                .map_err(|e| OcrError::Extraction(format!("{e}")))?;
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            let confidence = f64::from(lt.mean_text_conf().clamp(0, 100)) / 100.0;
            lines.push(RecognizedText {
                text: text.to_string(),
                quad: box_quad(geom.x, geom.y, geom.w, geom.h),
                confidence,
            });
        }

        debug!("OCR 텍스트 줄 {}개 ({}x{})", lines.len(), w, h);
        Ok(lines)
    }

    /// 텍스트 줄 추출 (비동기)
    ///
    /// Tesseract 인식은 CPU 바운드라 `spawn_blocking`으로 실행한다.
    pub async fn extract_lines_async(
        &self,
        image: RgbaImage,
    ) -> Result<Vec<RecognizedText>, OcrError> {
        let extractor = self.clone();
        tokio::task::spawn_blocking(move || extractor.extract_lines(&image))
            .await
            .map_err(|e| OcrError::Async(format!("작업 조인 실패: {e}")))?
    }
}

/// 축 정렬 박스 → 좌상단부터 시계방향 꼭짓점 4개
pub fn box_quad(x: i32, y: i32, w: i32, h: i32) -> [(f32, f32); 4] {
    let (x, y) = (x as f32, y as f32);
    let (right, bottom) = (x + w.max(0) as f32, y + h.max(0) as f32);
    [(x, y), (right, y), (right, bottom), (x, bottom)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_image_returns_error() {
        let extractor = OcrExtractor::new(None, "chi_sim");
        let result = extractor.extract_lines(&RgbaImage::new(0, 0));
        assert!(matches!(result, Err(OcrError::EmptyImage)));
    }

    #[test]
    fn error_display_messages() {
        assert!(OcrError::Init("x".into()).to_string().contains("초기화"));
        assert!(OcrError::EmptyImage.to_string().contains("빈 이미지"));
        assert!(OcrError::Async("x".into()).to_string().contains("비동기"));
    }

    #[test]
    fn box_quad_is_clockwise_from_top_left() {
        assert_eq!(
            box_quad(10, 20, 30, 5),
            [(10.0, 20.0), (40.0, 20.0), (40.0, 25.0), (10.0, 25.0)]
        );
    }

    #[tokio::test]
    async fn empty_image_async_returns_error() {
        let extractor = OcrExtractor::new(Some(PathBuf::from("/usr/share/tessdata")), "chi_sim");
        assert_eq!(extractor.language(), "chi_sim");
        let result = extractor.extract_lines_async(RgbaImage::new(0, 0)).await;
        assert!(matches!(result, Err(OcrError::EmptyImage)));
    }
}
