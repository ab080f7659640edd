//! 로컬 OCR 제공자: Tesseract 래퍼.
//!
//! `OcrExtractor`를 `TextRecognizer` 포트로 감싼다.
//! `ocr` feature가 꺼져 있으면 항상 빈 결과를 돌려준다 (유효한 "텍스트 없음").

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;
use wxwatch_core::error::CoreError;
use wxwatch_core::models::frame::Frame;
use wxwatch_core::models::text::RecognizedText;
use wxwatch_core::ports::ocr_provider::TextRecognizer;

/// 로컬 OCR 제공자 (Tesseract 기반)
///
/// 인식 설정은 시작 시 한 번 만들어 드라이버에 주입한다.
#[derive(Debug, Clone)]
pub struct LocalOcrProvider {
    tessdata_path: Option<PathBuf>,
    language: String,
}

impl LocalOcrProvider {
    /// 새 로컬 OCR 제공자 생성
    pub fn new(tessdata_path: Option<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            tessdata_path,
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// 이 빌드에서 실제 인식이 가능한지
    pub fn is_enabled() -> bool {
        cfg!(feature = "ocr")
    }
}

impl Default for LocalOcrProvider {
    fn default() -> Self {
        Self::new(None, "chi_sim")
    }
}

#[async_trait]
impl TextRecognizer for LocalOcrProvider {
    async fn recognize(&self, frame: &Frame) -> Result<Vec<RecognizedText>, CoreError> {
        if frame.is_empty() {
            return Ok(Vec::new());
        }

        #[cfg(feature = "ocr")]
        {
            use crate::ocr::OcrExtractor;

            let extractor = OcrExtractor::new(self.tessdata_path.clone(), self.language.clone());
            let lines = extractor
                .extract_lines_async(frame.image.clone())
                .await
                .map_err(|e| CoreError::OcrError(format!("OCR 추출 실패: {e}")))?;
            debug!(lines = lines.len(), "로컬 OCR 완료");
            Ok(lines)
        }

        #[cfg(not(feature = "ocr"))]
        {
            debug!(
                tessdata = ?self.tessdata_path,
                "ocr feature 비활성화 - 빈 결과 반환"
            );
            Ok(Vec::new())
        }
    }

    fn provider_name(&self) -> &str {
        "local-tesseract"
    }
}
