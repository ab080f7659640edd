//! OCR 제공자 포트.
//!
//! 내장 Tesseract 등 텍스트 인식 엔진을 추상화한다.
//! 인식 모델은 시작 시 한 번 만들어 드라이버에 주입한다 (전역 상태 없음).

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::frame::Frame;
use crate::models::text::RecognizedText;

/// 텍스트 인식기
///
/// 구현체: `LocalOcrProvider` (Tesseract)
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// 프레임에서 (텍스트, 사각형, 신뢰도) 목록 추출.
    ///
    /// 좌표는 프레임 기준 상대 좌표이다.
    async fn recognize(&self, frame: &Frame) -> Result<Vec<RecognizedText>, CoreError>;

    /// 제공자 이름 (예: "local-tesseract")
    fn provider_name(&self) -> &str;
}
