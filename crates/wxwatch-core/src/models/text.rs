//! OCR 텍스트 모델.

use serde::{Deserialize, Serialize};

use super::geometry::Quad;

/// OCR 원시 결과 (캡처 프레임 기준 상대 좌표, 필터링 전)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedText {
    /// 인식된 텍스트
    pub text: String,
    /// 프레임 내 꼭짓점 4개
    pub quad: [(f32, f32); 4],
    /// 인식 신뢰도 (0.0 ~ 1.0)
    pub confidence: f64,
}

/// 정규화된 텍스트 후보
///
/// `text`는 화이트리스트 문자만 포함하며 비어 있지 않다.
/// `region`은 화면 절대 좌표이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCandidate {
    pub text: String,
    pub region: Quad,
    pub confidence: f64,
}

impl TextCandidate {
    pub fn new(text: impl Into<String>, region: Quad, confidence: f64) -> Self {
        Self {
            text: text.into(),
            region,
            confidence,
        }
    }
}
