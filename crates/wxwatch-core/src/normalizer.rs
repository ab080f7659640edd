//! OCR 텍스트 정규화.
//!
//! 인식된 문자열에서 화이트리스트(라벨 어휘) 문자만 남기고,
//! 남은 문자가 없는 결과는 후보에서 제외한다.

use std::collections::BTreeSet;

use crate::models::geometry::{Point, Quad};
use crate::models::text::{RecognizedText, TextCandidate};

/// 기본 화이트리스트: 모든 라벨의 문자 합집합
pub const DEFAULT_WHITELIST: &str = "微信收款助手切换账号当前退出登录正在进入机";

/// 허용 문자 집합
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Whitelist {
    chars: BTreeSet<char>,
}

impl Whitelist {
    /// 문자열의 모든 문자로 화이트리스트 생성
    pub fn new(alphabet: &str) -> Self {
        Self {
            chars: alphabet.chars().collect(),
        }
    }

    /// 라벨 목록의 문자 합집합으로 생성
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            chars: labels.into_iter().flat_map(str::chars).collect(),
        }
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// 허용 문자만 남긴 문자열 (없으면 빈 문자열)
    pub fn normalize(&self, raw: &str) -> String {
        raw.chars().filter(|c| self.contains(*c)).collect()
    }
}

impl Default for Whitelist {
    fn default() -> Self {
        Self::new(DEFAULT_WHITELIST)
    }
}

/// OCR 원시 결과 → 정규화된 화면 절대 좌표 후보
///
/// 정규화 후 빈 텍스트는 조용히 버린다.
/// 프레임 상대 좌표는 정수로 절삭한 뒤 `origin`을 더한다.
pub fn to_candidates(
    raw: Vec<RecognizedText>,
    origin: Point,
    whitelist: &Whitelist,
) -> Vec<TextCandidate> {
    raw.into_iter()
        .filter_map(|r| {
            let text = whitelist.normalize(&r.text);
            if text.is_empty() {
                return None;
            }
            let corners = r
                .quad
                .map(|(x, y)| Point::new(x as i32, y as i32).offset(origin.x, origin.y));
            Some(TextCandidate::new(text, Quad(corners), r.confidence))
        })
        .collect()
}
