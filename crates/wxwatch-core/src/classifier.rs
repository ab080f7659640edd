//! 신호 융합 분류기.
//!
//! 창 존재 여부, OCR 후보, 색상 프로브, QR 페이로드를 받아
//! 사이클마다 정확히 하나의 `(StatusCode, Payload)`를 만든다.
//!
//! 상태 기계가 아니라 우선순위 결정 트리다: 이전 결과를 기억하지 않고
//! 매 사이클 입력만으로 처음부터 평가한다.
//!
//! ```text
//! 창 있음 ─┬─ 수금 도우미 라벨 있음 ─┬─ 프로브 일치 → 100
//!          │                         └─ 불일치     → 101 (라벨 중심)
//!          └─ 라벨 없음                            → 102
//! 창 없음 ─┬─ QR 페이로드 있음                     → 300
//!          ├─ 当前账号 ∧ 退出登录                   → 200
//!          ├─ 切换账号                              → 201 (라벨 중심)
//!          ├─ 正在进入                              → 202
//!          ├─ 手机 ∧ 登录                           → 203
//!          └─ 그 외                                 → 900
//! ```
//!
//! 두 라벨이 모두 필요한 조건을 단일 라벨 조건보다 먼저 본다.
//! 로그아웃 화면에 切换账号이 함께 보여도 201이 아니라 200이 된다.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matcher::{find_best_match_with, DEFAULT_FALLBACK_THRESHOLD};
use crate::models::geometry::{Point, RegionVariant};
use crate::models::status::{Classification, StatusCode};
use crate::models::text::TextCandidate;

/// 분류에 쓰는 라벨 문자열
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    #[serde(default = "default_assistant_title")]
    pub assistant_title: String,
    #[serde(default = "default_current_account")]
    pub current_account: String,
    #[serde(default = "default_logout")]
    pub logout: String,
    #[serde(default = "default_switch_account")]
    pub switch_account: String,
    #[serde(default = "default_entering")]
    pub entering: String,
    #[serde(default = "default_phone")]
    pub phone: String,
    #[serde(default = "default_login")]
    pub login: String,
}

impl Labels {
    /// 모든 라벨 (화이트리스트 생성용)
    pub fn all(&self) -> [&str; 7] {
        [
            &self.assistant_title,
            &self.current_account,
            &self.logout,
            &self.switch_account,
            &self.entering,
            &self.phone,
            &self.login,
        ]
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            assistant_title: default_assistant_title(),
            current_account: default_current_account(),
            logout: default_logout(),
            switch_account: default_switch_account(),
            entering: default_entering(),
            phone: default_phone(),
            login: default_login(),
        }
    }
}

fn default_assistant_title() -> String {
    "微信收款助手".to_string()
}
fn default_current_account() -> String {
    "当前账号".to_string()
}
fn default_logout() -> String {
    "退出登录".to_string()
}
fn default_switch_account() -> String {
    "切换账号".to_string()
}
fn default_entering() -> String {
    "正在进入".to_string()
}
fn default_phone() -> String {
    "手机".to_string()
}
fn default_login() -> String {
    "登录".to_string()
}

/// 한 사이클에서 수집한 신호
#[derive(Debug, Clone, PartialEq)]
pub struct Signals {
    /// 최소 크기 이상의 창이 있는지 (창 탐색 실패는 false)
    pub window_present: bool,
    /// 후보 목록을 채운 OCR 영역 (참고용)
    pub region_variant: RegionVariant,
    /// 창 좌상단 일부 OCR 후보
    pub narrow_candidates: Vec<TextCandidate>,
    /// 창 전체 OCR 후보
    pub full_candidates: Vec<TextCandidate>,
    /// 디코딩된 QR 내용
    pub symbol_payload: Option<String>,
}

impl Signals {
    /// 창이 있을 때의 신호
    pub fn window_present(narrow_candidates: Vec<TextCandidate>) -> Self {
        Self {
            window_present: true,
            region_variant: RegionVariant::Narrow,
            narrow_candidates,
            full_candidates: Vec::new(),
            symbol_payload: None,
        }
    }

    /// 창이 없을 때의 신호
    pub fn window_absent(
        symbol_payload: Option<String>,
        full_candidates: Vec<TextCandidate>,
    ) -> Self {
        Self {
            window_present: false,
            region_variant: RegionVariant::Full,
            narrow_candidates: Vec::new(),
            full_candidates,
            symbol_payload,
        }
    }
}

/// 우선순위 결정 트리 분류기
#[derive(Debug, Clone, PartialEq)]
pub struct SignalClassifier {
    labels: Labels,
    threshold: f64,
}

impl Default for SignalClassifier {
    fn default() -> Self {
        Self::new(Labels::default(), DEFAULT_FALLBACK_THRESHOLD)
    }
}

impl SignalClassifier {
    pub fn new(labels: Labels, threshold: f64) -> Self {
        Self { labels, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// 설정된 라벨/임계값으로 [`classify`] 실행
    pub fn classify<F>(&self, signals: &Signals, color_probe: F) -> Classification
    where
        F: Fn(Point) -> bool,
    {
        classify(signals, &self.labels, self.threshold, color_probe)
    }
}

/// 신호를 하나의 분류 결과로 융합
///
/// `color_probe`는 라벨 기준점(첫 꼭짓점)을 받아 선택 강조색 여부를 돌려준다.
/// 모든 입력 조합에 대해 정의된 9개 코드 중 하나를 반환한다.
pub fn classify<F>(
    signals: &Signals,
    labels: &Labels,
    threshold: f64,
    color_probe: F,
) -> Classification
where
    F: Fn(Point) -> bool,
{
    // 매칭된 후보의 영역
    let find = |candidates: &[TextCandidate], label: &str| {
        find_best_match_with(candidates, label, threshold).map(|m| m.region)
    };
    let has = |candidates: &[TextCandidate], label: &str| {
        find_best_match_with(candidates, label, threshold).is_some()
    };

    let result = if signals.window_present {
        match find(&signals.narrow_candidates, &labels.assistant_title) {
            Some(region) if color_probe(region.anchor()) => {
                Classification::bare(StatusCode::DialogSelected)
            }
            Some(region) => Classification::at(StatusCode::DialogNotSelected, region.center()),
            None => Classification::bare(StatusCode::AssistantNotFound),
        }
    } else if let Some(payload) = &signals.symbol_payload {
        Classification::text(StatusCode::LoginQrDetected, payload.clone())
    } else {
        let full = &signals.full_candidates;
        if has(full, &labels.current_account) && has(full, &labels.logout) {
            Classification::bare(StatusCode::AccountLoggedOut)
        } else if let Some(region) = find(full, &labels.switch_account) {
            Classification::at(StatusCode::SwitchingAccount, region.center())
        } else if has(full, &labels.entering) {
            Classification::bare(StatusCode::LoggingIn)
        } else if has(full, &labels.phone) && has(full, &labels.login) {
            Classification::bare(StatusCode::MobileLoginRequired)
        } else {
            Classification::bare(StatusCode::UnknownScreen)
        }
    };

    debug!(
        code = result.code().code(),
        window_present = signals.window_present,
        region = ?signals.region_variant,
        narrow = signals.narrow_candidates.len(),
        full = signals.full_candidates.len(),
        symbol = signals.symbol_payload.is_some(),
        "분류 완료"
    );

    result
}
