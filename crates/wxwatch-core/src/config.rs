//! 애플리케이션 설정 구조체.
//!
//! 폴링 주기, 창 탐색, 라벨/화이트리스트, 매칭 임계값, 색상 프로브,
//! 저장소 경로, OCR 설정을 정의한다. JSON 파일에서 로드하며 누락된 필드는 기본값.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::classifier::{Labels, SignalClassifier};
use crate::error::CoreError;
use crate::matcher::DEFAULT_FALLBACK_THRESHOLD;
use crate::normalizer::Whitelist;
use crate::probe::ColorProbe;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 샘플링 주기 설정
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// 대상 창 설정
    #[serde(default)]
    pub window: WindowConfig,
    /// 라벨 매칭 설정
    #[serde(default)]
    pub matcher: MatcherConfig,
    /// 선택 강조색 프로브
    #[serde(default)]
    pub probe: ColorProbe,
    /// 분류 라벨
    #[serde(default)]
    pub labels: Labels,
    /// OCR 화이트리스트 (None이면 라벨 문자 합집합)
    #[serde(default)]
    pub whitelist: Option<String>,
    /// 상태 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 비전(OCR) 설정
    #[serde(default)]
    pub vision: VisionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

/// 샘플링 주기 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// 사이클 간격 (ms)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// 대상 창 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// 창 제목에 포함되어야 하는 문자열
    #[serde(default = "default_window_title")]
    pub title: String,
    /// "창 있음"으로 인정하는 최소 너비
    #[serde(default = "default_min_size")]
    pub min_width: u32,
    /// "창 있음"으로 인정하는 최소 높이
    #[serde(default = "default_min_size")]
    pub min_height: u32,
    /// NARROW 영역 최대 너비
    #[serde(default = "default_narrow_width")]
    pub narrow_width: u32,
    /// NARROW 영역 최대 높이
    #[serde(default = "default_narrow_height")]
    pub narrow_height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_window_title(),
            min_width: default_min_size(),
            min_height: default_min_size(),
            narrow_width: default_narrow_width(),
            narrow_height: default_narrow_height(),
        }
    }
}

impl WindowConfig {
    pub fn narrow_limit(&self) -> (u32, u32) {
        (self.narrow_width, self.narrow_height)
    }
}

/// 라벨 매칭 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// 이 값 미만의 유사도는 믿지 않고 부분 문자열 매칭으로 넘어감
    #[serde(default = "default_threshold")]
    pub fallback_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            fallback_threshold: default_threshold(),
        }
    }
}

/// 상태 저장소 설정
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite 파일 경로 (None이면 플랫폼 데이터 디렉토리)
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

/// 비전(OCR) 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Tesseract 언어 코드
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,
    /// tessdata 디렉토리 (None이면 시스템 기본값)
    #[serde(default)]
    pub tessdata_path: Option<PathBuf>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            ocr_language: default_ocr_language(),
            tessdata_path: None,
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    1000
}
fn default_window_title() -> String {
    "微信".to_string()
}
fn default_min_size() -> u32 {
    500
}
fn default_narrow_width() -> u32 {
    600
}
fn default_narrow_height() -> u32 {
    300
}
fn default_threshold() -> f64 {
    DEFAULT_FALLBACK_THRESHOLD
}
fn default_ocr_language() -> String {
    "chi_sim".to_string()
}

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            window: WindowConfig::default(),
            matcher: MatcherConfig::default(),
            probe: ColorProbe::default(),
            labels: Labels::default(),
            whitelist: None,
            storage: StorageConfig::default(),
            vision: VisionConfig::default(),
        }
    }

    /// 샘플링 주기를 Duration으로 반환
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.monitor.poll_interval_ms)
    }

    /// OCR 결과 필터용 화이트리스트
    pub fn whitelist(&self) -> Whitelist {
        match &self.whitelist {
            Some(alphabet) => Whitelist::new(alphabet),
            None => Whitelist::from_labels(self.labels.all()),
        }
    }

    /// 설정된 라벨/임계값의 분류기
    pub fn classifier(&self) -> SignalClassifier {
        SignalClassifier::new(self.labels.clone(), self.matcher.fallback_threshold)
    }

    /// 값 범위 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.monitor.poll_interval_ms == 0 {
            return Err(CoreError::validation(
                "monitor.poll_interval_ms",
                "0보다 커야 함",
            ));
        }
        if self.window.title.is_empty() {
            return Err(CoreError::validation("window.title", "비어 있으면 안 됨"));
        }
        if self.window.narrow_width == 0 || self.window.narrow_height == 0 {
            return Err(CoreError::validation(
                "window.narrow_width/narrow_height",
                "0보다 커야 함",
            ));
        }
        if !(0.0..=1.0).contains(&self.matcher.fallback_threshold) {
            return Err(CoreError::validation(
                "matcher.fallback_threshold",
                format!("0.0 ~ 1.0 범위여야 함: {}", self.matcher.fallback_threshold),
            ));
        }
        if self.labels.all().iter().any(|l| l.is_empty()) {
            return Err(CoreError::validation("labels", "빈 라벨은 허용되지 않음"));
        }
        // 화이트리스트 밖의 글자는 정규화에서 지워지므로 그 라벨은 정확 일치할 수 없다
        let whitelist = self.whitelist();
        if let Some(label) = self
            .labels
            .all()
            .into_iter()
            .find(|l| !l.chars().all(|c| whitelist.contains(c)))
        {
            return Err(CoreError::validation(
                "whitelist",
                format!("라벨 {label:?}의 글자를 모두 포함해야 함"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::geometry::Rgb;
    use crate::normalizer::DEFAULT_WHITELIST;
    use assert_matches::assert_matches;

    #[test]
    fn defaults() {
        let config = AppConfig::default_config();
        assert_eq!(config.poll_interval(), Duration::from_millis(1000));
        assert_eq!(config.window.title, "微信");
        assert_eq!(config.window.narrow_limit(), (600, 300));
        assert_eq!(config.window.min_width, 500);
        assert!((config.matcher.fallback_threshold - 0.4).abs() < f64::EPSILON);
        assert_eq!(config.probe.reference, Rgb::new(210, 210, 210));
        assert_eq!(config.probe.tolerance, 10);
        assert_eq!(config.vision.ocr_language, "chi_sim");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_whitelist_is_label_alphabet() {
        let config = AppConfig::default_config();
        assert_eq!(config.whitelist(), Whitelist::new(DEFAULT_WHITELIST));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{
            "monitor": { "poll_interval_ms": 250 },
            "window": { "title": "WeChat" },
            "probe": { "tolerance": 20 }
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.monitor.poll_interval_ms, 250);
        assert_eq!(config.window.title, "WeChat");
        assert_eq!(config.window.min_height, 500);
        assert_eq!(config.probe.tolerance, 20);
        assert_eq!(config.probe.offset_x, -2);
        assert_eq!(config.labels, Labels::default());
    }

    #[test]
    fn empty_json_is_default() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default_config());
    }

    #[test]
    fn explicit_whitelist_overrides_labels() {
        let config = AppConfig {
            whitelist: Some("登录".to_string()),
            ..AppConfig::default_config()
        };
        assert_eq!(config.whitelist().len(), 2);
    }

    #[test]
    fn whitelist_must_cover_labels() {
        let mut config = AppConfig {
            whitelist: Some("微信收款助手".to_string()),
            ..AppConfig::default_config()
        };
        assert_matches!(
            config.validate(),
            Err(CoreError::Validation { field, message })
                if field == "whitelist" && message.contains("当前账号")
        );

        config.whitelist = Some(format!("{DEFAULT_WHITELIST}ABC"));
        assert!(config.validate().is_ok());

        // 라벨을 바꾸면 기본 화이트리스트도 따라간다
        let mut config = AppConfig::default_config();
        config.labels.login = "登陆".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = AppConfig::default_config();
        config.monitor.poll_interval_ms = 0;
        assert_matches!(
            config.validate(),
            Err(CoreError::Validation { field, .. }) if field == "monitor.poll_interval_ms"
        );

        let mut config = AppConfig::default_config();
        config.matcher.fallback_threshold = 1.5;
        assert_matches!(config.validate(), Err(CoreError::Validation { .. }));

        let mut config = AppConfig::default_config();
        config.labels.phone.clear();
        assert_matches!(config.validate(), Err(CoreError::Validation { .. }));
    }
}
