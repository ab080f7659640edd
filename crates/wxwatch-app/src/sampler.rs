//! 샘플링 사이클 드라이버.
//!
//! 고정 간격으로 한 사이클(신호 수집 → 분류 → 저장)을 실행한다.
//! 사이클은 겹치지 않는다. 한 사이클이 끝나야 다음 틱을 기다린다.
//!
//! 신호는 필요한 만큼만 수집한다:
//! 1. 창 탐색
//! 2. 창 있음 → 좌상단 일부(NARROW) OCR만
//! 3. 창 없음 → 전체 화면 QR 디코딩 → QR이 없고 (작은) 창이라도 찾았으면 창 전체(FULL) OCR
//!
//! 협력자 에러는 "없음"으로 낮춰서 분류기에 넘긴다 (`warn!` 로그).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use wxwatch_core::classifier::{SignalClassifier, Signals};
use wxwatch_core::config::{AppConfig, WindowConfig};
use wxwatch_core::error::CoreError;
use wxwatch_core::models::geometry::{RegionVariant, WindowBounds};
use wxwatch_core::models::status::Classification;
use wxwatch_core::models::text::TextCandidate;
use wxwatch_core::normalizer::{to_candidates, Whitelist};
use wxwatch_core::ports::monitor::WindowLocator;
use wxwatch_core::ports::ocr_provider::TextRecognizer;
use wxwatch_core::ports::storage::StatusStore;
use wxwatch_core::ports::vision::{PixelSampler, ScreenCapturer, SymbolDecoder};
use wxwatch_core::probe::ColorProbe;

/// 샘플러 설정
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// 사이클 간격
    pub poll_interval: Duration,
    /// 대상 창 설정
    pub window: WindowConfig,
    /// 선택 강조색 프로브
    pub probe: ColorProbe,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default_config())
    }
}

impl From<&AppConfig> for SamplerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            window: config.window.clone(),
            probe: config.probe.clone(),
        }
    }
}

/// 주입되는 협력자 묶음
#[derive(Clone)]
pub struct SamplerPorts {
    pub locator: Arc<dyn WindowLocator>,
    pub capturer: Arc<dyn ScreenCapturer>,
    pub recognizer: Arc<dyn TextRecognizer>,
    pub pixels: Arc<dyn PixelSampler>,
    pub decoder: Arc<dyn SymbolDecoder>,
    pub store: Arc<dyn StatusStore>,
}

/// 상태 샘플러 (사이클 드라이버)
pub struct StatusSampler {
    config: SamplerConfig,
    classifier: SignalClassifier,
    whitelist: Whitelist,
    ports: SamplerPorts,
}

impl StatusSampler {
    /// 새 샘플러 생성
    pub fn new(
        config: SamplerConfig,
        classifier: SignalClassifier,
        whitelist: Whitelist,
        ports: SamplerPorts,
    ) -> Self {
        Self {
            config,
            classifier,
            whitelist,
            ports,
        }
    }

    /// 앱 설정으로 샘플러 생성
    pub fn from_config(config: &AppConfig, ports: SamplerPorts) -> Self {
        Self::new(
            SamplerConfig::from(config),
            config.classifier(),
            config.whitelist(),
            ports,
        )
    }

    /// 한 사이클 실행: 신호 수집 → 분류 → 저장
    ///
    /// 분류는 항상 성공한다. 에러는 저장 실패뿐이다.
    pub async fn run_cycle(&self) -> Result<Classification, CoreError> {
        let signals = self.acquire_signals().await;

        let probe = &self.config.probe;
        let pixels = self.ports.pixels.as_ref();
        let classification = self
            .classifier
            .classify(&signals, |anchor| probe.matches(pixels, anchor));

        self.ports.store.publish(&classification).await?;

        debug!(
            code = classification.code().code(),
            content = %classification.payload().to_content(),
            "사이클 완료"
        );
        Ok(classification)
    }

    /// 원래 순서대로 필요한 신호만 수집
    pub async fn acquire_signals(&self) -> Signals {
        let window = &self.config.window;

        let located = match self.ports.locator.locate(&window.title).await {
            Ok(bounds) => bounds,
            Err(e) => {
                warn!("창 탐색 실패 ({}): {e}", self.ports.locator.name());
                None
            }
        };

        match located {
            Some(bounds) if bounds.meets_minimum(window.min_width, window.min_height) => {
                let region = bounds.region(RegionVariant::Narrow, window.narrow_limit());
                Signals::window_present(self.recognize_region(region).await)
            }
            _ => {
                let symbol = self.decode_screen().await;
                let full = match (&symbol, located) {
                    (None, Some(bounds)) => {
                        // 최소 크기 미만의 창 (로그인/QR 창)
                        let region = bounds.region(RegionVariant::Full, window.narrow_limit());
                        self.recognize_region(region).await
                    }
                    _ => Vec::new(),
                };
                Signals::window_absent(symbol, full)
            }
        }
    }

    /// 영역 캡처 → OCR → 정규화 후보
    async fn recognize_region(&self, region: WindowBounds) -> Vec<TextCandidate> {
        let frame = match self.ports.capturer.capture_region(region).await {
            Ok(Some(frame)) => frame,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("영역 캡처 실패: {e}");
                return Vec::new();
            }
        };

        match self.ports.recognizer.recognize(&frame).await {
            Ok(raw) => to_candidates(raw, frame.origin, &self.whitelist),
            Err(e) => {
                warn!("텍스트 인식 실패 ({}): {e}", self.ports.recognizer.provider_name());
                Vec::new()
            }
        }
    }

    /// 전체 화면 QR 디코딩
    async fn decode_screen(&self) -> Option<String> {
        let frame = match self.ports.capturer.capture_screen().await {
            Ok(Some(frame)) => frame,
            Ok(None) => return None,
            Err(e) => {
                warn!("화면 캡처 실패: {e}");
                return None;
            }
        };

        match self.ports.decoder.decode(&frame).await {
            Ok(symbol) => symbol,
            Err(e) => {
                warn!("QR 디코딩 실패: {e}");
                None
            }
        }
    }

    /// 종료 신호까지 고정 간격으로 사이클 실행
    ///
    /// 밀린 틱은 몰아서 실행하지 않고 뒤로 미룬다.
    /// 진행 중인 사이클은 끝까지 실행한 뒤 종료한다.
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) {
        info!(
            "샘플러 시작: 간격={}ms, 창 제목={:?}, 매칭 임계값={}",
            self.config.poll_interval.as_millis(),
            self.config.window.title,
            self.classifier.threshold()
        );

        let mut interval = tokio::time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown_rx.borrow_and_update() {
                break;
            }

            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.run_cycle().await {
                        warn!("상태 저장 실패: {e}");
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        // 송신자가 사라짐
                        break;
                    }
                }
            }
        }

        info!("샘플러 종료");
    }
}
