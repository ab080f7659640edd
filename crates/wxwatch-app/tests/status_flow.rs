//! 샘플링 사이클 → 파일 DB → 외부 독자 통합 테스트.
//!
//! 대시보드처럼 별도 rusqlite 연결로 상태 행을 읽는다.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::RgbaImage;
use parking_lot::Mutex;
use rusqlite::Connection;
use tempfile::TempDir;
use wxwatch_app::lifecycle::LifecycleManager;
use wxwatch_app::sampler::{SamplerPorts, StatusSampler};
use wxwatch_core::config::AppConfig;
use wxwatch_core::error::CoreError;
use wxwatch_core::models::frame::Frame;
use wxwatch_core::models::geometry::{Point, Rgb, WindowBounds};
use wxwatch_core::models::status::{Classification, StatusCode, StatusRecord};
use wxwatch_core::models::text::RecognizedText;
use wxwatch_core::ports::monitor::WindowLocator;
use wxwatch_core::ports::ocr_provider::TextRecognizer;
use wxwatch_core::ports::vision::{PixelSampler, ScreenCapturer, SymbolDecoder};
use wxwatch_storage::sqlite::SqliteStatusStore;

/// 테스트가 바꿔 끼울 수 있는 화면 상태
#[derive(Clone)]
struct Screen {
    window: Option<WindowBounds>,
    texts: Vec<&'static str>,
    qr: Option<&'static str>,
    pixel: Rgb,
}

#[derive(Clone)]
struct FakeDesktop(Arc<Mutex<Screen>>);

impl FakeDesktop {
    fn new(screen: Screen) -> Self {
        Self(Arc::new(Mutex::new(screen)))
    }

    fn set(&self, screen: Screen) {
        *self.0.lock() = screen;
    }
}

#[async_trait]
impl WindowLocator for FakeDesktop {
    async fn locate(&self, _title: &str) -> Result<Option<WindowBounds>, CoreError> {
        Ok(self.0.lock().window)
    }

    fn name(&self) -> &str {
        "fake-desktop"
    }
}

#[async_trait]
impl ScreenCapturer for FakeDesktop {
    async fn capture_region(&self, region: WindowBounds) -> Result<Option<Frame>, CoreError> {
        Ok(Some(Frame::new(
            region.origin(),
            RgbaImage::new(region.width, region.height),
        )))
    }

    async fn capture_screen(&self) -> Result<Option<Frame>, CoreError> {
        Ok(Some(Frame::new(Point::new(0, 0), RgbaImage::new(32, 32))))
    }
}

#[async_trait]
impl TextRecognizer for FakeDesktop {
    async fn recognize(&self, _frame: &Frame) -> Result<Vec<RecognizedText>, CoreError> {
        let texts = self.0.lock().texts.clone();
        Ok(texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let y = 20.0 + 40.0 * i as f32;
                RecognizedText {
                    text: text.to_string(),
                    quad: [(10.0, y), (90.0, y), (90.0, y + 20.0), (10.0, y + 20.0)],
                    confidence: 0.85,
                }
            })
            .collect())
    }

    fn provider_name(&self) -> &str {
        "fake-desktop"
    }
}

impl PixelSampler for FakeDesktop {
    fn sample(&self, _point: Point) -> Result<Option<Rgb>, CoreError> {
        Ok(Some(self.0.lock().pixel))
    }
}

#[async_trait]
impl SymbolDecoder for FakeDesktop {
    async fn decode(&self, _frame: &Frame) -> Result<Option<String>, CoreError> {
        Ok(self.0.lock().qr.map(str::to_string))
    }
}

fn main_window() -> Option<WindowBounds> {
    Some(WindowBounds {
        x: 0,
        y: 0,
        width: 1200,
        height: 800,
    })
}

fn sampler_on(desktop: &FakeDesktop, store: Arc<SqliteStatusStore>, poll_ms: u64) -> StatusSampler {
    let mut config = AppConfig::default_config();
    config.monitor.poll_interval_ms = poll_ms;

    let ports = SamplerPorts {
        locator: Arc::new(desktop.clone()),
        capturer: Arc::new(desktop.clone()),
        recognizer: Arc::new(desktop.clone()),
        pixels: Arc::new(desktop.clone()),
        decoder: Arc::new(desktop.clone()),
        store,
    };
    StatusSampler::from_config(&config, ports)
}

/// 대시보드 쪽 독자: 별도 연결
fn read_rows(path: &Path) -> Vec<(String, String)> {
    let conn = Connection::open(path).unwrap();
    let mut stmt = conn.prepare("SELECT code, content FROM status").unwrap();
    stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[tokio::test]
async fn cycles_overwrite_single_row() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("wxwatch.db");
    let store = Arc::new(SqliteStatusStore::open(&db_path).unwrap());

    let desktop = FakeDesktop::new(Screen {
        window: main_window(),
        texts: vec!["微信收款助手"],
        qr: None,
        pixel: Rgb::new(255, 255, 255),
    });
    let sampler = sampler_on(&desktop, store.clone(), 1000);

    sampler.run_cycle().await.unwrap();
    // NARROW 후보 (10..90, 20..40) → 중심 (50, 30)
    assert_eq!(
        read_rows(&db_path),
        vec![("101".to_string(), "(50, 30)".to_string())]
    );

    // 사용자가 대화창을 클릭함
    let current = desktop.0.lock().clone();
    desktop.set(Screen {
        pixel: Rgb::new(212, 208, 210),
        ..current
    });
    sampler.run_cycle().await.unwrap();
    assert_eq!(
        read_rows(&db_path),
        vec![("100".to_string(), "None".to_string())]
    );

    // 로그아웃 → 로그인 QR
    desktop.set(Screen {
        window: None,
        texts: vec![],
        qr: Some("https://login.weixin.qq.com/l/abc"),
        pixel: Rgb::new(0, 0, 0),
    });
    sampler.run_cycle().await.unwrap();
    assert_eq!(
        read_rows(&db_path),
        vec![(
            "300".to_string(),
            "https://login.weixin.qq.com/l/abc".to_string()
        )]
    );
}

#[tokio::test]
async fn stored_row_parses_back_for_consumers() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("wxwatch.db");
    let store = Arc::new(SqliteStatusStore::open(&db_path).unwrap());

    let desktop = FakeDesktop::new(Screen {
        window: Some(WindowBounds {
            x: 300,
            y: 200,
            width: 280,
            height: 400,
        }),
        texts: vec!["当前账号", "退出登录"],
        qr: None,
        pixel: Rgb::new(0, 0, 0),
    });
    let sampler = sampler_on(&desktop, store.clone(), 1000);
    let produced = sampler.run_cycle().await.unwrap();
    assert_eq!(produced.code(), StatusCode::AccountLoggedOut);

    let (code, content) = read_rows(&db_path).remove(0);
    let record = StatusRecord {
        code,
        content,
        updated_at: chrono::Utc::now(),
    };
    assert_eq!(Classification::from_record(&record).unwrap(), produced);
}

#[tokio::test]
async fn daemon_loop_publishes_until_shutdown() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("wxwatch.db");
    let store = Arc::new(SqliteStatusStore::open(&db_path).unwrap());

    let desktop = FakeDesktop::new(Screen {
        window: None,
        texts: vec![],
        qr: None,
        pixel: Rgb::new(0, 0, 0),
    });
    let sampler = Arc::new(sampler_on(&desktop, store.clone(), 20));
    let lifecycle = LifecycleManager::new();

    let task = {
        let sampler = Arc::clone(&sampler);
        let rx = lifecycle.subscribe();
        tokio::spawn(async move { sampler.run(rx).await })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(
        read_rows(&db_path),
        vec![("900".to_string(), "None".to_string())]
    );

    desktop.set(Screen {
        window: None,
        texts: vec![],
        qr: Some("qr-payload"),
        pixel: Rgb::new(0, 0, 0),
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    lifecycle.shutdown();
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        read_rows(&db_path),
        vec![("300".to_string(), "qr-payload".to_string())]
    );
    assert!(lifecycle.is_shutting_down());
}
