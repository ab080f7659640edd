//! # wxwatch
//!
//! WXWATCH 바이너리 진입점.
//! 설정 로드, 어댑터 조립(DI), 샘플링 루프와 라이프사이클 관리.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wxwatch_app::lifecycle::LifecycleManager;
use wxwatch_app::sampler::{SamplerPorts, StatusSampler};
use wxwatch_core::config::AppConfig;
use wxwatch_core::config_manager::{ConfigManager, DB_FILE_NAME};
use wxwatch_core::models::status::{Classification, StatusRecord};
use wxwatch_core::ports::storage::StatusStore;
use wxwatch_monitor::create_platform_locator;
use wxwatch_storage::sqlite::SqliteStatusStore;
use wxwatch_vision::capture::ScreenCapture;
use wxwatch_vision::local_ocr_provider::LocalOcrProvider;
use wxwatch_vision::qr::QrSymbolDecoder;

/// WXWATCH 상태 감시 데몬
///
/// 위챗 창 상태를 주기적으로 분류해서 단일 행 상태 DB에 기록한다.
#[derive(Parser, Debug)]
#[command(name = "wxwatch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 상태 DB 경로 (기본: 플랫폼 데이터 디렉토리의 wxwatch.db)
    #[arg(long)]
    db: Option<PathBuf>,

    /// 샘플링 간격 (밀리초)
    #[arg(long)]
    poll_interval: Option<u64>,

    /// 대상 창 제목 (부분 일치)
    #[arg(long, short = 'w')]
    window_title: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 한 사이클만 실행하고 결과 출력
    #[arg(long)]
    once: bool,

    /// 저장된 상태 행 출력 후 종료
    #[arg(long)]
    print_status: bool,
}

/// 설정 로드 + CLI 오버라이드
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone())
            .with_context(|| format!("설정 로드 실패: {}", path.display()))?
            .get(),
        None => match ConfigManager::new() {
            Ok(manager) => {
                info!("설정 파일: {}", manager.config_path().display());
                manager.get()
            }
            Err(e) => {
                warn!("설정 파일 사용 불가, 기본값으로 실행: {e}");
                AppConfig::default_config()
            }
        },
    };

    if let Some(ms) = args.poll_interval {
        config.monitor.poll_interval_ms = ms;
    }
    if let Some(title) = &args.window_title {
        config.window.title = title.clone();
    }
    if let Some(db) = &args.db {
        config.storage.db_path = Some(db.clone());
    }

    config.validate()?;
    Ok(config)
}

/// 상태 DB 경로 결정 (CLI/설정 → 플랫폼 데이터 디렉토리 → 현재 디렉토리)
///
/// # 플랫폼별 기본 경로:
/// - macOS: `~/Library/Application Support/com.wxwatch.wxwatch/wxwatch.db`
/// - Windows: `%APPDATA%\wxwatch\wxwatch\data\wxwatch.db`
/// - Linux: `~/.local/share/wxwatch/wxwatch.db`
fn resolve_db_path(config: &AppConfig) -> PathBuf {
    config
        .storage
        .db_path
        .clone()
        .or_else(|| ConfigManager::default_db_path().ok())
        .unwrap_or_else(|| PathBuf::from(".").join(DB_FILE_NAME))
}

fn print_record(record: &StatusRecord) {
    match Classification::from_record(record) {
        Ok(c) => println!(
            "{} {} {} ({})",
            record.code,
            record.content,
            c.code().key(),
            record.updated_at.to_rfc3339()
        ),
        Err(_) => println!(
            "{} {} ({})",
            record.code,
            record.content,
            record.updated_at.to_rfc3339()
        ),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "wxwatch={},wxwatch_app={},wxwatch_core={},wxwatch_monitor={},wxwatch_vision={},wxwatch_storage={}",
        args.log_level, args.log_level, args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    let config = load_config(&args)?;
    let db_path = resolve_db_path(&config);
    let store = Arc::new(
        SqliteStatusStore::open(&db_path)
            .with_context(|| format!("상태 DB 열기 실패: {}", db_path.display()))?,
    );
    info!("상태 DB: {}", db_path.display());

    if args.print_status {
        match store.latest().await? {
            Some(record) => print_record(&record),
            None => println!("저장된 상태 없음"),
        }
        return Ok(());
    }

    if !LocalOcrProvider::is_enabled() {
        warn!("OCR 기능 비활성 빌드, 텍스트 인식 결과는 항상 비어 있음 (--features ocr)");
    }

    let capture = Arc::new(ScreenCapture::new());
    let ports = SamplerPorts {
        locator: create_platform_locator(),
        capturer: capture.clone(),
        recognizer: Arc::new(LocalOcrProvider::new(
            config.vision.tessdata_path.clone(),
            config.vision.ocr_language.clone(),
        )),
        pixels: capture,
        decoder: Arc::new(QrSymbolDecoder::new()),
        store: store.clone(),
    };
    let sampler = Arc::new(StatusSampler::from_config(&config, ports));

    if args.once {
        let result = sampler.run_cycle().await?;
        let record = store
            .latest()
            .await?
            .ok_or_else(|| anyhow!("사이클 후 상태 행이 없음"))?;
        info!("분류 결과: {}: {}", result.code(), result.code().description());
        print_record(&record);
        return Ok(());
    }

    info!("WXWATCH 시작");

    let lifecycle = Arc::new(LifecycleManager::new());
    let signal_task = {
        let lifecycle = Arc::clone(&lifecycle);
        tokio::spawn(async move { lifecycle.wait_for_signal().await })
    };

    sampler.run(lifecycle.subscribe()).await;
    signal_task.abort();

    info!("WXWATCH 종료");
    Ok(())
}
