//! SQLite 상태 저장소.
//!
//! `StatusStore` 포트 구현. `publish`는 한 트랜잭션 안에서
//! `DELETE` + `INSERT`를 수행하므로, WAL 모드에서 다른 연결의 독자는
//! 이전 행 또는 새 행만 보고 0행 상태는 보지 못한다.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};
use wxwatch_core::error::CoreError;
use wxwatch_core::models::status::{Classification, StatusRecord};
use wxwatch_core::ports::storage::StatusStore;

use crate::migration;

/// 잠긴 DB를 기다리는 최대 시간
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite 상태 저장소: `StatusStore` 포트 구현
pub struct SqliteStatusStore {
    conn: Mutex<Connection>,
}

impl SqliteStatusStore {
    /// 파일 기반 SQLite 저장소 생성
    ///
    /// 상위 디렉토리가 없으면 만든다.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| CoreError::Storage(format!("SQLite 열기 실패: {e}")))?;

        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            ",
        )
        .map_err(|e| CoreError::Storage(format!("PRAGMA 설정 실패: {e}")))?;

        let store = Self::init(conn)?;
        info!("SQLite 상태 저장소 초기화: {}", path.display());
        Ok(store)
    }

    /// 인메모리 SQLite 저장소 생성 (테스트용)
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::Storage(format!("인메모리 SQLite 생성 실패: {e}")))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, CoreError> {
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| CoreError::Storage(format!("busy_timeout 설정 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Storage(format!("마이그레이션 실패: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 상태 행 덮어쓰기 (동기)
    ///
    /// 전체 삭제 + 한 행 삽입을 한 트랜잭션으로 커밋한다.
    pub fn write_record(&self, record: &StatusRecord) -> Result<(), CoreError> {
        let mut conn = self.conn.lock();

        let tx = conn
            .transaction()
            .map_err(|e| CoreError::Storage(format!("트랜잭션 시작 실패: {e}")))?;

        tx.execute("DELETE FROM status", [])
            .map_err(|e| CoreError::Storage(format!("상태 삭제 실패: {e}")))?;

        tx.execute(
            "INSERT INTO status (code, content, updated_at) VALUES (?1, ?2, ?3)",
            params![record.code, record.content, record.updated_at.to_rfc3339()],
        )
        .map_err(|e| CoreError::Storage(format!("상태 저장 실패: {e}")))?;

        tx.commit()
            .map_err(|e| CoreError::Storage(format!("트랜잭션 커밋 실패: {e}")))?;

        debug!("상태 저장: {} {}", record.code, record.content);
        Ok(())
    }

    /// 현재 상태 행 조회 (동기)
    pub fn read_record(&self) -> Result<Option<StatusRecord>, CoreError> {
        let conn = self.conn.lock();

        let row = conn
            .query_row(
                "SELECT code, content, updated_at FROM status LIMIT 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| CoreError::Storage(format!("상태 조회 실패: {e}")))?;

        row.map(|(code, content, updated_at)| {
            Ok(StatusRecord {
                code,
                content,
                updated_at: parse_timestamp(&updated_at)?,
            })
        })
        .transpose()
    }

    /// 상태 행 수 (항상 0 또는 1)
    pub fn row_count(&self) -> Result<u64, CoreError> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM status", [], |row| row.get(0))
            .map_err(|e| CoreError::Storage(format!("행 수 조회 실패: {e}")))
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, CoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CoreError::Storage(format!("잘못된 updated_at {raw:?}: {e}")))
}

#[async_trait]
impl StatusStore for SqliteStatusStore {
    async fn publish(&self, classification: &Classification) -> Result<(), CoreError> {
        self.write_record(&classification.to_record(Utc::now()))
    }

    async fn latest(&self) -> Result<Option<StatusRecord>, CoreError> {
        self.read_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;
    use wxwatch_core::models::geometry::Point;
    use wxwatch_core::models::status::{Payload, StatusCode};

    fn classification(code: StatusCode, payload: Payload) -> Classification {
        Classification::new(code, payload).unwrap()
    }

    #[tokio::test]
    async fn empty_store_has_no_row() {
        let store = SqliteStatusStore::open_in_memory().unwrap();
        assert!(store.latest().await.unwrap().is_none());
        assert_eq!(store.row_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn publish_overwrites_single_row() {
        let store = SqliteStatusStore::open_in_memory().unwrap();

        store
            .publish(&classification(StatusCode::UnknownScreen, Payload::None))
            .await
            .unwrap();
        store
            .publish(&classification(
                StatusCode::DialogNotSelected,
                Payload::Coordinate(Point::new(168, 91)),
            ))
            .await
            .unwrap();

        assert_eq!(store.row_count().unwrap(), 1);
        let row = store.latest().await.unwrap().unwrap();
        assert_eq!(row.code, "101");
        assert_eq!(row.content, "(168, 91)");
    }

    #[tokio::test]
    async fn same_code_twice_keeps_one_row() {
        let store = SqliteStatusStore::open_in_memory().unwrap();
        let qr = classification(
            StatusCode::LoginQrDetected,
            Payload::Text("https://weixin.qq.com/x".into()),
        );
        store.publish(&qr).await.unwrap();
        store.publish(&qr).await.unwrap();

        assert_eq!(store.row_count().unwrap(), 1);
        let row = store.latest().await.unwrap().unwrap();
        assert_eq!(Classification::from_record(&row).unwrap(), qr);
    }

    #[tokio::test]
    async fn file_store_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("wxwatch.db");

        {
            let store = SqliteStatusStore::open(&path).unwrap();
            store
                .publish(&classification(StatusCode::LoggingIn, Payload::None))
                .await
                .unwrap();
        }

        let reopened = SqliteStatusStore::open(&path).unwrap();
        let row = reopened.latest().await.unwrap().unwrap();
        assert_eq!(row.code, "202");
        assert_eq!(row.content, "None");
    }

    #[test]
    fn corrupt_timestamp_is_storage_error() {
        let store = SqliteStatusStore::open_in_memory().unwrap();
        store
            .conn
            .lock()
            .execute(
                "INSERT INTO status (code, content, updated_at) VALUES ('900', 'None', 'yesterday')",
                [],
            )
            .unwrap();
        assert_matches!(store.read_record(), Err(CoreError::Storage(_)));
    }

    /// 다른 연결의 독자는 publish 도중에도 0행을 보지 않는다
    #[test]
    fn concurrent_reader_never_sees_empty_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wxwatch.db");
        let store = Arc::new(SqliteStatusStore::open(&path).unwrap());

        let first = classification(StatusCode::UnknownScreen, Payload::None).to_record(Utc::now());
        store.write_record(&first).unwrap();

        let done = Arc::new(AtomicBool::new(false));
        let writer = {
            let store = Arc::clone(&store);
            let done = Arc::clone(&done);
            std::thread::spawn(move || {
                for i in 0..300 {
                    let c = if i % 2 == 0 {
                        classification(StatusCode::LoggingIn, Payload::None)
                    } else {
                        classification(
                            StatusCode::SwitchingAccount,
                            Payload::Coordinate(Point::new(i, i)),
                        )
                    };
                    store.write_record(&c.to_record(Utc::now())).unwrap();
                }
                done.store(true, Ordering::SeqCst);
            })
        };

        let reader = Connection::open(&path).unwrap();
        reader.busy_timeout(BUSY_TIMEOUT).unwrap();
        while !done.load(Ordering::SeqCst) {
            let count: i64 = reader
                .query_row("SELECT COUNT(*) FROM status", [], |row| row.get(0))
                .unwrap();
            assert_eq!(count, 1, "독자가 {count}행을 관측함");
        }

        writer.join().unwrap();
        assert_eq!(store.row_count().unwrap(), 1);
    }
}
