//! SQLite implementation of the ChallengeStore trait.
//!
//! This is the primary storage backend for Gatepass. It uses rusqlite with
//! bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use gatepass_core::{ChallengeId, ChallengeRecord, ClientId, MaskId, TableSpec, UserId};

use crate::error::{Result, StoreError};
use crate::schema;
use crate::traits::{ChallengeStore, InsertOutcome};

/// SQLite-based challenge store.
///
/// Thread-safe via internal Mutex. Every operation runs on
/// `spawn_blocking` so the async runtime is never blocked on the
/// connection.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// The challenge table is NOT created here; provisioning is explicit
    /// via [`ChallengeStore::install`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run one blocking operation against the connection.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|e| {
                StoreError::Database(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                    Some(format!("mutex poisoned: {}", e)),
                ))
            })?;
            f(&conn)
        })
        .await
        .map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
                Some(format!("spawn_blocking failed: {}", e)),
            ))
        })?
    }
}

/// One row of the challenge table, as raw SQL values.
struct RawRow {
    captcha_id: String,
    captcha_ans: String,
    client_id: Option<String>,
    mask_uid: Option<String>,
    user_uid: Option<String>,
    ip_addr: String,
    issued: i64,
    expires: i64,
    valid: i64,
}

// Helper to read a row's columns; see decode_row for interpretation.
fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        captcha_id: row.get("captcha_id")?,
        captcha_ans: row.get("captcha_ans")?,
        client_id: row.get("client_id")?,
        mask_uid: row.get("mask_uid")?,
        user_uid: row.get("user_uid")?,
        ip_addr: row.get("ip_addr")?,
        issued: row.get("issued")?,
        expires: row.get("expires")?,
        valid: row.get("valid")?,
    })
}

/// Decode a raw row into a typed record.
///
/// Exhaustive over every column; any shape the decoder cannot interpret is
/// an integration fault surfaced as [`StoreError::InvalidData`], never a
/// silent default.
fn decode_row(raw: RawRow) -> Result<ChallengeRecord> {
    let id = ChallengeId::parse(raw.captcha_id)
        .map_err(|e| StoreError::InvalidData(e.to_string()))?;
    let valid = match raw.valid {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "valid flag out of range: {other}"
            )))
        }
    };
    Ok(ChallengeRecord {
        id,
        answer: raw.captcha_ans,
        client_id: raw.client_id.map(ClientId::from),
        mask_id: raw.mask_uid.map(MaskId::from),
        user_id: raw.user_uid.map(UserId::from),
        ip_address: raw.ip_addr,
        issued_at: raw.issued as u64,
        expires_at: raw.expires as u64,
        valid,
    })
}

/// True when an execute failed on the table's id uniqueness constraint.
fn is_duplicate_id(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[async_trait]
impl ChallengeStore for SqliteStore {
    async fn insert(&self, record: &ChallengeRecord) -> Result<InsertOutcome> {
        let record = record.clone();
        self.with_conn(move |conn| {
            let inserted = conn.execute(
                "INSERT INTO captcha_challenges (
                    captcha_id, captcha_ans, client_id, mask_uid, user_uid,
                    ip_addr, issued, expires, valid
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    record.id.as_str(),
                    record.answer,
                    record.client_id.as_ref().map(|c| c.as_str()),
                    record.mask_id.as_ref().map(|m| m.as_str()),
                    record.user_id.as_ref().map(|u| u.as_str()),
                    record.ip_address,
                    record.issued_at as i64,
                    record.expires_at as i64,
                    i64::from(record.valid),
                ],
            );
            match inserted {
                Ok(_) => Ok(InsertOutcome::Inserted),
                Err(e) if is_duplicate_id(&e) => Ok(InsertOutcome::DuplicateId),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn get(&self, id: &ChallengeId) -> Result<Option<ChallengeRecord>> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let raw = conn
                .query_row(
                    "SELECT captcha_id, captcha_ans, client_id, mask_uid, user_uid,
                            ip_addr, issued, expires, valid
                     FROM captcha_challenges WHERE captcha_id = ?1",
                    params![id.as_str()],
                    read_row,
                )
                .optional()?;
            raw.map(decode_row).transpose()
        })
        .await
    }

    async fn consume(&self, id: &ChallengeId) -> Result<()> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let affected = conn.execute(
                "UPDATE captcha_challenges SET valid = 0
                 WHERE captcha_id = ?1 AND valid = 1",
                params![id.as_str()],
            )?;
            if affected == 0 {
                return Err(StoreError::NotFound {
                    field: "captcha_id",
                });
            }
            Ok(())
        })
        .await
    }

    async fn exists(&self, id: &ChallengeId) -> Result<bool> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM captcha_challenges WHERE captcha_id = ?1)",
                params![id.as_str()],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
    }

    async fn purge(&self) -> Result<()> {
        let now = now_secs();
        self.with_conn(move |conn| {
            let removed = conn.execute(
                "DELETE FROM captcha_challenges WHERE valid = 0 OR expires < ?1",
                params![now as i64],
            )?;
            tracing::debug!(removed, "purged consumed and expired challenges");
            Ok(())
        })
        .await
    }

    async fn install(&self, spec: &TableSpec) -> Result<()> {
        let sql = schema::create_table_sql(spec);
        self.with_conn(move |conn| {
            conn.execute_batch(&sql)?;
            tracing::debug!(table = schema::TABLE, "installed challenge table");
            Ok(())
        })
        .await
    }

    async fn uninstall(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute_batch(&schema::drop_table_sql())?;
            tracing::debug!(table = schema::TABLE, "dropped challenge table");
            Ok(())
        })
        .await
    }

    async fn clear(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute_batch(&schema::clear_table_sql())?;
            Ok(())
        })
        .await
    }
}

/// Get current time in seconds.
fn now_secs() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::ChallengeStoreExt;
    use gatepass_core::{ColumnType, NewChallenge};

    fn table_spec() -> TableSpec {
        TableSpec {
            id_len: 8,
            answer_len: 4,
            client_id: ColumnType::varchar(64),
            mask_id: ColumnType::varchar(64),
            user_id: ColumnType::varchar(64),
        }
    }

    async fn installed_store() -> SqliteStore {
        let store = SqliteStore::open_memory().unwrap();
        store.install(&table_spec()).await.unwrap();
        store
    }

    fn draft(expires_at: u64, valid: bool) -> NewChallenge {
        NewChallenge {
            answer: "ABCD".to_owned(),
            client_id: None,
            mask_id: None,
            user_id: None,
            ip_address: "127.0.0.1".to_owned(),
            issued_at: 1000,
            expires_at,
            valid,
        }
    }

    fn far_future() -> u64 {
        now_secs() + 3600
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let store = installed_store().await;

        let record = store.create(draft(2000, true), 8).await.unwrap();
        assert_eq!(record.id.len(), 8);
        assert!(record
            .id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        let fetched = store.get(&record.id).await.unwrap().unwrap();
        assert_eq!(fetched, record);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = installed_store().await;
        let id = ChallengeId::parse("ffffffff").unwrap();
        assert_eq!(store.get(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_consume_is_single_use() {
        let store = installed_store().await;
        let record = store.create(draft(far_future(), true), 8).await.unwrap();

        store.consume(&record.id).await.unwrap();
        let fetched = store.get(&record.id).await.unwrap().unwrap();
        assert!(!fetched.valid);

        let second = store.consume(&record.id).await;
        assert!(matches!(
            second,
            Err(StoreError::NotFound {
                field: "captcha_id"
            })
        ));
    }

    #[tokio::test]
    async fn test_consume_missing_id_is_not_found() {
        let store = installed_store().await;
        let id = ChallengeId::parse("0123abcd").unwrap();
        let result = store.consume(&id).await;
        assert!(matches!(
            result,
            Err(StoreError::NotFound {
                field: "captcha_id"
            })
        ));
    }

    #[tokio::test]
    async fn test_purge_keeps_live_challenges() {
        let store = installed_store().await;

        let expired = store.create(draft(1, true), 8).await.unwrap();
        let live = store.create(draft(far_future(), true), 8).await.unwrap();

        store.purge().await.unwrap();

        assert!(!store.exists(&expired.id).await.unwrap());
        assert!(store.exists(&live.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_removes_consumed_challenges() {
        let store = installed_store().await;

        let consumed = store.create(draft(far_future(), true), 8).await.unwrap();
        store.consume(&consumed.id).await.unwrap();

        store.purge().await.unwrap();
        assert!(!store.exists(&consumed.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_insert_reports_duplicate_id() {
        let store = installed_store().await;
        let record = store.create(draft(2000, true), 8).await.unwrap();

        let outcome = store.insert(&record).await.unwrap();
        assert_eq!(outcome, InsertOutcome::DuplicateId);
    }

    #[tokio::test]
    async fn test_exists_lifecycle() {
        let store = installed_store().await;
        let record = store.create(draft(1, true), 8).await.unwrap();

        assert!(store.exists(&record.id).await.unwrap());
        store.purge().await.unwrap();
        assert!(!store.exists(&record.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_empties_the_table() {
        let store = installed_store().await;
        let record = store.create(draft(far_future(), true), 8).await.unwrap();

        store.clear().await.unwrap();
        assert!(!store.exists(&record.id).await.unwrap());

        // Table is still usable after clear.
        store.create(draft(far_future(), true), 8).await.unwrap();
    }

    #[tokio::test]
    async fn test_uninstall_drops_the_table() {
        let store = installed_store().await;
        store.uninstall().await.unwrap();

        let id = ChallengeId::parse("00000000").unwrap();
        assert!(matches!(
            store.exists(&id).await,
            Err(StoreError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_reopen_persists_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("challenges.db");

        let record = {
            let store = SqliteStore::open(&path).unwrap();
            store.install(&table_spec()).await.unwrap();
            store.create(draft(far_future(), true), 8).await.unwrap()
        };

        let reopened = SqliteStore::open(&path).unwrap();
        let fetched = reopened.get(&record.id).await.unwrap().unwrap();
        assert_eq!(fetched, record);
    }

    #[tokio::test]
    async fn test_optional_references_round_trip() {
        let store = installed_store().await;
        let mut fields = draft(2000, true);
        fields.client_id = Some("app-1".into());
        fields.user_id = Some("user-9".into());

        let record = store.create(fields, 8).await.unwrap();
        let fetched = store.get(&record.id).await.unwrap().unwrap();

        assert_eq!(fetched.client_id, Some("app-1".into()));
        assert_eq!(fetched.mask_id, None);
        assert_eq!(fetched.user_id, Some("user-9".into()));
    }

    #[tokio::test]
    async fn test_malformed_valid_flag_is_invalid_data() {
        let store = installed_store().await;
        let record = store.create(draft(2000, true), 8).await.unwrap();

        // Corrupt the flag out-of-band, as a drifted integration would.
        let id = record.id.clone();
        store
            .with_conn(move |conn| {
                conn.execute(
                    "UPDATE captcha_challenges SET valid = 7 WHERE captcha_id = ?1",
                    params![id.as_str()],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let result = store.get(&record.id).await;
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }
}
