//! In-memory implementation of the ChallengeStore trait.
//!
//! This is primarily for testing. It has the same operation semantics as
//! SQLite but keeps everything in memory with no persistence. Provisioning
//! is structural: the fake has no schema, so `install` only resets state
//! and `uninstall` behaves like `clear`.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use gatepass_core::{ChallengeId, ChallengeRecord, TableSpec};

use crate::error::{Result, StoreError};
use crate::traits::{ChallengeStore, InsertOutcome};

/// In-memory challenge store.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    records: RwLock<HashMap<ChallengeId, ChallengeRecord>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChallengeStore for MemoryStore {
    async fn insert(&self, record: &ChallengeRecord) -> Result<InsertOutcome> {
        let mut records = self.records.write().unwrap();
        if records.contains_key(&record.id) {
            return Ok(InsertOutcome::DuplicateId);
        }
        records.insert(record.id.clone(), record.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn get(&self, id: &ChallengeId) -> Result<Option<ChallengeRecord>> {
        let records = self.records.read().unwrap();
        Ok(records.get(id).cloned())
    }

    async fn consume(&self, id: &ChallengeId) -> Result<()> {
        let mut records = self.records.write().unwrap();
        match records.get_mut(id) {
            Some(record) if record.valid => {
                record.valid = false;
                Ok(())
            }
            // Absent and already-consumed are indistinguishable, matching
            // the conditional UPDATE's affected-row check.
            _ => Err(StoreError::NotFound {
                field: "captcha_id",
            }),
        }
    }

    async fn exists(&self, id: &ChallengeId) -> Result<bool> {
        let records = self.records.read().unwrap();
        Ok(records.contains_key(id))
    }

    async fn purge(&self) -> Result<()> {
        let now = now_secs();
        let mut records = self.records.write().unwrap();
        records.retain(|_, record| record.valid && record.expires_at >= now);
        Ok(())
    }

    async fn install(&self, _spec: &TableSpec) -> Result<()> {
        let mut records = self.records.write().unwrap();
        records.clear();
        Ok(())
    }

    async fn uninstall(&self) -> Result<()> {
        let mut records = self.records.write().unwrap();
        records.clear();
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut records = self.records.write().unwrap();
        records.clear();
        Ok(())
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
