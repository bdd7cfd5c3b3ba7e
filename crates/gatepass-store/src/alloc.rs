//! Identifier allocation on top of any [`ChallengeStore`].
//!
//! A candidate id is random, so collisions are astronomically unlikely for
//! reasonable lengths; the existence pre-check closes the window
//! deterministically instead of relying on probability alone. The pre-check
//! does not reserve the id, so creation still races against concurrent
//! creators — the table's primary-key constraint is the authoritative
//! backstop, and [`ChallengeStoreExt::create`] translates a constraint hit
//! into another allocation round.

use gatepass_core::{ChallengeId, ChallengeRecord, NewChallenge};

use crate::error::{Result, StoreError};
use crate::traits::{ChallengeStore, InsertOutcome};

/// Attempt bound used by [`ChallengeStoreExt::create`].
pub const CREATE_MAX_ATTEMPTS: u32 = 10;

/// Extension trait: id allocation and record creation.
///
/// Blanket-implemented for every [`ChallengeStore`], so both backends (and
/// any future one) get creation semantics for free.
pub trait ChallengeStoreExt: ChallengeStore {
    /// Allocate a fresh id of exactly `len` hex characters.
    ///
    /// Each attempt generates a candidate and queries the store for it,
    /// regenerating on collision. With `max_attempts: Some(k)` the loop
    /// fails after exactly k attempts with
    /// [`StoreError::AllocationExhausted`]; with `None` it retries
    /// unboundedly (caller-chosen risk).
    fn allocate_id(
        &self,
        len: usize,
        max_attempts: Option<u32>,
    ) -> impl std::future::Future<Output = Result<ChallengeId>> + Send;

    /// Allocate an id and insert a new record, returning the stored record
    /// including the generated id.
    fn create(
        &self,
        draft: NewChallenge,
        id_len: usize,
    ) -> impl std::future::Future<Output = Result<ChallengeRecord>> + Send;
}

impl<S: ChallengeStore + ?Sized> ChallengeStoreExt for S {
    async fn allocate_id(&self, len: usize, max_attempts: Option<u32>) -> Result<ChallengeId> {
        let mut attempts = 0u32;
        loop {
            if let Some(max) = max_attempts {
                if attempts >= max {
                    return Err(StoreError::AllocationExhausted { attempts });
                }
            }
            let candidate = ChallengeId::random(len);
            attempts += 1;
            if !self.exists(&candidate).await? {
                return Ok(candidate);
            }
        }
    }

    async fn create(&self, draft: NewChallenge, id_len: usize) -> Result<ChallengeRecord> {
        let mut attempts = 0u32;
        while attempts < CREATE_MAX_ATTEMPTS {
            let id = self.allocate_id(id_len, Some(CREATE_MAX_ATTEMPTS)).await?;
            let record = draft.clone().into_record(id);
            match self.insert(&record).await? {
                InsertOutcome::Inserted => return Ok(record),
                // Lost the check-then-insert race: another creator took the
                // candidate between our existence query and the insert.
                InsertOutcome::DuplicateId => attempts += 1,
            }
        }
        Err(StoreError::AllocationExhausted {
            attempts: CREATE_MAX_ATTEMPTS,
        })
    }
}
