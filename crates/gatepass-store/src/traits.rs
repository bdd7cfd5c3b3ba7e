//! ChallengeStore trait: the abstract interface for challenge persistence.
//!
//! This trait allows the authentication framework to be storage-agnostic.
//! Implementations include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use gatepass_core::{ChallengeId, ChallengeRecord, TableSpec};

use crate::error::Result;

/// Result of inserting a challenge record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Record was inserted successfully.
    Inserted,
    /// A record with the same id already exists. The allocator's pre-check
    /// lost the race; the caller should re-allocate and retry.
    DuplicateId,
}

/// The ChallengeStore trait: async interface for challenge persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the
/// runtime.
///
/// # Design Notes
///
/// - Every method is one I/O round-trip against the backing store.
/// - `insert` surfaces a primary-key collision as [`InsertOutcome::DuplicateId`]
///   instead of an opaque database fault, so creation can retry.
/// - `consume` carries its `valid = 1` predicate inside the UPDATE, making
///   it race-safe: exactly one concurrent consume can succeed per record.
/// - Provisioning (`install`/`uninstall`/`clear`) is run once per
///   deployment and is not part of steady-state concurrency concerns.
#[async_trait]
pub trait ChallengeStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Record Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a fully formed record.
    ///
    /// Most callers want [`ChallengeStoreExt::create`] instead, which
    /// allocates the id and owns the retry loop.
    ///
    /// [`ChallengeStoreExt::create`]: crate::alloc::ChallengeStoreExt::create
    async fn insert(&self, record: &ChallengeRecord) -> Result<InsertOutcome>;

    /// Look up a record by id.
    ///
    /// Returns `None` when no row matches; a malformed row shape is an
    /// error, never a silent default.
    async fn get(&self, id: &ChallengeId) -> Result<Option<ChallengeRecord>>;

    /// Mark a challenge as used: flip `valid` from true to false.
    ///
    /// The flip happens only if `valid` is currently true; the predicate is
    /// part of the update, not a separate read. Fails with
    /// `StoreError::NotFound` when the id is absent OR already consumed —
    /// the two are deliberately indistinguishable to the caller.
    async fn consume(&self, id: &ChallengeId) -> Result<()>;

    /// True iff at least one row has this id, regardless of validity or
    /// expiry.
    async fn exists(&self, id: &ChallengeId) -> Result<bool>;

    /// Delete every consumed or expired record.
    ///
    /// "Expired" means `expires < now`, evaluated once against the current
    /// wall-clock second. Periodic maintenance, not safety-critical.
    async fn purge(&self) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Provisioning Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create the backing table from a resolved [`TableSpec`].
    async fn install(&self, spec: &TableSpec) -> Result<()>;

    /// Drop the backing table.
    async fn uninstall(&self) -> Result<()>;

    /// Remove every row, keeping the table.
    async fn clear(&self) -> Result<()>;
}
