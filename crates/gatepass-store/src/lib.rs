//! # Gatepass Store
//!
//! Storage backend for Gatepass captcha challenges. Provides a trait-based
//! interface for challenge persistence with SQLite and in-memory
//! implementations.
//!
//! ## Overview
//!
//! The store module abstracts challenge storage behind the
//! [`ChallengeStore`] trait, so the authentication framework above it is
//! storage-agnostic. The primary implementation is [`SqliteStore`], with
//! [`MemoryStore`] for testing. Identifier allocation lives in
//! [`ChallengeStoreExt`] and is shared by every backend.
//!
//! ## Key Types
//!
//! - [`ChallengeStore`] - The async trait for all storage operations
//! - [`ChallengeStoreExt`] - Id allocation and record creation
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`InsertOutcome`] - Result of inserting a record
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gatepass_core::{ColumnType, NewChallenge, TableSpec};
//! use gatepass_store::{ChallengeStore, ChallengeStoreExt, SqliteStore};
//!
//! async fn example() {
//!     let store = SqliteStore::open("challenges.db").unwrap();
//!
//!     // Provision once per deployment. The column types for the three
//!     // foreign references come from the external entity factories.
//!     let spec = TableSpec {
//!         id_len: 8,
//!         answer_len: 4,
//!         client_id: ColumnType::varchar(64),
//!         mask_id: ColumnType::varchar(64),
//!         user_id: ColumnType::varchar(64),
//!     };
//!     store.install(&spec).await.unwrap();
//!
//!     let draft = NewChallenge {
//!         answer: "ABCD".to_owned(),
//!         client_id: None,
//!         mask_id: None,
//!         user_id: None,
//!         ip_address: "127.0.0.1".to_owned(),
//!         issued_at: 1000,
//!         expires_at: 2000,
//!         valid: true,
//!     };
//!     let record = store.create(draft, 8).await.unwrap();
//!
//!     store.consume(&record.id).await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Checked allocation**: candidate ids are verified against the store
//!   before use; a lost check-then-insert race surfaces as
//!   [`InsertOutcome::DuplicateId`] and triggers re-allocation.
//! - **Single-use consume**: the `valid` predicate rides inside the UPDATE,
//!   so exactly one concurrent consume can succeed per record.
//! - **Purge is maintenance**: it removes rows that are already logically
//!   dead (consumed or expired) and is safe to run concurrently with
//!   everything else.

pub mod alloc;
pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use alloc::{ChallengeStoreExt, CREATE_MAX_ATTEMPTS};
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{ChallengeStore, InsertOutcome};
