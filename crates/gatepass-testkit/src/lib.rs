//! # Gatepass Testkit
//!
//! Testing utilities for the Gatepass storage backends.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: ready-made table specs, drafts, and installed stores
//! - **Generators**: proptest strategies for records and identifiers
//!
//! The cross-backend conformance suite lives in this crate's `tests/`
//! directory, so SQLite and the in-memory fake are exercised against
//! identical scenarios.
//!
//! ## Fixtures
//!
//! ```rust
//! use gatepass_testkit::fixtures::{challenge_draft, test_table_spec};
//!
//! let spec = test_table_spec();
//! assert_eq!(spec.id_len, 8);
//!
//! let draft = challenge_draft().expires_at(2000).build();
//! assert!(draft.valid);
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{challenge_draft, test_table_spec, ChallengeDraftBuilder, StaticEntityColumns};
pub use generators::{challenge_id, new_challenge};
