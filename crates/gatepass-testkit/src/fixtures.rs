//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use gatepass_core::{ColumnType, EntityIdColumns, NewChallenge, TableSpec};

/// Entity-factory capability with fixed column types, for tests that only
/// care that the values round-trip.
pub struct StaticEntityColumns;

impl EntityIdColumns for StaticEntityColumns {
    fn client_id_column(&self) -> ColumnType {
        ColumnType::varchar(64)
    }

    fn mask_id_column(&self) -> ColumnType {
        ColumnType::varchar(64)
    }

    fn user_id_column(&self) -> ColumnType {
        ColumnType::varchar(64)
    }
}

/// The table spec used across the conformance suite: 8-char ids,
/// 4-char answers, string-typed foreign references.
pub fn test_table_spec() -> TableSpec {
    TableSpec::resolve(8, 4, &StaticEntityColumns)
}

/// Builder for challenge drafts with sensible test defaults.
pub struct ChallengeDraftBuilder {
    draft: NewChallenge,
}

impl ChallengeDraftBuilder {
    pub fn answer(mut self, answer: &str) -> Self {
        self.draft.answer = answer.to_owned();
        self
    }

    pub fn client_id(mut self, client_id: &str) -> Self {
        self.draft.client_id = Some(client_id.into());
        self
    }

    pub fn mask_id(mut self, mask_id: &str) -> Self {
        self.draft.mask_id = Some(mask_id.into());
        self
    }

    pub fn user_id(mut self, user_id: &str) -> Self {
        self.draft.user_id = Some(user_id.into());
        self
    }

    pub fn ip_address(mut self, ip: &str) -> Self {
        self.draft.ip_address = ip.to_owned();
        self
    }

    pub fn issued_at(mut self, at: u64) -> Self {
        self.draft.issued_at = at;
        self
    }

    pub fn expires_at(mut self, at: u64) -> Self {
        self.draft.expires_at = at;
        self
    }

    pub fn consumed(mut self) -> Self {
        self.draft.valid = false;
        self
    }

    pub fn build(self) -> NewChallenge {
        self.draft
    }
}

/// Start a draft: valid, unexpired for the next hour, no foreign
/// references.
pub fn challenge_draft() -> ChallengeDraftBuilder {
    let now = now_secs();
    ChallengeDraftBuilder {
        draft: NewChallenge {
            answer: "ABCD".to_owned(),
            client_id: None,
            mask_id: None,
            user_id: None,
            ip_address: "127.0.0.1".to_owned(),
            issued_at: now,
            expires_at: now + 3600,
            valid: true,
        },
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

    #[test]
    fn test_spec_resolves_static_columns() {
        let spec = test_table_spec();
        assert_eq!(spec.id_len, 8);
        assert_eq!(spec.answer_len, 4);
        assert_eq!(spec.client_id, ColumnType::varchar(64));
    }

    #[test]
    fn test_builder_overrides() {
        let draft = challenge_draft()
            .answer("ZZZZ")
            .client_id("app-1")
            .expires_at(42)
            .consumed()
            .build();

        assert_eq!(draft.answer, "ZZZZ");
        assert_eq!(draft.client_id, Some("app-1".into()));
        assert_eq!(draft.expires_at, 42);
        assert!(!draft.valid);
    }
}
