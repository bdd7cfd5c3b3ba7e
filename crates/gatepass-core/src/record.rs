//! The challenge record and its pre-allocation draft.

use serde::{Deserialize, Serialize};

use crate::types::{ChallengeId, ClientId, MaskId, UserId};

/// A single captcha challenge as stored by the backend.
///
/// `valid` means "unused and not yet consumed" — it says nothing about
/// whether the answer is correct. `issued_at` and `expires_at` are absolute
/// Unix timestamps in seconds; the store interprets `expires_at` only
/// during purge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    pub id: ChallengeId,
    pub answer: String,
    pub client_id: Option<ClientId>,
    pub mask_id: Option<MaskId>,
    pub user_id: Option<UserId>,
    pub ip_address: String,
    pub issued_at: u64,
    pub expires_at: u64,
    pub valid: bool,
}

/// Everything the caller supplies when creating a challenge.
///
/// The identifier is allocated by the store, so a draft carries every field
/// of [`ChallengeRecord`] except `id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChallenge {
    pub answer: String,
    pub client_id: Option<ClientId>,
    pub mask_id: Option<MaskId>,
    pub user_id: Option<UserId>,
    pub ip_address: String,
    pub issued_at: u64,
    pub expires_at: u64,
    pub valid: bool,
}

impl NewChallenge {
    /// Attach an allocated identifier, producing the full record.
    pub fn into_record(self, id: ChallengeId) -> ChallengeRecord {
        ChallengeRecord {
            id,
            answer: self.answer,
            client_id: self.client_id,
            mask_id: self.mask_id,
            user_id: self.user_id,
            ip_address: self.ip_address,
            issued_at: self.issued_at,
            expires_at: self.expires_at,
            valid: self.valid,
        }
    }
}
