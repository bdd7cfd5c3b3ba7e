//! Proptest generators for property-based testing.

use proptest::prelude::*;

use gatepass_core::{ChallengeId, NewChallenge};

/// Generate a random ChallengeId of exactly `len` characters.
pub fn challenge_id(len: usize) -> impl Strategy<Value = ChallengeId> {
    proptest::string::string_regex(&format!("[0-9a-f]{{{len}}}"))
        .expect("valid id regex")
        .prop_map(|s| ChallengeId::parse(s).expect("generated id is valid hex"))
}

/// Generate a challenge draft with arbitrary-but-plausible field values.
pub fn new_challenge() -> impl Strategy<Value = NewChallenge> {
    (
        "[A-Z0-9]{4}",
        proptest::option::of("[a-z0-9-]{1,16}"),
        proptest::option::of("[a-z0-9-]{1,16}"),
        proptest::option::of("[a-z0-9-]{1,16}"),
        "[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}",
        0u64..=u32::MAX as u64,
        0u64..=u32::MAX as u64,
        any::<bool>(),
    )
        .prop_map(
            |(answer, client_id, mask_id, user_id, ip_address, issued_at, expires_at, valid)| {
                NewChallenge {
                    answer,
                    client_id: client_id.map(Into::into),
                    mask_id: mask_id.map(Into::into),
                    user_id: user_id.map(Into::into),
                    ip_address,
                    issued_at,
                    expires_at,
                    valid,
                }
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_ids_have_requested_length(id in challenge_id(8)) {
            prop_assert_eq!(id.len(), 8);
        }

        #[test]
        fn drafts_survive_id_attachment(draft in new_challenge(), id in challenge_id(8)) {
            let record = draft.clone().into_record(id.clone());
            prop_assert_eq!(record.id, id);
            prop_assert_eq!(record.answer, draft.answer);
            prop_assert_eq!(record.valid, draft.valid);
        }
    }
}
