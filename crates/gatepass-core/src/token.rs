//! Random hex token generation.
//!
//! Challenge identifiers are short lowercase hex strings. They only need to
//! be collision-resistant against the set of currently live challenges; the
//! store's allocator verifies uniqueness before accepting a candidate.

use rand::RngCore;

/// Generate a random lowercase hex string of exactly `len` characters.
///
/// Draws `ceil(len / 2)` random bytes and truncates the encoding for odd
/// lengths, so every character position is uniform over the hex alphabet.
pub fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len.div_ceil(2)];
    rand::thread_rng().fill_bytes(&mut bytes);
    let mut encoded = hex::encode(bytes);
    encoded.truncate(len);
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_length() {
        assert_eq!(random_hex(0), "");
    }

    #[test]
    fn test_odd_length() {
        assert_eq!(random_hex(7).len(), 7);
    }

    proptest! {
        #[test]
        fn token_has_requested_length(len in 0usize..=128) {
            prop_assert_eq!(random_hex(len).len(), len);
        }

        #[test]
        fn token_is_lowercase_hex(len in 1usize..=128) {
            let token = random_hex(len);
            prop_assert!(token
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }
}
