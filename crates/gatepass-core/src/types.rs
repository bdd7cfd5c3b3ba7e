//! Strong type definitions for Gatepass.
//!
//! All identifiers are newtypes to prevent misuse at compile time. The
//! foreign references ([`ClientId`], [`MaskId`], [`UserId`]) are opaque to
//! this crate; their wire and column shapes belong to the entity factories
//! that mint them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;
use crate::token::random_hex;

/// A challenge identifier: a fixed-length lowercase hex token.
///
/// This is the primary key of the backing table. The length is chosen by
/// the caller at creation time and fixed per deployment.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeId(String);

impl ChallengeId {
    /// Parse an identifier, validating the hex alphabet.
    pub fn parse(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        if s.is_empty() {
            return Err(CoreError::EmptyId);
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        {
            return Err(CoreError::MalformedId(s));
        }
        Ok(Self(s))
    }

    /// Generate a random identifier of exactly `len` hex characters.
    ///
    /// The result is uniform over the id space but NOT checked for
    /// uniqueness; that is the store allocator's job.
    pub fn random(len: usize) -> Self {
        Self(random_hex(len))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the identifier in characters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChallengeId({})", self.0)
    }
}

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ChallengeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

macro_rules! opaque_string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_string_id! {
    /// Reference to the API-client entity that requested the challenge.
    ClientId
}

opaque_string_id! {
    /// Reference to a masked-identity entity.
    MaskId
}

opaque_string_id! {
    /// Reference to a user entity.
    UserId
}
