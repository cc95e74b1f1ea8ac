//! Scanned identities
//!
//! An identity is whatever string the scanner decoded. It is compared
//! byte-for-byte: no trimming, no case folding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when building an [`Identity`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The scanner produced no usable string
    #[error("no identity could be read from the scanned code")]
    Missing,
}

/// A non-empty string decoded from a scanned code
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Build an identity from an optional decoded string.
    ///
    /// `None` and the empty string are both treated as a missing identity.
    pub fn from_scan(code: Option<&str>) -> Result<Self, IdentityError> {
        match code {
            Some(code) if !code.is_empty() => Ok(Self(code.to_string())),
            _ => Err(IdentityError::Missing),
        }
    }

    /// The raw decoded string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Err(IdentityError::Missing)
        } else {
            Ok(Self(value))
        }
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

impl std::str::FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_scan(Some(s))
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
