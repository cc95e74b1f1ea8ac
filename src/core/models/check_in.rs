//! Check-in results and the outbound payload

use serde::{Deserialize, Serialize};

use super::Identity;

/// Username sent when no identity could be read
pub const MISSING_IDENTITY_SENTINEL: &str = "error";

/// Outcome of asking the ledger to record a check-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInResult {
    /// First check-in today; the identity is now recorded
    Accepted(Identity),
    /// Already checked in today; nothing changed
    Duplicate(Identity),
}

impl CheckInResult {
    /// The identity this result is about
    #[must_use]
    pub const fn identity(&self) -> &Identity {
        match self {
            Self::Accepted(id) | Self::Duplicate(id) => id,
        }
    }

    /// Whether the check-in was recorded
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// JSON body posted to the webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInPayload {
    /// The scanned identity, or `"error"` when none was readable
    pub username: String,
}

impl CheckInPayload {
    /// Payload announcing a check-in for `identity`
    #[must_use]
    pub fn for_identity(identity: &Identity) -> Self {
        Self {
            username: identity.as_str().to_string(),
        }
    }

    /// Payload sent when the scanner gave us nothing usable
    #[must_use]
    pub fn missing_identity() -> Self {
        Self {
            username: MISSING_IDENTITY_SENTINEL.to_string(),
        }
    }
}
