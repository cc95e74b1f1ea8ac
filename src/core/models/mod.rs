//! Domain models for checkin
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`Identity`] - The string decoded from a scanned code
//! - [`CheckInLedger`] - Who is checked in today
//! - [`CheckInResult`] - Accepted or duplicate
//! - [`CheckInPayload`] - What the webhook receives

mod check_in;
mod identity;
mod ledger;

pub use check_in::{CheckInPayload, CheckInResult, MISSING_IDENTITY_SENTINEL};
pub use identity::{Identity, IdentityError};
pub use ledger::{CheckInLedger, LedgerSnapshot};
