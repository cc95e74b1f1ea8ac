//! Business logic services
//!
//! Orchestration logic that operates on domain models. These services
//! never touch the filesystem or the network directly; they go through
//! the port traits.
//!
//! - [`check_in`] - The scan handling workflow
//! - [`debounce`] - Turn a frame stream into discrete scans

pub mod check_in;
pub mod debounce;

pub use check_in::{CheckInService, MissingIdentityPolicy, READY_MESSAGE, ScanKind, ScanOutcome};
pub use debounce::{Frame, ScanDebouncer};
