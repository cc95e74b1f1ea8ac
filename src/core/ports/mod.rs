//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between the check-in workflow
//! and external systems (state files, the webhook endpoint).
//!
//! Implementations live in the `adapters` module.

mod ledger_store;
mod notifier;

pub use ledger_store::LedgerStore;
pub use notifier::{Delivery, Notifier};
