//! Ledger store port
//!
//! Defines how the check-in ledger survives process restarts.

use super::super::models::LedgerSnapshot;

/// Persistence for the day's ledger
pub trait LedgerStore: Send + Sync {
    /// Load the last saved snapshot, `None` if nothing was saved yet
    fn load(&self) -> anyhow::Result<Option<LedgerSnapshot>>;

    /// Replace the saved snapshot
    fn save(&self, snapshot: &LedgerSnapshot) -> anyhow::Result<()>;
}
