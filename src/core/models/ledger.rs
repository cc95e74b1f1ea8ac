//! The day-scoped check-in ledger
//!
//! Holds the identities checked in on the current calendar day. An identity
//! moves from not-checked-in to checked-in on its first accepted scan and
//! only moves back when the whole ledger is cleared, either by a day
//! rollover or by a manual reset.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CheckInResult, Identity};

/// Persisted form of a ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Day the ledger was last cleared
    pub date: NaiveDate,
    /// Identities checked in on that day
    #[serde(default)]
    pub checked_in: BTreeSet<Identity>,
}

/// Identities checked in today
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInLedger {
    checked_in: BTreeSet<Identity>,
    last_reset: NaiveDate,
}

impl CheckInLedger {
    /// Empty ledger for `today`
    #[must_use]
    pub const fn new(today: NaiveDate) -> Self {
        Self {
            checked_in: BTreeSet::new(),
            last_reset: today,
        }
    }

    /// Rebuild a ledger from a persisted snapshot, exactly as stored
    #[must_use]
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            checked_in: snapshot.checked_in,
            last_reset: snapshot.date,
        }
    }

    /// Startup path: reload a snapshot if there is one, then drop it if it
    /// belongs to another day.
    #[must_use]
    pub fn restore(snapshot: Option<LedgerSnapshot>, today: NaiveDate) -> Self {
        let mut ledger = snapshot.map_or_else(|| Self::new(today), Self::from_snapshot);
        ledger.reset_for_new_day_if_needed(today);
        ledger
    }

    /// Record a check-in for `identity` unless it is already recorded today
    pub fn attempt_check_in(&mut self, identity: Identity) -> CheckInResult {
        if self.checked_in.contains(&identity) {
            CheckInResult::Duplicate(identity)
        } else {
            self.checked_in.insert(identity.clone());
            CheckInResult::Accepted(identity)
        }
    }

    /// Clear the ledger if `today` is a different calendar day than the
    /// last reset. Returns whether anything was reset.
    pub fn reset_for_new_day_if_needed(&mut self, today: NaiveDate) -> bool {
        if self.last_reset == today {
            return false;
        }
        self.checked_in.clear();
        self.last_reset = today;
        true
    }

    /// Clear every check-in. The last reset date is left alone.
    pub fn manual_reset(&mut self) {
        self.checked_in.clear();
    }

    /// Whether `identity` is checked in today
    #[must_use]
    pub fn contains(&self, identity: &Identity) -> bool {
        self.checked_in.contains(identity)
    }

    /// Number of identities checked in
    #[must_use]
    pub fn len(&self) -> usize {
        self.checked_in.len()
    }

    /// Whether nobody is checked in
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checked_in.is_empty()
    }

    /// Day the ledger was last cleared by rollover
    #[must_use]
    pub const fn last_reset_date(&self) -> NaiveDate {
        self.last_reset
    }

    /// Checked-in identities in sorted order
    pub fn identities(&self) -> impl Iterator<Item = &Identity> {
        self.checked_in.iter()
    }

    /// Snapshot for persistence
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            date: self.last_reset,
            checked_in: self.checked_in.clone(),
        }
    }
}
