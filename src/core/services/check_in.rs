//! Check-in service - the scan handling workflow
//!
//! Takes a decoded string, consults the ledger, hands a payload to the
//! notifier for new check-ins and reports a status line for every scan.
//! Persisting the ledger is left to the caller.

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::models::{CheckInLedger, CheckInPayload, CheckInResult, Identity};
use crate::core::ports::{Delivery, Notifier};

/// Status shown after a manual reset
pub const READY_MESSAGE: &str = "Ready to check people in!";

/// What to do when a scan yields no usable identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingIdentityPolicy {
    /// Post `{"username": "error"}` so the endpoint still hears about it
    #[default]
    PostError,
    /// Drop the scan without contacting the endpoint
    Ignore,
}

impl std::str::FromStr for MissingIdentityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "post-error" | "post_error" | "error" => Ok(Self::PostError),
            "ignore" => Ok(Self::Ignore),
            _ => Err(format!("Invalid missing identity policy: {s}. Use: post-error, ignore")),
        }
    }
}

/// Classification of a handled scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanKind {
    /// New check-in recorded
    Accepted,
    /// Identity already checked in today
    Duplicate,
    /// Nothing usable was decoded
    MissingIdentity,
}

/// Result of handling one scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanOutcome {
    /// What kind of scan this was
    pub kind: ScanKind,
    /// The identity, when one was read
    pub identity: Option<String>,
    /// What happened on the notifier side
    pub delivery: Delivery,
    /// Human-readable status line
    pub message: String,
}

impl ScanOutcome {
    /// Whether the ledger changed as a result of this scan
    #[must_use]
    pub fn ledger_changed(&self) -> bool {
        self.kind == ScanKind::Accepted
    }
}

/// Owns the ledger and the notifier, and runs the check-in workflow
pub struct CheckInService {
    ledger: CheckInLedger,
    notifier: Box<dyn Notifier>,
    missing_identity: MissingIdentityPolicy,
}

impl std::fmt::Debug for CheckInService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckInService")
            .field("ledger", &self.ledger)
            .field("notifier_enabled", &self.notifier.is_enabled())
            .field("missing_identity", &self.missing_identity)
            .finish()
    }
}

impl CheckInService {
    /// Service over an existing ledger
    #[must_use]
    pub fn new(ledger: CheckInLedger, notifier: Box<dyn Notifier>) -> Self {
        Self {
            ledger,
            notifier,
            missing_identity: MissingIdentityPolicy::default(),
        }
    }

    /// Choose how scans without an identity are handled
    #[must_use]
    pub fn with_missing_identity(mut self, policy: MissingIdentityPolicy) -> Self {
        self.missing_identity = policy;
        self
    }

    /// Handle one logical scan
    pub fn handle_scan(&mut self, code: Option<&str>) -> ScanOutcome {
        match Identity::from_scan(code) {
            Ok(identity) => self.check_in(identity),
            Err(err) => self.missing(&err),
        }
    }

    fn check_in(&mut self, identity: Identity) -> ScanOutcome {
        match self.ledger.attempt_check_in(identity) {
            CheckInResult::Accepted(identity) => {
                let delivery = self.notifier.notify(CheckInPayload::for_identity(&identity));
                log::info!("Checked in {identity} ({delivery})");
                let message = if delivery == Delivery::Disabled {
                    format!("Checked in {identity} (local only, no webhook configured)")
                } else {
                    format!("Checked in {identity}")
                };
                ScanOutcome {
                    kind: ScanKind::Accepted,
                    identity: Some(identity.into()),
                    delivery,
                    message,
                }
            },
            CheckInResult::Duplicate(identity) => {
                log::info!("Already checked in {identity}");
                ScanOutcome {
                    kind: ScanKind::Duplicate,
                    message: format!("Already checked in {identity}"),
                    identity: Some(identity.into()),
                    delivery: Delivery::Suppressed,
                }
            },
        }
    }

    fn missing(&self, err: &crate::core::models::IdentityError) -> ScanOutcome {
        log::warn!("{err}");
        let (delivery, message) = match self.missing_identity {
            MissingIdentityPolicy::PostError => {
                let delivery = self.notifier.notify(CheckInPayload::missing_identity());
                let message = if delivery == Delivery::Disabled {
                    "No identity read from code (local only, no webhook configured)".to_string()
                } else {
                    "No identity read from code, reported as error".to_string()
                };
                (delivery, message)
            },
            MissingIdentityPolicy::Ignore => {
                (Delivery::Suppressed, "No identity read from code, ignored".to_string())
            },
        };
        ScanOutcome {
            kind: ScanKind::MissingIdentity,
            identity: None,
            delivery,
            message,
        }
    }

    /// Operator-triggered restart of the session; returns the ready message
    pub fn manual_reset(&mut self) -> &'static str {
        let cleared = self.ledger.len();
        self.ledger.manual_reset();
        log::info!("Manual reset cleared {cleared} check-in(s)");
        READY_MESSAGE
    }

    /// Day rollover check; returns whether the ledger was cleared
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        let rolled = self.ledger.reset_for_new_day_if_needed(today);
        if rolled {
            log::info!("New day {today}, ledger cleared");
        }
        rolled
    }

    /// Wait up to `grace` for dispatched notifications before shutting down
    pub fn flush_notifications(&self, grace: Duration) {
        self.notifier.flush(grace);
    }

    /// Whether check-ins leave the process
    #[must_use]
    pub fn notifier_enabled(&self) -> bool {
        self.notifier.is_enabled()
    }

    /// The ledger
    #[must_use]
    pub const fn ledger(&self) -> &CheckInLedger {
        &self.ledger
    }

    /// Swap in a freshly loaded ledger, e.g. after another process wrote it
    pub fn replace_ledger(&mut self, ledger: CheckInLedger) {
        self.ledger = ledger;
    }
}
