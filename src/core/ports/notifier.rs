//! Notifier port
//!
//! Defines the one-way channel that tells a remote system about check-ins.

use std::time::Duration;

use serde::Serialize;

use super::super::models::CheckInPayload;

/// What happened to a payload handed to a notifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// Handed off for sending; the result is never reported back
    Dispatched,
    /// No endpoint is configured, nothing was sent
    Disabled,
    /// Nothing was offered to the notifier (duplicates, ignored misses)
    Suppressed,
}

impl std::fmt::Display for Delivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dispatched => write!(f, "dispatched"),
            Self::Disabled => write!(f, "disabled"),
            Self::Suppressed => write!(f, "suppressed"),
        }
    }
}

/// Fire-and-forget delivery of check-in events
///
/// `notify` must return without waiting on the network. Failures are the
/// implementation's to log; they never reach the caller.
pub trait Notifier: Send + Sync {
    /// Send `payload` to the remote endpoint
    fn notify(&self, payload: CheckInPayload) -> Delivery;

    /// Whether payloads actually leave the process
    fn is_enabled(&self) -> bool;

    /// Give in-flight deliveries up to `grace` to finish before exit
    fn flush(&self, _grace: Duration) {}
}
