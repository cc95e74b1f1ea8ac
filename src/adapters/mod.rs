//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - `json/` - Ledger snapshot stored as a JSON file
//! - `webhook/` - Check-in notifications posted over HTTP

pub mod json;
pub mod webhook;

pub use json::{JsonLedgerStore, LedgerLock};
pub use webhook::{DisabledNotifier, RetryPolicy, WebhookNotifier};
