//! Core domain logic for checkin
//!
//! This module contains the check-in rules with no I/O dependencies.
//! All external interactions are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Identity, CheckInLedger, CheckInPayload)
//! - `services/` - Workflow orchestration (CheckInService, ScanDebouncer)
//! - `ports/` - Trait definitions for external dependencies

pub mod models;
pub mod ports;
pub mod services;
