//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use colored::Colorize;
use serde::Serialize;

use crate::core::services::{ScanKind, ScanOutcome};

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Render one scan outcome
///
/// JSON mode prints one compact object per line so a scan session can be
/// consumed as a JSON Lines stream.
pub fn render_scan(outcome: &ScanOutcome, mode: OutputMode) {
    match mode {
        OutputMode::Human => {
            let line = match outcome.kind {
                ScanKind::Accepted => outcome.message.green(),
                ScanKind::Duplicate => outcome.message.yellow(),
                ScanKind::MissingIdentity => outcome.message.red(),
            };
            println!("{line}");
        },
        OutputMode::Json => {
            println!("{}", to_json(outcome, false));
        },
    }
}

/// Today's ledger, as shown by `checkin status`
#[derive(Debug, Serialize)]
pub struct StatusReport {
    /// Day the ledger belongs to (YYYY-MM-DD)
    pub date: String,
    /// Whether check-ins are posted to a webhook
    pub webhook_enabled: bool,
    /// Number of check-ins today
    pub count: usize,
    /// Checked-in identities, sorted
    pub checked_in: Vec<String>,
}

impl StatusReport {
    /// Render the report based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        println!("Date: {}", self.date);
        if self.webhook_enabled {
            println!("Webhook: enabled");
        } else {
            println!("Webhook: {}", "disabled (local only)".yellow());
        }
        println!();

        if self.checked_in.is_empty() {
            println!("Nobody checked in yet.");
            return;
        }

        println!("Checked in: {}", self.count);
        for identity in &self.checked_in {
            println!("  • {identity}");
        }
    }

    fn render_json(&self) {
        println!("{}", to_json(self, true));
    }
}

/// Generic operation result for simple commands
#[derive(Debug, Serialize)]
pub struct OperationResult {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

impl OperationResult {
    /// Render the result based on output mode
    ///
    /// JSON is a single line so the result can sit between scan outcomes in
    /// a JSON Lines stream.
    pub fn render(&self, mode: OutputMode) {
        println!("{}", self.format(mode));
    }

    /// The text `render` prints
    #[must_use]
    pub fn format(&self, mode: OutputMode) -> String {
        match mode {
            OutputMode::Human => self.message.clone(),
            OutputMode::Json => to_json(self, false),
        }
    }
}

fn to_json(value: &impl Serialize, pretty: bool) -> String {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.unwrap_or_default()
}
