//! Status command - show today's check-ins

use std::path::Path;

use checkin::adapters::JsonLedgerStore;
use checkin::output::{OutputMode, StatusReport};
use checkin::paths;

use super::session::{load_config, load_ledger, today};

/// Show who is checked in today
pub fn status(config: Option<&Path>, output_mode: OutputMode) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let ledger = load_ledger(&JsonLedgerStore::new(paths::ledger_file()), today());

    StatusReport {
        date: ledger.last_reset_date().to_string(),
        webhook_enabled: config.webhook.endpoint()?.is_some(),
        count: ledger.len(),
        checked_in: ledger.identities().map(ToString::to_string).collect(),
    }
    .render(output_mode);
    Ok(())
}
