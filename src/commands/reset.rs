//! Reset command - clear today's check-ins

use std::path::Path;

use checkin::adapters::JsonLedgerStore;
use checkin::core::ports::LedgerStore;
use checkin::core::services::READY_MESSAGE;
use checkin::output::{OperationResult, OutputMode};
use checkin::paths;

use super::session::{load_config, load_ledger, today};

/// Clear every check-in recorded today
///
/// The config is loaded only to surface errors in it. No notifier is built;
/// resetting never talks to the webhook.
pub fn reset(config: Option<&Path>, output_mode: OutputMode) -> anyhow::Result<()> {
    load_config(config)?;

    let store = JsonLedgerStore::new(paths::ledger_file());
    let _lock = store.lock()?;
    let mut ledger = load_ledger(&store, today());
    let cleared = ledger.len();
    ledger.manual_reset();
    store.save(&ledger.snapshot())?;
    log::info!("Manual reset cleared {cleared} check-in(s)");

    OperationResult {
        success: true,
        message: READY_MESSAGE.to_string(),
    }
    .render(output_mode);
    Ok(())
}
