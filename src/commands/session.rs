//! Session setup shared by the commands
//!
//! A session wires the configured notifier, the on-disk ledger and the
//! check-in service together. Every change runs under the ledger lock
//! against a fresh reload of the file, so concurrent `scan`, `add` and
//! `reset` processes never overwrite each other.

use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::runtime::Runtime;

use checkin::adapters::{JsonLedgerStore, webhook};
use checkin::config::Config;
use checkin::core::models::{CheckInLedger, LedgerSnapshot};
use checkin::core::ports::LedgerStore;
use checkin::core::services::{CheckInService, ScanOutcome};
use checkin::paths;

/// Today's date in local time
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Load the configuration from `path`, or the default location
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = path.map_or_else(Config::default_path, Path::to_path_buf);
    Ok(Config::load_with_env(&path)?)
}

/// Read the saved snapshot, treating an unreadable one as absent
pub fn load_snapshot(store: &impl LedgerStore) -> Option<LedgerSnapshot> {
    store.load().unwrap_or_else(|err| {
        log::warn!("{err:#}, starting with an empty ledger");
        None
    })
}

/// Reload the ledger for `today`, starting empty if the saved one is unreadable
pub fn load_ledger(store: &impl LedgerStore, today: NaiveDate) -> CheckInLedger {
    CheckInLedger::restore(load_snapshot(store), today)
}

/// A running check-in session
#[derive(Debug)]
pub struct Session {
    service: CheckInService,
    store: JsonLedgerStore,
    grace: Duration,
    // Declared last: the notifier inside `service` spawns onto it.
    _runtime: Runtime,
}

impl Session {
    /// Open a session with the notifier and ledger the configuration asks for
    pub fn open(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let config = load_config(config_path)?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("checkin-webhook")
            .enable_all()
            .build()?;
        let notifier = webhook::from_config(&config.webhook, runtime.handle().clone())?;

        // Placeholder; the file is reloaded before every change
        let service = CheckInService::new(CheckInLedger::new(today()), notifier)
            .with_missing_identity(config.scan.missing_identity);

        Ok(Self {
            service,
            store: JsonLedgerStore::new(paths::ledger_file()),
            grace: config.webhook.delivery_budget(),
            _runtime: runtime,
        })
    }

    /// Handle one scan against today's ledger
    pub fn handle_scan(&mut self, code: Option<&str>) -> anyhow::Result<ScanOutcome> {
        self.handle_scan_on(code, today())
    }

    /// Handle one scan on `today`, rolling the ledger over first if the day changed
    pub fn handle_scan_on(
        &mut self,
        code: Option<&str>,
        today: NaiveDate,
    ) -> anyhow::Result<ScanOutcome> {
        let _lock = self.store.lock()?;
        let rolled = self.reload(today);
        let outcome = self.service.handle_scan(code);
        if rolled || outcome.ledger_changed() {
            self.persist()?;
        }
        Ok(outcome)
    }

    /// Clear today's check-ins and persist the empty ledger
    pub fn manual_reset(&mut self) -> anyhow::Result<&'static str> {
        let _lock = self.store.lock()?;
        self.reload(today());
        let message = self.service.manual_reset();
        self.persist()?;
        Ok(message)
    }

    /// Give pending webhook deliveries a bounded chance to finish
    pub fn close(self) {
        self.service.flush_notifications(self.grace);
    }

    /// Pick up whatever is on disk, then roll it over; returns whether it rolled
    fn reload(&mut self, today: NaiveDate) -> bool {
        let ledger = load_snapshot(&self.store)
            .map_or_else(|| CheckInLedger::new(today), CheckInLedger::from_snapshot);
        log::debug!(
            "Reloaded ledger for {} with {} check-in(s) from {}",
            ledger.last_reset_date(),
            ledger.len(),
            self.store.path().display()
        );
        self.service.replace_ledger(ledger);
        self.service.roll_over(today)
    }

    fn persist(&self) -> anyhow::Result<()> {
        self.store.save(&self.service.ledger().snapshot())
    }
}
