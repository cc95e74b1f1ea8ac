//! JSON file ledger storage
//!
//! The ledger lives in a single JSON file keyed by its date:
//!
//! ```text
//! {
//!   "date": "2026-10-18",
//!   "checked_in": ["alice", "bob"]
//! }
//! ```
//!
//! A snapshot for another day is still returned as-is; discarding stale
//! days is the ledger's decision, not the store's.
//!
//! Several processes may share one ledger file. Writers take the
//! [`LedgerLock`] and reload before changing anything.

mod lock;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

pub use lock::LedgerLock;

use crate::core::models::LedgerSnapshot;
use crate::core::ports::LedgerStore;

/// Ledger snapshot stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonLedgerStore {
    path: PathBuf,
}

impl JsonLedgerStore {
    /// Store backed by the file at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait for exclusive write access to the ledger
    pub fn lock(&self) -> anyhow::Result<LedgerLock> {
        LedgerLock::acquire(&self.path)
    }
}

impl LedgerStore for JsonLedgerStore {
    fn load(&self) -> anyhow::Result<Option<LedgerSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read ledger {}", self.path.display()))?;
        let snapshot = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse ledger {}", self.path.display()))?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(snapshot)?;

        // Replace atomically: write a sibling file, then rename over the ledger
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to write ledger {}", self.path.display()))?;
        Ok(())
    }
}
