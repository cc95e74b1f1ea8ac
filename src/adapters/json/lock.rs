//! Cross-process ledger lock
//!
//! An advisory lock on a sibling `.lock` file. The ledger itself is replaced
//! by rename on every save, so it cannot carry the lock.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::Context;
use fs2::FileExt;

/// Exclusive hold on a ledger file, released on drop
#[derive(Debug)]
pub struct LedgerLock {
    _file: File,
    path: PathBuf,
}

impl LedgerLock {
    /// Block until no other process holds the lock for `ledger`
    pub fn acquire(ledger: &Path) -> anyhow::Result<Self> {
        let path = lock_path_for(ledger);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("failed to open lock {}", path.display()))?;

        // Called through the trait: std's `File` has inherent lock methods too
        FileExt::lock_exclusive(&file)
            .with_context(|| format!("failed to lock {}", path.display()))?;
        log::trace!("Locked {}", path.display());

        Ok(Self { _file: file, path })
    }

    /// The lock file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `ledger.json` -> `ledger.json.lock`
fn lock_path_for(ledger: &Path) -> PathBuf {
    let mut name = ledger.file_name().unwrap_or_default().to_os_string();
    name.push(".lock");
    ledger.with_file_name(name)
}
