//! Centralized path definitions for checkin
//!
//! ## Storage Layout
//!
//! ```text
//! ~/.checkin/                   # or $CHECKIN_HOME
//! ├── config.toml               # Webhook URL, retry and scan settings
//! └── ledger.json               # Today's check-ins
//! ```

use std::path::PathBuf;

/// Environment variable relocating the checkin directory
pub const HOME_ENV: &str = "CHECKIN_HOME";

/// Directory name under the user's home
const CHECKIN_DIR: &str = ".checkin";

/// Config filename
const CONFIG_FILE: &str = "config.toml";

/// Ledger filename
const LEDGER_FILE: &str = "ledger.json";

/// Get the checkin directory.
///
/// Returns `$CHECKIN_HOME` when set, otherwise `~/.checkin/`.
#[must_use]
pub fn checkin_dir() -> PathBuf {
    match std::env::var_os(HOME_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir().unwrap_or_else(|| PathBuf::from("~")).join(CHECKIN_DIR),
    }
}

/// Get the config file path.
#[must_use]
pub fn config_file() -> PathBuf {
    checkin_dir().join(CONFIG_FILE)
}

/// Get the ledger file path.
#[must_use]
pub fn ledger_file() -> PathBuf {
    checkin_dir().join(LEDGER_FILE)
}
