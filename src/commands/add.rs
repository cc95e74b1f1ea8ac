//! Add command - check in a single identity

use std::path::Path;

use checkin::output::{self, OutputMode};

use super::session::Session;

/// Check in `identity`; `None` goes down the missing-identity path
pub fn add(
    identity: Option<&str>,
    config: Option<&Path>,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let mut session = Session::open(config)?;
    let outcome = session.handle_scan(identity)?;
    output::render_scan(&outcome, output_mode);
    session.close();
    Ok(())
}
