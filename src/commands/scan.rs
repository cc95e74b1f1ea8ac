//! Scan command - check people in from a stream of decoded codes

use std::io::{self, BufRead};
use std::path::Path;

use checkin::core::services::{Frame, READY_MESSAGE, ScanDebouncer};
use checkin::output::{self, OperationResult, OutputMode};

use super::session::Session;

/// Line that triggers a manual reset instead of a scan
const RESET_LINE: &str = "!reset";

/// Read frames from stdin until EOF
///
/// Pending webhook deliveries are flushed even when the session ends on an
/// error.
pub fn scan(config: Option<&Path>, output_mode: OutputMode) -> anyhow::Result<()> {
    let mut session = Session::open(config)?;
    log::info!("{READY_MESSAGE}");

    let result = run(&mut session, &mut io::stdin().lock(), output_mode);
    session.close();
    result
}

fn run(
    session: &mut Session,
    input: &mut impl BufRead,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let mut debouncer = ScanDebouncer::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            return Ok(());
        }

        match Frame::from_bytes(&line) {
            Frame::Code(text) if text == RESET_LINE => {
                let message = session.manual_reset()?;
                debouncer.reset();
                OperationResult {
                    success: true,
                    message: message.to_string(),
                }
                .render(output_mode);
            },
            frame => {
                if let Some(code) = debouncer.observe(frame) {
                    let outcome = session.handle_scan(Some(&code))?;
                    output::render_scan(&outcome, output_mode);
                }
            },
        }
    }
}
