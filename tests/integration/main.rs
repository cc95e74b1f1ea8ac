//! Integration tests for the checkin CLI
//!
//! These tests run the binary against a local webhook receiver and check the
//! full cycle: scan → ledger → POST, across restarts and resets.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Child, ChildStdin, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

#[path = "../unit/common/mod.rs"]
#[allow(dead_code)]
mod common;

use common::WebhookReceiver;

/// Helper function to create a checkin command rooted at `home`
fn checkin(home: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(cargo::cargo_bin!("checkin"));
    cmd.env("CHECKIN_HOME", home)
        .env_remove("CHECKIN_WEBHOOK_URL")
        .env("NO_COLOR", "1");
    cmd
}

/// Helper to write a config pointing at `url`
fn write_config(home: &Path, url: &str, extra: &str) {
    fs::write(
        home.join("config.toml"),
        format!("[webhook]\nurl = \"{url}\"\ntimeout_secs = 2\n{extra}"),
    )
    .unwrap();
}

/// Start a long-running `checkin scan` fed through a pipe
fn spawn_scan(home: &Path) -> (Child, ChildStdin) {
    let mut child = std::process::Command::new(cargo::cargo_bin!("checkin"))
        .env("CHECKIN_HOME", home)
        .env_remove("CHECKIN_WEBHOOK_URL")
        .env("NO_COLOR", "1")
        .arg("scan")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    let stdin = child.stdin.take().unwrap();
    (child, stdin)
}

fn send(stdin: &mut ChildStdin, frames: &str) {
    stdin.write_all(frames.as_bytes()).unwrap();
    stdin.flush().unwrap();
}

/// Identities in the saved ledger, empty if there is none yet
fn saved_identities(home: &Path) -> Vec<String> {
    fs::read_to_string(home.join("ledger.json"))
        .ok()
        .and_then(|raw| serde_json::from_str::<serde_json::Value>(&raw).ok())
        .and_then(|ledger| serde_json::from_value(ledger["checked_in"].clone()).ok())
        .unwrap_or_default()
}

/// Wait until the saved ledger satisfies `pred`
fn wait_for_ledger(home: &Path, pred: impl Fn(&[String]) -> bool) {
    let deadline = Instant::now() + WAIT;
    while !pred(&saved_identities(home)) {
        assert!(Instant::now() < deadline, "ledger never reached the expected state");
        thread::sleep(Duration::from_millis(25));
    }
}

const WAIT: Duration = Duration::from_secs(5);
const QUIET: Duration = Duration::from_millis(300);

// =============================================================================
// DELIVERY
// =============================================================================

#[test]
fn test_add_posts_to_webhook() {
    let temp = TempDir::new().unwrap();
    let receiver = WebhookReceiver::start();
    write_config(temp.path(), receiver.url(), "");

    checkin(temp.path())
        .args(["add", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked in alice"))
        .stdout(predicate::str::contains("local only").not());

    let body = receiver.recv(WAIT).expect("webhook was not called");
    assert_eq!(body, r#"{"username":"alice"}"#);
}

#[test]
fn test_duplicate_across_restarts_is_not_posted() {
    let temp = TempDir::new().unwrap();
    let receiver = WebhookReceiver::start();
    write_config(temp.path(), receiver.url(), "");

    checkin(temp.path()).args(["add", "bob"]).assert().success();
    assert!(receiver.recv(WAIT).is_some());

    checkin(temp.path())
        .args(["add", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already checked in bob"));
    assert!(receiver.stays_quiet(QUIET));
}

#[test]
fn test_env_url_overrides_missing_config() {
    let temp = TempDir::new().unwrap();
    let receiver = WebhookReceiver::start();

    checkin(temp.path())
        .env("CHECKIN_WEBHOOK_URL", receiver.url())
        .args(["add", "carol"])
        .assert()
        .success();

    assert_eq!(receiver.recv(WAIT).as_deref(), Some(r#"{"username":"carol"}"#));
}

#[test]
fn test_failing_webhook_still_checks_in() {
    let temp = TempDir::new().unwrap();
    let receiver = WebhookReceiver::start_with_status(503);
    write_config(temp.path(), receiver.url(), "");

    checkin(temp.path())
        .args(["add", "dave"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked in dave"))
        .stderr(predicate::str::contains("503"));

    checkin(temp.path())
        .args(["add", "dave"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already checked in dave"));
}

// =============================================================================
// MISSING IDENTITY
// =============================================================================

#[test]
fn test_missing_identity_posts_error_sentinel() {
    let temp = TempDir::new().unwrap();
    let receiver = WebhookReceiver::start();
    write_config(temp.path(), receiver.url(), "");

    checkin(temp.path()).arg("add").assert().success();

    assert_eq!(receiver.recv(WAIT).as_deref(), Some(r#"{"username":"error"}"#));
}

#[test]
fn test_missing_identity_ignored_by_config() {
    let temp = TempDir::new().unwrap();
    let receiver = WebhookReceiver::start();
    write_config(temp.path(), receiver.url(), "[scan]\nmissing_identity = \"ignore\"\n");

    checkin(temp.path())
        .arg("add")
        .assert()
        .success()
        .stdout(predicate::str::contains("ignored"));

    assert!(receiver.stays_quiet(QUIET));
}

// =============================================================================
// SCAN SESSION
// =============================================================================

#[test]
fn test_scan_session_lifecycle() {
    let temp = TempDir::new().unwrap();
    let receiver = WebhookReceiver::start();
    write_config(temp.path(), receiver.url(), "");

    checkin(temp.path())
        .arg("scan")
        .write_stdin("alice\nalice\nalice\n\nbob\n\nalice\n!reset\nalice\n")
        .assert()
        .success();

    let mut bodies: Vec<String> = std::iter::from_fn(|| receiver.recv(WAIT)).take(3).collect();
    bodies.sort();
    assert_eq!(
        bodies,
        [
            r#"{"username":"alice"}"#,
            r#"{"username":"alice"}"#,
            r#"{"username":"bob"}"#,
        ]
    );
    assert!(receiver.stays_quiet(QUIET));
}

// =============================================================================
// CONCURRENT PROCESSES
// =============================================================================

#[test]
fn test_add_during_scan_is_kept() {
    let temp = TempDir::new().unwrap();
    let receiver = WebhookReceiver::start();
    write_config(temp.path(), receiver.url(), "");

    let (child, mut stdin) = spawn_scan(temp.path());
    send(&mut stdin, "alice\n");
    wait_for_ledger(temp.path(), |ids| ids.iter().any(|id| id == "alice"));

    checkin(temp.path())
        .args(["add", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked in bob"));

    send(&mut stdin, "\ncarol\n\nbob\n");
    drop(stdin);
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Already checked in bob"));

    assert_eq!(saved_identities(temp.path()), ["alice", "bob", "carol"]);

    checkin(temp.path())
        .args(["add", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already checked in bob"));

    let mut bodies: Vec<String> = std::iter::from_fn(|| receiver.recv(WAIT)).take(3).collect();
    bodies.sort();
    assert_eq!(
        bodies,
        [
            r#"{"username":"alice"}"#,
            r#"{"username":"bob"}"#,
            r#"{"username":"carol"}"#,
        ]
    );
    assert!(receiver.stays_quiet(QUIET));
}

#[test]
fn test_reset_during_scan_is_honored() {
    let temp = TempDir::new().unwrap();

    let (child, mut stdin) = spawn_scan(temp.path());
    send(&mut stdin, "alice\n\nbob\n");
    wait_for_ledger(temp.path(), |ids| ids.len() == 2);

    checkin(temp.path()).arg("reset").assert().success();

    send(&mut stdin, "\ncarol\n");
    drop(stdin);
    assert!(child.wait_with_output().unwrap().status.success());

    assert_eq!(saved_identities(temp.path()), ["carol"]);
}
