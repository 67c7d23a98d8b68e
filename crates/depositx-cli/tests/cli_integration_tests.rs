#![allow(clippy::unwrap_used, clippy::expect_used)]
//! CLI integration tests
//!
//! Run the `depositx` binary against the simulated ledger and check stdout,
//! stderr and the exit code.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const DEPOSIT: &str = "0x00000000000000000000000000000000000000d1";

fn write_fixture(temp_dir: &TempDir, state: &str, withdrawable: u64) -> PathBuf {
    let path = temp_dir.path().join("ledger.json");
    fs::write(
        &path,
        format!(
            r#"{{
                "deposits": [
                    {{"address": "{DEPOSIT}", "state": "{state}", "lot_size": 100,
                      "owner": "0x000000000000000000000000000000000000a11c",
                      "withdrawable": {withdrawable}}}
                ]
            }}"#
        ),
    )
    .unwrap();
    path
}

fn depositx(temp_dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_depositx"))
        .current_dir(temp_dir.path())
        .env_remove("DEPOSITX_RPC")
        .env_remove("DEPOSITX_ACCOUNT")
        .env_remove("DEPOSITX_MNEMONIC")
        .env_remove("DEPOSITX_DEBUG")
        .env_remove("DEPOSITX_LOG_FORMAT")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_new_deposit_prints_minted_line() {
    let temp_dir = TempDir::new().unwrap();
    let output = depositx(&temp_dir, &["deposit", "new", "100"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let line = stdout(&output);
    let fields: Vec<&str> = line.trim_end().split('\t').collect();
    assert_eq!(fields.len(), 4, "{line}");
    assert!(fields[0].starts_with("0x"));
    assert_eq!(&fields[1..], &["ACTIVE", "100", "995000000000"]);
}

#[test]
fn test_withdraw_dry_run_from_fixture() {
    let temp_dir = TempDir::new().unwrap();
    let fixture = write_fixture(&temp_dir, "Redeemed", 4200);
    let rpc = format!("sim://{}", fixture.display());

    let output = depositx(
        &temp_dir,
        &["--rpc", &rpc, "deposit", DEPOSIT, "withdraw", "--dry-run"],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), format!("{DEPOSIT}\t4200\n"));
}

#[test]
fn test_liquidate_in_wrong_state_exits_with_error() {
    let temp_dir = TempDir::new().unwrap();
    let fixture = write_fixture(&temp_dir, "AwaitingBtcFundingProof", 0);
    let rpc = format!("sim://{}", fixture.display());

    let output = depositx(
        &temp_dir,
        &[
            "--rpc",
            &rpc,
            "deposit",
            DEPOSIT,
            "liquidate",
            "for",
            "undercollateralization",
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    let err = stderr(&output);
    assert!(err.starts_with("Error: "), "{err}");
    assert!(
        err.contains("not in a state that allows this liquidation reason"),
        "{err}"
    );
}

#[test]
fn test_unresolved_command_prints_usage() {
    let temp_dir = TempDir::new().unwrap();
    let output = depositx(&temp_dir, &["deposit", DEPOSIT, "liquidate", "for", "fraud"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("Usage: depositx"));
}

#[test]
fn test_no_command_prints_usage() {
    let temp_dir = TempDir::new().unwrap();
    let output = depositx(&temp_dir, &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("deposit <address> liquidate [for <reason>]"));
}

#[test]
fn test_debug_explains_rejection() {
    let temp_dir = TempDir::new().unwrap();

    let quiet = depositx(&temp_dir, &["deposit", "0x12"]);
    assert_eq!(quiet.status.code(), Some(1));
    assert!(!stderr(&quiet).contains("Invalid deposit address"));

    let debug = depositx(&temp_dir, &["--debug", "deposit", "0x12"]);
    assert_eq!(debug.status.code(), Some(1));
    assert!(stderr(&debug).contains("Invalid deposit address: 0x12"));
}

#[test]
fn test_unsupported_rpc_is_runtime_error() {
    let temp_dir = TempDir::new().unwrap();
    let output = depositx(
        &temp_dir,
        &["--rpc", "http://localhost:8545", "deposit", "list"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unsupported rpc endpoint"));
}
