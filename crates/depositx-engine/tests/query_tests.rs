#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Owner listing and fixture-backed connection tests

mod common;

use common::*;
use depositx_core::commands::{DepositCommand, ListTarget};
use depositx_core::model::DepositState;
use depositx_engine::client::DepositClient;
use depositx_engine::connect::{connect, ConnectionConfig};
use depositx_engine::execute_command;
use depositx_engine::query::{list_deposits, transferred_deposits};
use std::io::Write;
use tempfile::NamedTempFile;

fn list(target: ListTarget) -> DepositCommand {
    DepositCommand::List { target }
}

// ---------------------------------------------------------------------------
// listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_list_default_account_in_transfer_order() {
    let ledger = ledger();
    let first = seed(&ledger, 0x30, DepositState::Active, 100);
    let second = seed(&ledger, 0x20, DepositState::CourtesyCall, 1_000_000);

    let out = execute_command(list(ListTarget::DefaultAccount), &ledger, &quiet())
        .await
        .unwrap();

    assert_eq!(
        out,
        format!(
            "{}\tACTIVE\t100\n{}\tCOURTESY_CALL\t1000000",
            first, second
        )
    );
}

#[tokio::test]
async fn test_list_drops_deposits_transferred_away() {
    let ledger = ledger();
    let kept = seed(&ledger, 0x31, DepositState::Active, 100);
    let moved = seed(&ledger, 0x32, DepositState::Active, 100);
    let other = addr(0xb0b);
    ledger.transfer(&moved, other.clone()).unwrap();

    let mine = execute_command(list(ListTarget::DefaultAccount), &ledger, &quiet())
        .await
        .unwrap();
    assert_eq!(mine, format!("{}\tACTIVE\t100", kept));

    let theirs = execute_command(list(ListTarget::Owner(other)), &ledger, &quiet())
        .await
        .unwrap();
    assert_eq!(theirs, format!("{}\tACTIVE\t100", moved));
}

#[tokio::test]
async fn test_round_trip_transfer_is_listed_once() {
    let ledger = ledger();
    let deposit = seed(&ledger, 0x33, DepositState::Active, 100);
    ledger.transfer(&deposit, addr(0xb0b)).unwrap();
    ledger.transfer(&deposit, account()).unwrap();

    let candidates = transferred_deposits(&ledger, &account()).await.unwrap();
    assert_eq!(candidates, vec![deposit.clone()]);

    let out = list_deposits(&ledger, &account()).await.unwrap();
    assert_eq!(out.lines().count(), 1);
}

#[tokio::test]
async fn test_list_vending_machine_after_mint() {
    let ledger = ledger();
    let minted = execute_command(
        DepositCommand::New {
            lot_size: 100,
            mint: true,
        },
        &ledger,
        &quiet(),
    )
    .await
    .unwrap();
    let deposit = line_address(&minted);

    let vending = execute_command(list(ListTarget::VendingMachine), &ledger, &quiet())
        .await
        .unwrap();
    assert_eq!(vending, format!("{}\tACTIVE\t100", deposit));

    let mine = execute_command(list(ListTarget::DefaultAccount), &ledger, &quiet())
        .await
        .unwrap();
    assert_eq!(mine, "");
}

#[tokio::test]
async fn test_list_owner_with_no_deposits() {
    let out = execute_command(list(ListTarget::Owner(addr(0xdead))), &ledger(), &quiet())
        .await
        .unwrap();
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_mint_requires_holding_the_token() {
    let ledger = ledger();
    let deposit = seed(&ledger, 0x34, DepositState::AwaitingBtcFundingProof, 100);
    let stranger = ledger.acting_as(addr(0xb0b));

    let err = execute_command(
        DepositCommand::Resume {
            deposit: deposit.clone(),
            only_funding: true,
            only_redemption: false,
            mint: true,
        },
        &stranger,
        &quiet(),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("tdtToTbtc"), "{err}");
    assert_eq!(
        ledger.operations(&deposit).unwrap(),
        vec!["provideBTCFundingProof"]
    );
}

// ---------------------------------------------------------------------------
// fixtures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_connect_loads_fixture() {
    let mut fixture = NamedTempFile::new().unwrap();
    write!(
        fixture,
        r#"{{
            "lot_sizes": [500],
            "deposits": [
                {{"address": "0x00000000000000000000000000000000000000D1",
                  "state": "AwaitingWithdrawalProof", "lot_size": 500,
                  "owner": "0x000000000000000000000000000000000000a11c"}}
            ]
        }}"#
    )
    .unwrap();

    let config = ConnectionConfig {
        rpc: format!("sim://{}", fixture.path().display()),
        ..ConnectionConfig::default()
    };
    let client = connect(&config).unwrap();

    assert_eq!(client.allowed_lot_sizes().await.unwrap(), vec![500]);
    let out = execute_command(list(ListTarget::DefaultAccount), client.as_ref(), &quiet())
        .await
        .unwrap();
    assert_eq!(
        out,
        "0x00000000000000000000000000000000000000d1\tAWAITING_WITHDRAWAL_PROOF\t500"
    );
}

#[test]
fn test_connect_rejects_malformed_fixture() {
    let mut fixture = NamedTempFile::new().unwrap();
    write!(fixture, r#"{{"deposits": [{{"address": "nope"}}]}}"#).unwrap();

    let config = ConnectionConfig {
        rpc: format!("sim://{}", fixture.path().display()),
        ..ConnectionConfig::default()
    };
    let err = connect(&config).err().unwrap();
    assert!(err.to_string().contains("invalid ledger fixture"), "{err}");
}
