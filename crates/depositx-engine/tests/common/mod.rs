//! Shared fixtures for engine integration tests
#![allow(dead_code)]

use depositx_core::logging_facility::Diagnostics;
use depositx_core::model::{Address, DepositState, RedemptionDetails};
use depositx_engine::sim::{SeedDeposit, SimLedger};

pub fn addr(n: u64) -> Address {
    Address::parse(&format!("0x{:040x}", n)).unwrap()
}

pub fn account() -> Address {
    SimLedger::default_dev_account()
}

pub fn ledger() -> SimLedger {
    SimLedger::new(account())
}

pub fn quiet() -> Diagnostics {
    Diagnostics::quiet()
}

/// Seed a deposit owned by the default account
pub fn seed(ledger: &SimLedger, n: u64, state: DepositState, lot_size: u64) -> Address {
    seed_with(ledger, n, state, lot_size, None, 0)
}

pub fn seed_with(
    ledger: &SimLedger,
    n: u64,
    state: DepositState,
    lot_size: u64,
    redemption: Option<RedemptionDetails>,
    withdrawable: u128,
) -> Address {
    ledger
        .seed(SeedDeposit {
            address: addr(n),
            state,
            lot_size,
            owner: account(),
            redemption,
            withdrawable,
        })
        .unwrap()
}

pub fn redemption_details(lot_size: u64) -> RedemptionDetails {
    RedemptionDetails {
        utxo_value: lot_size,
        redeemer_output_script: "bcrt1qredeemer".to_string(),
        requested_fee: 2_000,
        outpoint: "bcrt1qfunding:0".to_string(),
        digest: format!("0x{:064x}", 7),
    }
}

/// Address field of a rendered result line
pub fn line_address(line: &str) -> Address {
    Address::parse(line.split('\t').next().unwrap()).unwrap()
}
