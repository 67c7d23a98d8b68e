//! Resolved deposit commands
//!
//! A `DepositCommand` is the deferred action produced by the resolver: plain
//! data describing one flow, with every ledger-dependent value (default
//! account, vending machine address) left unresolved until execution.

use crate::liquidation::LiquidationReason;
use crate::model::Address;

/// Owner whose deposits `deposit list` reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListTarget {
    /// The vending machine contract known to the connected client
    VendingMachine,
    /// An explicit `--address`
    Owner(Address),
    /// The invoker's default account
    DefaultAccount,
}

/// Command enum covering every `deposit ...` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositCommand {
    /// Open a deposit of `lot_size` satoshis and drive it through funding
    New { lot_size: u64, mint: bool },

    /// List deposits currently held by the target owner
    List { target: ListTarget },

    /// Render the current state of one deposit
    Describe { deposit: Address },

    /// Request a redemption paying out to `btc_address` and wait for it
    Redeem { deposit: Address, btc_address: String },

    /// Withdraw (or with `dry_run`, estimate) the caller's withdrawable balance
    Withdraw { deposit: Address, dry_run: bool },

    /// Pick up a funding or redemption flow an earlier run left unfinished
    Resume {
        deposit: Address,
        only_funding: bool,
        only_redemption: bool,
        mint: bool,
    },

    /// Notify the ledger that the deposit is undercollateralized enough for a courtesy call
    CourtesyCall { deposit: Address },

    /// Submit a liquidation, for `reason` or the first one the state admits
    Liquidate {
        deposit: Address,
        reason: Option<LiquidationReason>,
    },
}

impl DepositCommand {
    /// Deposit the command operates on, if it targets a single deposit
    pub fn deposit(&self) -> Option<&Address> {
        match self {
            DepositCommand::New { .. } | DepositCommand::List { .. } => None,
            DepositCommand::Describe { deposit }
            | DepositCommand::Redeem { deposit, .. }
            | DepositCommand::Withdraw { deposit, .. }
            | DepositCommand::Resume { deposit, .. }
            | DepositCommand::CourtesyCall { deposit }
            | DepositCommand::Liquidate { deposit, .. } => Some(deposit),
        }
    }

    /// Stable operation name used in log events
    pub fn op_name(&self) -> &'static str {
        match self {
            DepositCommand::New { .. } => "new_deposit",
            DepositCommand::List { .. } => "list_deposits",
            DepositCommand::Describe { .. } => "describe_deposit",
            DepositCommand::Redeem { .. } => "redeem_deposit",
            DepositCommand::Withdraw { .. } => "withdraw",
            DepositCommand::Resume { .. } => "resume_deposit",
            DepositCommand::CourtesyCall { .. } => "courtesy_call",
            DepositCommand::Liquidate { .. } => "liquidate_deposit",
        }
    }
}
