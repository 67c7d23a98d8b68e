use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a deposit, as reported by the ledger
///
/// Declaration order matches the on-chain numeric codes, so the derived
/// `Ord` is the ledger's ordering. `Active` is the funding boundary:
/// anything below it is still being set up or funded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DepositState {
    Start = 0,
    AwaitingSignerSetup = 1,
    AwaitingBtcFundingProof = 2,
    FailedSetup = 3,
    Active = 4,
    AwaitingWithdrawalSignature = 5,
    AwaitingWithdrawalProof = 6,
    Redeemed = 7,
    CourtesyCall = 8,
    FraudLiquidationInProgress = 9,
    LiquidationInProgress = 10,
    Liquidated = 11,
}

impl DepositState {
    pub const ALL: [DepositState; 12] = [
        DepositState::Start,
        DepositState::AwaitingSignerSetup,
        DepositState::AwaitingBtcFundingProof,
        DepositState::FailedSetup,
        DepositState::Active,
        DepositState::AwaitingWithdrawalSignature,
        DepositState::AwaitingWithdrawalProof,
        DepositState::Redeemed,
        DepositState::CourtesyCall,
        DepositState::FraudLiquidationInProgress,
        DepositState::LiquidationInProgress,
        DepositState::Liquidated,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Name used in rendered output lines
    pub fn name(self) -> &'static str {
        match self {
            DepositState::Start => "START",
            DepositState::AwaitingSignerSetup => "AWAITING_SIGNER_SETUP",
            DepositState::AwaitingBtcFundingProof => "AWAITING_BTC_FUNDING_PROOF",
            DepositState::FailedSetup => "FAILED_SETUP",
            DepositState::Active => "ACTIVE",
            DepositState::AwaitingWithdrawalSignature => "AWAITING_WITHDRAWAL_SIGNATURE",
            DepositState::AwaitingWithdrawalProof => "AWAITING_WITHDRAWAL_PROOF",
            DepositState::Redeemed => "REDEEMED",
            DepositState::CourtesyCall => "COURTESY_CALL",
            DepositState::FraudLiquidationInProgress => "FRAUD_LIQUIDATION_IN_PROGRESS",
            DepositState::LiquidationInProgress => "LIQUIDATION_IN_PROGRESS",
            DepositState::Liquidated => "LIQUIDATED",
        }
    }

    /// No further lifecycle transitions are possible
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            DepositState::FailedSetup | DepositState::Redeemed | DepositState::Liquidated
        )
    }
}

impl fmt::Display for DepositState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
