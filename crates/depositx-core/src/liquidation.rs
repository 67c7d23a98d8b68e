//! Liquidation reason registry
//!
//! A fixed, ordered table of the remedial operations a third party can
//! submit against a misbehaving deposit, each gated on the deposit states in
//! which the ledger accepts it.
//!
//! State sets overlap (`CourtesyCall` admits both undercollateralization and
//! courtesy-timeout), so resolving a reason from state alone picks the first
//! matching entry in declaration order.

use crate::model::{DepositState, TriggerOp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiquidationReason {
    SetupTimeout,
    FundingTimeout,
    Undercollateralization,
    CourtesyTimeout,
    RedemptionSignatureTimeout,
    RedemptionProofTimeout,
}

/// One row of the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidationEntry {
    pub reason: LiquidationReason,
    /// Key accepted after `liquidate for`
    pub key: &'static str,
    pub states: &'static [DepositState],
    pub operation: TriggerOp,
}

impl LiquidationEntry {
    pub fn applies_to(&self, state: DepositState) -> bool {
        self.states.contains(&state)
    }
}

/// Registry contents in tie-breaking order
pub static LIQUIDATION_REASONS: &[LiquidationEntry] = &[
    LiquidationEntry {
        reason: LiquidationReason::SetupTimeout,
        key: "setup-timeout",
        states: &[DepositState::AwaitingSignerSetup],
        operation: TriggerOp::NotifySignerSetupFailure,
    },
    LiquidationEntry {
        reason: LiquidationReason::FundingTimeout,
        key: "funding-timeout",
        states: &[DepositState::AwaitingBtcFundingProof],
        operation: TriggerOp::NotifyFundingTimeout,
    },
    LiquidationEntry {
        reason: LiquidationReason::Undercollateralization,
        key: "undercollateralization",
        states: &[DepositState::Active, DepositState::CourtesyCall],
        operation: TriggerOp::NotifyUndercollateralizedLiquidation,
    },
    LiquidationEntry {
        reason: LiquidationReason::CourtesyTimeout,
        key: "courtesy-timeout",
        states: &[DepositState::CourtesyCall],
        operation: TriggerOp::NotifyCourtesyCallExpired,
    },
    LiquidationEntry {
        reason: LiquidationReason::RedemptionSignatureTimeout,
        key: "redemption-signature-timeout",
        states: &[DepositState::AwaitingWithdrawalSignature],
        operation: TriggerOp::NotifyRedemptionSignatureTimedOut,
    },
    LiquidationEntry {
        reason: LiquidationReason::RedemptionProofTimeout,
        key: "redemption-proof-timeout",
        states: &[DepositState::AwaitingWithdrawalProof],
        operation: TriggerOp::NotifyRedemptionProofTimedOut,
    },
];

impl LiquidationReason {
    pub fn entry(self) -> &'static LiquidationEntry {
        LIQUIDATION_REASONS
            .iter()
            .find(|e| e.reason == self)
            .unwrap_or_else(|| unreachable!("every reason has a registry row"))
    }
}

/// Look up a reason by its command-line key
pub fn lookup(key: &str) -> Option<&'static LiquidationEntry> {
    LIQUIDATION_REASONS.iter().find(|e| e.key == key)
}

/// All keys, in declaration order
pub fn keys() -> impl Iterator<Item = &'static str> {
    LIQUIDATION_REASONS.iter().map(|e| e.key)
}

/// First entry, in declaration order, whose state set contains `state`
pub fn first_applicable(state: DepositState) -> Option<&'static LiquidationEntry> {
    LIQUIDATION_REASONS.iter().find(|e| e.applies_to(state))
}
