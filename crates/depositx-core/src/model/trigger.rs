use std::fmt;

/// Named state-advancing operations exposed by a deposit handle
///
/// These are the remedial and notification calls a third party may submit
/// once the deposit's timers or collateralization allow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerOp {
    NotifySignerSetupFailure,
    NotifyFundingTimeout,
    NotifyUndercollateralizedLiquidation,
    NotifyCourtesyCall,
    NotifyCourtesyCallExpired,
    NotifyRedemptionSignatureTimedOut,
    NotifyRedemptionProofTimedOut,
}

impl TriggerOp {
    /// Contract method the operation submits
    pub fn method_name(self) -> &'static str {
        match self {
            TriggerOp::NotifySignerSetupFailure => "notifySignerSetupFailure",
            TriggerOp::NotifyFundingTimeout => "notifyFundingTimeout",
            TriggerOp::NotifyUndercollateralizedLiquidation => {
                "notifyUndercollateralizedLiquidation"
            }
            TriggerOp::NotifyCourtesyCall => "notifyCourtesyCall",
            TriggerOp::NotifyCourtesyCallExpired => "notifyCourtesyCallExpired",
            TriggerOp::NotifyRedemptionSignatureTimedOut => "notifyRedemptionSignatureTimedOut",
            TriggerOp::NotifyRedemptionProofTimedOut => "notifyRedemptionProofTimedOut",
        }
    }
}

impl fmt::Display for TriggerOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}
