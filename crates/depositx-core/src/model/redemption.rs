use serde::{Deserialize, Serialize};

/// Redemption request already recorded on the ledger for a deposit
///
/// Enough to reattach to a redemption that an earlier invocation started:
/// the signers' pending signature and proof steps are keyed by `digest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionDetails {
    /// Value of the funding UTXO being spent, in satoshis
    pub utxo_value: u64,
    /// Destination of the redeemed BTC
    pub redeemer_output_script: String,
    /// Fee the redeemer agreed to, in satoshis
    pub requested_fee: u64,
    pub outpoint: String,
    /// Sighash digest the signers must sign
    pub digest: String,
}

/// How a redemption flow attaches to its deposit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedemptionRequest {
    /// Request a fresh redemption paying out to `btc_address`
    New { btc_address: String },
    /// Resume the redemption described by previously recorded details
    Existing(RedemptionDetails),
}
