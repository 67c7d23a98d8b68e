//! Ledger collaborator interfaces
//!
//! The engine never talks to a chain directly. It drives deposits through a
//! [`DepositClient`] (account context, factory and ownership lookups) and the
//! [`DepositHandle`]s it hands out (state accessors, trigger operations and
//! lifecycle event registration).

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::oneshot;

use depositx_core::errors::Result;
use depositx_core::model::{Address, DepositState, RedemptionDetails, TriggerOp};

/// Lifecycle events a flow can wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEventKind {
    /// Signers published the BTC address the deposit must be funded at
    FundingAddressAvailable,
    /// Funding proof accepted; the deposit is active
    Active,
    /// Redemption transaction proven; the deposit is redeemed
    Withdrawn,
}

impl LifecycleEventKind {
    pub fn name(self) -> &'static str {
        match self {
            LifecycleEventKind::FundingAddressAvailable => "funding_address_available",
            LifecycleEventKind::Active => "active",
            LifecycleEventKind::Withdrawn => "withdrawn",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    FundingAddressAvailable { btc_address: String },
    Active,
    Withdrawn { txid: String },
}

impl LifecycleEvent {
    pub fn kind(&self) -> LifecycleEventKind {
        match self {
            LifecycleEvent::FundingAddressAvailable { .. } => {
                LifecycleEventKind::FundingAddressAvailable
            }
            LifecycleEvent::Active => LifecycleEventKind::Active,
            LifecycleEvent::Withdrawn { .. } => LifecycleEventKind::Withdrawn,
        }
    }
}

/// Result of a submitted withdrawal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawOutcome {
    pub amount: u128,
    pub txid: String,
}

/// One deposit on the ledger
#[async_trait]
pub trait DepositHandle: Send + Sync {
    fn address(&self) -> &Address;

    async fn current_state(&self) -> Result<DepositState>;

    async fn lot_size_satoshis(&self) -> Result<u64>;

    /// Redemption recorded on the ledger, if one was ever requested
    async fn latest_redemption_details(&self) -> Result<Option<RedemptionDetails>>;

    /// Register a one-shot listener for `kind`
    ///
    /// Implementations must deliver immediately when the condition already
    /// holds, so that a flow resumed after the fact does not wait forever.
    fn subscribe(&self, kind: LifecycleEventKind, sender: oneshot::Sender<LifecycleEvent>);

    /// Submit funding-phase steps (pubkey retrieval, funding proof) as they become possible
    async fn auto_submit(&self) -> Result<()>;

    /// Exchange the deposit's ownership token for minted tokens; returns the minted amount
    async fn mint(&self) -> Result<u128>;

    async fn request_redemption(&self, btc_address: &str) -> Result<RedemptionDetails>;

    /// Submit redemption-phase steps (signature, proof) for `details` as they become possible
    async fn auto_submit_redemption(&self, details: &RedemptionDetails) -> Result<()>;

    async fn trigger(&self, op: TriggerOp) -> Result<()>;

    /// Read-only estimate of what the caller could withdraw
    async fn withdrawable_amount(&self) -> Result<u128>;

    async fn withdraw_funds(&self) -> Result<WithdrawOutcome>;
}

/// Connected ledger account plus deposit factory
#[async_trait]
pub trait DepositClient: Send + Sync {
    /// Account transactions are sent from
    fn default_account(&self) -> &Address;

    async fn vending_machine_address(&self) -> Result<Address>;

    /// Lot sizes, in satoshis, the factory accepts
    async fn allowed_lot_sizes(&self) -> Result<Vec<u64>>;

    /// Create a deposit, which starts the funding phase
    async fn create_deposit(&self, lot_size: u64) -> Result<Arc<dyn DepositHandle>>;

    async fn deposit_at(&self, address: &Address) -> Result<Arc<dyn DepositHandle>>;

    /// Every deposit whose ownership token was ever transferred to `owner`,
    /// in transfer order, duplicates included
    async fn deposits_transferred_to(&self, owner: &Address) -> Result<Vec<Address>>;

    async fn owner_of(&self, deposit: &Address) -> Result<Address>;
}
