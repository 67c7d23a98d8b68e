//! depositx engine - async deposit lifecycle flows
//!
//! Drives deposits through their lifecycle against a [`DepositClient`]:
//! funding, minting, redemption, liquidation, courtesy calls and
//! withdrawals, plus the owner listing query. [`execute_command`] is the
//! single entry point the CLI uses.

pub mod client;
pub mod commands;
pub mod connect;
pub mod events;
pub mod orchestrator;
pub mod query;
pub mod sim;

pub use client::{DepositClient, DepositHandle, LifecycleEvent, LifecycleEventKind, WithdrawOutcome};
pub use commands::execute_command;
pub use connect::{connect, ConnectionConfig, DEFAULT_RPC};
pub use events::{EventWaiter, PendingEvent};
pub use sim::{SeedDeposit, SimFixture, SimLedger};
