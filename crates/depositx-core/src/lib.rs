//! depositx core - pure deposit-command domain
//!
//! Everything here is free of I/O:
//! - deposit model (`DepositState`, `Address`, redemption details, trigger operations)
//! - token consumption and command resolution into a `DepositCommand`
//! - the liquidation reason registry
//! - result line rendering
//! - error and logging facilities shared with the engine and CLI

pub mod commands;
pub mod errors;
pub mod liquidation;
pub mod logging_facility;
pub mod model;
pub mod render;
pub mod resolver;
pub mod tokens;

#[doc(hidden)]
pub use depositx_core_types;

pub use commands::{DepositCommand, ListTarget};
pub use errors::{DepositError, ErrorCategory, ExError, ExErrorKind, Result};
pub use liquidation::{LiquidationEntry, LiquidationReason};
pub use logging_facility::Diagnostics;
pub use model::{Address, DepositState, RedemptionDetails, RedemptionRequest, TriggerOp};
