pub mod address;
pub mod redemption;
pub mod state;
pub mod trigger;

pub use address::Address;
pub use redemption::{RedemptionDetails, RedemptionRequest};
pub use state::DepositState;
pub use trigger::TriggerOp;
