//! Shared primitive types for the depositx crates
//!
//! - **Correlation**: `RequestId` stamped on every invocation span
//! - **Sensitive data**: `Sensitive<T>` for key material passed on the command line
//! - **Schema constants**: canonical structured-log field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RequestId;
pub use sensitive::Sensitive;
