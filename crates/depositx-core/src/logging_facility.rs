//! Structured logging facility
//!
//! - Single initialization point via `init(profile)`
//! - Operation boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - An explicit [`Diagnostics`] handle for operator-facing parse diagnostics
//! - Test capture mode for deterministic assertions
//!
//! All output goes to stderr; stdout carries only the command's result line.
//!
//! # Usage
//!
//! ```rust
//! use depositx_core::logging_facility::{init, Profile};
//!
//! init(Profile::Quiet);
//! ```

pub mod diagnostics;
pub mod init;
pub mod macros;
pub mod test_capture;

pub use diagnostics::{Diagnostics, Verbosity};
pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
