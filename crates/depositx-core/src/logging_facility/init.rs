//! Logging initialization

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

use super::Verbosity;

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable debug output (`--debug`)
    Verbose,
    /// Everything suppressed unless `RUST_LOG` says otherwise
    Quiet,
    /// JSON structured output at info level
    Production,
    /// Test capture is installed separately via `init_test_capture()`
    Test,
}

impl From<Verbosity> for Profile {
    fn from(verbosity: Verbosity) -> Self {
        match verbosity {
            Verbosity::Debug => Profile::Verbose,
            Verbosity::Quiet => Profile::Quiet,
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Install the global tracing subscriber
///
/// Only the first call has any effect, and it yields to a subscriber that
/// is already installed (e.g. the test capture layer).
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Verbose => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("depositx=debug")),
                )
                .try_init()
                .ok();
        }
        Profile::Quiet => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")),
                )
                .try_init()
                .ok();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("depositx=info")),
                )
                .try_init()
                .ok();
        }
        Profile::Test => {
            tracing_subscriber::registry().try_init().ok();
        }
    });
}
