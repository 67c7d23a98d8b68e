//! Ledger connection
//!
//! Turns the connection settings gathered by the CLI into a
//! [`DepositClient`]. Only the `sim://` scheme is wired up: `sim://local`
//! (or a bare `sim://`) starts an empty in-process ledger and `sim://<path>`
//! loads a JSON fixture.

use std::path::Path;
use std::sync::Arc;

use depositx_core::errors::{DepositError, Result};
use depositx_core::model::Address;
use depositx_core_types::Sensitive;

use crate::client::DepositClient;
use crate::sim::SimLedger;

pub const DEFAULT_RPC: &str = "sim://local";
const SIM_SCHEME: &str = "sim://";

#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub rpc: String,
    /// Account to send from; the backend's first account when unset
    pub account: Option<Address>,
    pub mnemonic: Option<Sensitive<String>>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            rpc: DEFAULT_RPC.to_string(),
            account: None,
            mnemonic: None,
        }
    }
}

/// Open a client for `config.rpc`
///
/// # Errors
/// `Transport` for an unsupported endpoint or unreadable fixture,
/// `InvalidInput` for a malformed fixture.
pub fn connect(config: &ConnectionConfig) -> Result<Arc<dyn DepositClient>> {
    let target = config.rpc.strip_prefix(SIM_SCHEME).ok_or_else(|| {
        DepositError::transport(
            "connect",
            format!("unsupported rpc endpoint '{}'", config.rpc),
        )
    })?;

    if config.mnemonic.is_some() {
        tracing::debug!(
            component = module_path!(),
            "simulated ledger does not sign; ignoring supplied key material"
        );
    }

    let ledger = match target {
        "" | "local" => SimLedger::new(
            config
                .account
                .clone()
                .unwrap_or_else(SimLedger::default_dev_account),
        ),
        path => SimLedger::load_fixture(Path::new(path), config.account.clone())?,
    };

    tracing::info!(
        component = module_path!(),
        rpc = %config.rpc,
        account = %ledger.default_account(),
        "connected"
    );
    Ok(Arc::new(ledger))
}
