//! Invocation settings
//!
//! Layered lowest first: built-in defaults, `DEPOSITX_*` environment
//! variables (including any loaded from `.env`), then command-line flags.

use clap::Args;
use config::{Config, ConfigError, Environment, Map};
use serde::Deserialize;
use std::convert::Infallible;

use depositx_core::errors::Result as DepositResult;
use depositx_core::logging_facility::{Profile, Verbosity};
use depositx_core::model::Address;
use depositx_core_types::Sensitive;
use depositx_engine::connect::{ConnectionConfig, DEFAULT_RPC};

const ENV_PREFIX: &str = "DEPOSITX";

/// Flags accepted before the `deposit` command
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Print diagnostics explaining why a command was not understood
    #[arg(long)]
    pub debug: bool,

    /// Ledger endpoint (`sim://local` or `sim://<fixture.json>`)
    #[arg(long, value_name = "URL")]
    pub rpc: Option<String>,

    /// Private key or seed phrase for the sending account
    #[arg(long, value_name = "KEY_OR_PHRASE", value_parser = parse_sensitive)]
    pub mnemonic: Option<Sensitive<String>>,

    /// Account to send transactions from
    #[arg(long, value_name = "ADDRESS")]
    pub account: Option<String>,
}

fn parse_sensitive(raw: &str) -> Result<Sensitive<String>, Infallible> {
    Ok(Sensitive::new(raw.to_string()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub rpc: String,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub mnemonic: Option<Sensitive<String>>,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Settings {
    /// # Errors
    /// `ConfigError` when a layer holds a value of the wrong type.
    pub fn load(args: &GlobalArgs) -> Result<Self, ConfigError> {
        Self::load_from(args, None)
    }

    /// `env` replaces the process environment when given
    fn load_from(args: &GlobalArgs, env: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("rpc", DEFAULT_RPC)?
            .set_default("debug", false)?
            .set_default("log_format", "text")?
            .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
            .set_override_option("rpc", args.rpc.clone())?
            .set_override_option("account", args.account.clone())?
            .set_override_option(
                "mnemonic",
                args.mnemonic.as_ref().map(|m| m.expose().clone()),
            )?;
        // An absent --debug leaves DEPOSITX_DEBUG in charge.
        if args.debug {
            builder = builder.set_override("debug", true)?;
        }
        builder.build()?.try_deserialize()
    }

    pub fn verbosity(&self) -> Verbosity {
        if self.debug {
            Verbosity::Debug
        } else {
            Verbosity::Quiet
        }
    }

    pub fn profile(&self) -> Profile {
        match (self.debug, self.log_format) {
            (true, _) => Profile::Verbose,
            (false, LogFormat::Json) => Profile::Production,
            (false, LogFormat::Text) => Profile::Quiet,
        }
    }

    /// # Errors
    /// `InvalidAddress` if the configured account is malformed.
    pub fn connection(&self) -> DepositResult<ConnectionConfig> {
        let account = self.account.as_deref().map(Address::parse).transpose()?;
        Ok(ConnectionConfig {
            rpc: self.rpc.clone(),
            account,
            mnemonic: self.mnemonic.clone(),
        })
    }
}
