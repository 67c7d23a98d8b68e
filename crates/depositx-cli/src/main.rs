//! depositx CLI
//!
//! Command-line interface for driving custodial deposits through their
//! lifecycle

use clap::{error::ErrorKind, Parser, Subcommand};
use std::process::exit;
use tracing::Instrument;

use depositx_core::liquidation;
use depositx_core::logging_facility::{self, Diagnostics};
use depositx_core::resolver::{self, subcommand_names};
use depositx_core::DepositCommand;
use depositx_core_types::RequestId;
use depositx_engine::{connect, execute_command};

mod config;

use config::{GlobalArgs, Settings};

#[derive(Debug, Parser)]
#[command(name = "depositx")]
#[command(about = "depositx - Custodial deposit lifecycle orchestration", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Deposit operations (see usage below for the accepted forms)
    Deposit {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn usage() -> String {
    format!(
        "\
Usage: depositx [--debug] [--rpc <url>] [--mnemonic <key-or-phrase>] [--account <address>] deposit <command>

Commands:
  deposit new [--no-mint] <lot-size-satoshis>
  deposit list [--vending-machine | --address <address>]
  deposit <address>
  deposit <address> redeem <btc-address>
  deposit <address> withdraw [--dry-run]
  deposit <address> resume [--funding | --redemption] [--no-mint]
  deposit <address> courtesy-call
  deposit <address> liquidate [for <reason>]

Deposit subcommands: {}
Liquidation reasons: {}",
        subcommand_names().collect::<Vec<_>>().join(", "),
        liquidation::keys().collect::<Vec<_>>().join(", ")
    )
}

fn usage_and_exit() -> ! {
    println!("{}", usage());
    exit(1);
}

/// Resolve the `deposit` tokens, if any were given
fn resolve(command: Option<Commands>, diag: &Diagnostics) -> Option<DepositCommand> {
    match command? {
        Commands::Deposit { args } => resolver::resolve(&args, diag),
    }
}

async fn run(
    command: DepositCommand,
    settings: &Settings,
    diag: &Diagnostics,
) -> Result<String, Box<dyn std::error::Error>> {
    let client = connect(&settings.connection()?)?;
    Ok(execute_command(command, client.as_ref(), diag).await?)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => usage_and_exit(),
    };

    let settings = match Settings::load(&cli.global) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };
    logging_facility::init(settings.profile());
    let diag = Diagnostics::new(settings.verbosity());

    let Some(command) = resolve(cli.command, &diag) else {
        usage_and_exit();
    };

    let request_id = RequestId::new();
    let span = tracing::info_span!("depositx", request_id = %request_id, op = command.op_name());
    match run(command, &settings, &diag).instrument(span).await {
        Ok(line) => println!("{}", line),
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }
}
