//! Command execution
//!
//! Single entry point that runs a resolved [`DepositCommand`] against a
//! connected client. Values the resolver deliberately left open (default
//! account, vending machine) are looked up here, at execution time.

use depositx_core::commands::{DepositCommand, ListTarget};
use depositx_core::errors::Result;
use depositx_core::logging_facility::Diagnostics;
use depositx_core::model::RedemptionRequest;

use crate::client::DepositClient;
use crate::{orchestrator, query};

/// Execute `cmd` and return its result line(s)
pub async fn execute_command(
    cmd: DepositCommand,
    client: &dyn DepositClient,
    diag: &Diagnostics,
) -> Result<String> {
    tracing::debug!(
        component = module_path!(),
        op = cmd.op_name(),
        deposit = cmd.deposit().map(tracing::field::display),
        "executing command"
    );

    match cmd {
        DepositCommand::New { lot_size, mint } => {
            orchestrator::new_deposit(client, lot_size, mint, diag).await
        }
        DepositCommand::List { target } => {
            let owner = match target {
                ListTarget::VendingMachine => client.vending_machine_address().await?,
                ListTarget::Owner(owner) => owner,
                ListTarget::DefaultAccount => client.default_account().clone(),
            };
            query::list_deposits(client, &owner).await
        }
        DepositCommand::Describe { deposit } => {
            let handle = client.deposit_at(&deposit).await?;
            orchestrator::standard_output(handle.as_ref()).await
        }
        DepositCommand::Redeem {
            deposit,
            btc_address,
        } => {
            let handle = client.deposit_at(&deposit).await?;
            orchestrator::redeem_deposit(handle.as_ref(), RedemptionRequest::New { btc_address })
                .await
        }
        DepositCommand::Withdraw { deposit, dry_run } => {
            let handle = client.deposit_at(&deposit).await?;
            orchestrator::withdraw(handle.as_ref(), dry_run).await
        }
        DepositCommand::Resume {
            deposit,
            only_funding,
            only_redemption,
            mint,
        } => {
            let handle = client.deposit_at(&deposit).await?;
            orchestrator::resume_deposit(handle.as_ref(), only_funding, only_redemption, mint, diag)
                .await
        }
        DepositCommand::CourtesyCall { deposit } => {
            let handle = client.deposit_at(&deposit).await?;
            orchestrator::courtesy_call(handle.as_ref()).await
        }
        DepositCommand::Liquidate { deposit, reason } => {
            let handle = client.deposit_at(&deposit).await?;
            orchestrator::liquidate_deposit(handle.as_ref(), reason).await
        }
    }
}
