//! Lifecycle flows
//!
//! Each flow drives one deposit from its current state to a terminal or
//! resumable point and renders the result line. Flows never retry: the first
//! failed ledger call or event wait aborts the flow and is returned as is.

use std::time::Instant;

use depositx_core::errors::{DepositError, Result};
use depositx_core::liquidation::{self, LiquidationReason};
use depositx_core::logging_facility::Diagnostics;
use depositx_core::model::{Address, DepositState, RedemptionRequest, TriggerOp};
use depositx_core::{log_op_end, log_op_error, log_op_start, render};

use crate::client::{DepositClient, DepositHandle, LifecycleEvent, LifecycleEventKind};
use crate::events::EventWaiter;

/// `<address>\t<STATE>\t<lot size>` for the deposit as it is now
pub async fn standard_output(handle: &dyn DepositHandle) -> Result<String> {
    let (state, lot_size) = tokio::try_join!(handle.current_state(), handle.lot_size_satoshis())?;
    Ok(render::standard_line(handle.address(), state, lot_size))
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn finish<T>(op: &'static str, started: Instant, deposit: &Address, result: Result<T>) -> Result<T> {
    let duration_ms = elapsed_ms(started);
    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = duration_ms, deposit: deposit);
        }
        Err(err) => {
            log_op_error!(op, err.clone(), duration_ms = duration_ms, deposit: deposit);
        }
    }
    result
}

/// Open a deposit of `lot_size` satoshis and run the funding flow on it
///
/// # Errors
/// `LotSizeNotPermitted` if the factory does not offer `lot_size`; anything
/// [`run_deposit`] returns.
pub async fn new_deposit(
    client: &dyn DepositClient,
    lot_size: u64,
    mint: bool,
    diag: &Diagnostics,
) -> Result<String> {
    let allowed = client.allowed_lot_sizes().await?;
    if !allowed.contains(&lot_size) {
        return Err(DepositError::LotSizeNotPermitted { lot_size, allowed });
    }

    let handle = client.create_deposit(lot_size).await?;
    tracing::info!(
        component = module_path!(),
        deposit = %handle.address(),
        lot_size,
        "deposit created"
    );
    run_deposit(handle.as_ref(), mint, diag).await
}

/// Funding flow: wait for the funding address, then for activation, then
/// optionally mint
///
/// Output is the standard line, plus the minted amount when `mint` is set.
pub async fn run_deposit(handle: &dyn DepositHandle, mint: bool, diag: &Diagnostics) -> Result<String> {
    let op = "run_deposit";
    let started = Instant::now();
    log_op_start!(op, deposit: handle.address(), mint);

    let result: Result<String> = async {
        let mut waiter = EventWaiter::new(handle);
        let funding_address = waiter.subscribe(LifecycleEventKind::FundingAddressAvailable)?;
        let active = waiter.subscribe(LifecycleEventKind::Active)?;

        handle.auto_submit().await?;

        if let LifecycleEvent::FundingAddressAvailable { btc_address } =
            funding_address.wait().await?
        {
            let (state, lot_size) =
                tokio::try_join!(handle.current_state(), handle.lot_size_satoshis())?;
            if state < DepositState::Active {
                diag.prompt(&format!(
                    "Send {} satoshis to {} to fund deposit {}.",
                    lot_size,
                    btc_address,
                    handle.address()
                ));
            }
        }

        active.wait().await?;

        if mint {
            let minted = handle.mint().await?;
            Ok(render::with_extra(standard_output(handle).await?, minted))
        } else {
            standard_output(handle).await
        }
    }
    .await;

    finish(op, started, handle.address(), result)
}

/// Pick up whichever flow an earlier invocation left unfinished
///
/// A recorded redemption takes precedence; otherwise the funding flow runs.
///
/// # Errors
/// `NothingToResume` when the requested phase is already behind the deposit
/// (`only_funding` past `Active`) or not reached yet (`only_redemption`
/// before `Active`, or with no redemption on record), and when a deposit
/// past `Active` has no redemption on record.
///
/// An `Active` deposit still counts as being in the funding phase, so
/// `--funding` on it re-runs the tail of the funding flow and mints.
pub async fn resume_deposit(
    handle: &dyn DepositHandle,
    only_funding: bool,
    only_redemption: bool,
    mint: bool,
    diag: &Diagnostics,
) -> Result<String> {
    let state = handle.current_state().await?;
    let nothing_to_resume = |phase| DepositError::NothingToResume {
        deposit: handle.address().to_string(),
        state,
        phase,
    };

    if only_redemption && state < DepositState::Active {
        return Err(nothing_to_resume("redemption"));
    }
    if only_funding && state > DepositState::Active {
        return Err(nothing_to_resume("funding"));
    }

    match handle.latest_redemption_details().await? {
        Some(details) => redeem_deposit(handle, RedemptionRequest::Existing(details)).await,
        None if only_redemption => Err(nothing_to_resume("redemption")),
        None if state > DepositState::Active => Err(nothing_to_resume("funding")),
        None => run_deposit(handle, mint, diag).await,
    }
}

/// Redemption flow: request (or reattach to) a redemption and wait until
/// the BTC is withdrawn
///
/// Output is the standard line plus the redemption transaction id.
pub async fn redeem_deposit(handle: &dyn DepositHandle, request: RedemptionRequest) -> Result<String> {
    let op = "redeem_deposit";
    let started = Instant::now();
    log_op_start!(op, deposit: handle.address());

    let result: Result<String> = async {
        let mut waiter = EventWaiter::new(handle);
        let withdrawn = waiter.subscribe(LifecycleEventKind::Withdrawn)?;

        let details = match request {
            RedemptionRequest::New { btc_address } => {
                handle.request_redemption(&btc_address).await?
            }
            RedemptionRequest::Existing(details) => details,
        };
        handle.auto_submit_redemption(&details).await?;

        match withdrawn.wait().await? {
            LifecycleEvent::Withdrawn { txid } => {
                Ok(render::with_extra(standard_output(handle).await?, txid))
            }
            other => Err(DepositError::Internal {
                message: format!("unexpected lifecycle event {:?}", other),
            }),
        }
    }
    .await;

    finish(op, started, handle.address(), result)
}

/// Submit the remedial operation for `reason`, or for the first registered
/// reason the current state admits
///
/// Nothing is submitted when the state check fails.
///
/// # Errors
/// `StateNotAllowed` if `reason` does not apply to the current state,
/// `NoLiquidationStrategy` if no reason is given and none applies.
pub async fn liquidate_deposit(
    handle: &dyn DepositHandle,
    reason: Option<LiquidationReason>,
) -> Result<String> {
    let op = "liquidate_deposit";
    let started = Instant::now();
    log_op_start!(op, deposit: handle.address());

    let result: Result<String> = async {
        let state = handle.current_state().await?;
        let entry = match reason {
            Some(reason) => {
                let entry = reason.entry();
                if !entry.applies_to(state) {
                    return Err(DepositError::StateNotAllowed {
                        deposit: handle.address().to_string(),
                        state,
                        reason: entry.key,
                    });
                }
                entry
            }
            None => liquidation::first_applicable(state).ok_or_else(|| {
                DepositError::NoLiquidationStrategy {
                    deposit: handle.address().to_string(),
                    state,
                }
            })?,
        };

        tracing::info!(
            component = module_path!(),
            deposit = %handle.address(),
            reason = entry.key,
            operation = entry.operation.method_name(),
            "submitting liquidation"
        );
        handle.trigger(entry.operation).await?;
        standard_output(handle).await
    }
    .await;

    finish(op, started, handle.address(), result)
}

/// Notify the ledger that the deposit has fallen under the courtesy threshold
pub async fn courtesy_call(handle: &dyn DepositHandle) -> Result<String> {
    let op = "courtesy_call";
    let started = Instant::now();
    log_op_start!(op, deposit: handle.address());

    let result: Result<String> = async {
        handle.trigger(TriggerOp::NotifyCourtesyCall).await?;
        standard_output(handle).await
    }
    .await;

    finish(op, started, handle.address(), result)
}

/// Withdraw the caller's balance held by the deposit
///
/// With `dry_run` only the withdrawable amount is read and nothing is
/// submitted; the output is `<address>\t<amount>`. Otherwise the output is
/// `<address>\t<amount>\t<txid>`.
pub async fn withdraw(handle: &dyn DepositHandle, dry_run: bool) -> Result<String> {
    let op = "withdraw";
    let started = Instant::now();
    log_op_start!(op, deposit: handle.address(), dry_run);

    let result: Result<String> = async {
        if dry_run {
            let amount = handle.withdrawable_amount().await?;
            Ok(render::with_extra(handle.address().to_string(), amount))
        } else {
            let outcome = handle.withdraw_funds().await?;
            Ok(render::with_extra(
                render::with_extra(handle.address().to_string(), outcome.amount),
                outcome.txid,
            ))
        }
    }
    .await;

    finish(op, started, handle.address(), result)
}
