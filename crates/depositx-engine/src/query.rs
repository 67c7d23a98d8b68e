//! Deposit listing by current owner

use futures::future::try_join_all;
use std::collections::HashSet;
use std::time::Instant;

use depositx_core::errors::Result;
use depositx_core::model::Address;
use depositx_core::{log_op_end, log_op_error, log_op_start, render};

use crate::client::DepositClient;
use crate::orchestrator::standard_output;

/// Deposits ever transferred to `owner`, deduplicated in first-seen order
pub async fn transferred_deposits(client: &dyn DepositClient, owner: &Address) -> Result<Vec<Address>> {
    let transfers = client.deposits_transferred_to(owner).await?;
    let mut seen = HashSet::new();
    Ok(transfers
        .into_iter()
        .filter(|deposit| seen.insert(deposit.clone()))
        .collect())
}

/// One standard line per deposit currently owned by `owner`
///
/// Transfer history is replayed to find candidates, then each candidate's
/// current owner is checked so that deposits since transferred away are
/// dropped. Lookups run concurrently; the first failure fails the listing.
pub async fn list_deposits(client: &dyn DepositClient, owner: &Address) -> Result<String> {
    let op = "list_deposits";
    let started = Instant::now();
    log_op_start!(op, owner = %owner);

    let result: Result<String> = async {
        let candidates = transferred_deposits(client, owner).await?;
        let owners = try_join_all(candidates.iter().map(|d| client.owner_of(d))).await?;

        let held: Vec<&Address> = candidates
            .iter()
            .zip(owners)
            .filter(|(_, current)| current == owner)
            .map(|(deposit, _)| deposit)
            .collect();

        let handles = try_join_all(held.iter().map(|d| client.deposit_at(d))).await?;
        let lines = try_join_all(handles.iter().map(|h| standard_output(h.as_ref()))).await?;
        Ok(render::join_lines(lines))
    }
    .await;

    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    match &result {
        Ok(listing) => {
            log_op_end!(op, duration_ms = duration_ms, count = listing.lines().count());
        }
        Err(err) => {
            log_op_error!(op, err.clone(), duration_ms = duration_ms);
        }
    }
    result
}
