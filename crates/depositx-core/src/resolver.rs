//! Command resolution
//!
//! Turns the tokens following `deposit` into a single [`DepositCommand`], or
//! `None` when they do not form a valid command. Resolution never touches
//! the ledger and never fails with an error: rejections are explained
//! through [`Diagnostics`] and the caller falls back to the usage banner.
//!
//! Every parser is strict about trailing tokens: anything left over after
//! the known flags and positionals makes the whole command unmatched.

use crate::commands::{DepositCommand, ListTarget};
use crate::liquidation;
use crate::logging_facility::Diagnostics;
use crate::model::Address;
use crate::tokens::{consume_existence, consume_flags, consume_value, Flag, ValueFlag};

type SubcommandParser = fn(Address, &[String], &Diagnostics) -> Option<DepositCommand>;

/// Subcommands accepted after a deposit address
static SUBCOMMANDS: &[(&str, SubcommandParser)] = &[
    ("redeem", parse_redeem),
    ("withdraw", parse_withdraw),
    ("resume", parse_resume),
    ("courtesy-call", parse_courtesy_call),
    ("liquidate", parse_liquidate),
];

/// Names of the subcommands accepted after a deposit address
pub fn subcommand_names() -> impl Iterator<Item = &'static str> {
    SUBCOMMANDS.iter().map(|(name, _)| *name)
}

/// Resolve the tokens following `deposit`
pub fn resolve(tokens: &[String], diag: &Diagnostics) -> Option<DepositCommand> {
    let (verb, rest) = tokens.split_first()?;
    match verb.as_str() {
        "new" => parse_new(rest, diag),
        "list" => parse_list(rest, diag),
        _ => parse_deposit_address_form(verb, rest, diag),
    }
}

fn parse_new(tokens: &[String], diag: &Diagnostics) -> Option<DepositCommand> {
    let no_mint = consume_existence(tokens, Flag::NoMint);
    let [lot_size] = no_mint.remaining.as_slice() else {
        diag.report("deposit new takes exactly one lot size argument");
        return None;
    };
    match lot_size.parse::<u64>() {
        Ok(lot_size) => Some(DepositCommand::New {
            lot_size,
            mint: !no_mint.present,
        }),
        Err(_) => {
            diag.report(&format!(
                "Lot size {} is not a whole number of satoshis",
                lot_size
            ));
            None
        }
    }
}

fn parse_list(tokens: &[String], diag: &Diagnostics) -> Option<DepositCommand> {
    let vending_machine = consume_existence(tokens, Flag::VendingMachine);
    let address = match consume_value(&vending_machine.remaining, ValueFlag::Address) {
        Ok(found) => found,
        Err(err) => {
            diag.report(&err.to_string());
            return None;
        }
    };

    if vending_machine.present && address.value.is_some() {
        diag.report("--vending-machine and --address cannot be combined");
        return None;
    }

    let target = match address.value {
        Some(raw) => match Address::parse(&raw) {
            Ok(owner) => ListTarget::Owner(owner),
            Err(_) => {
                diag.report(&format!("Invalid owner address: {}", raw));
                return None;
            }
        },
        None if vending_machine.present => ListTarget::VendingMachine,
        None => ListTarget::DefaultAccount,
    };

    if rejects_trailing("list", &address.remaining, diag) {
        return None;
    }
    Some(DepositCommand::List { target })
}

fn parse_deposit_address_form(
    raw_address: &str,
    tokens: &[String],
    diag: &Diagnostics,
) -> Option<DepositCommand> {
    let Ok(deposit) = Address::parse(raw_address) else {
        diag.report(&format!("Invalid deposit address: {}", raw_address));
        return None;
    };

    let Some((subcommand, args)) = tokens.split_first() else {
        return Some(DepositCommand::Describe { deposit });
    };

    match SUBCOMMANDS
        .iter()
        .find(|(name, _)| *name == subcommand.as_str())
    {
        Some((_, parser)) => parser(deposit, args, diag),
        None => {
            diag.report(&format!(
                "Unknown deposit subcommand {}; valid subcommands are: {}",
                subcommand,
                subcommand_names().collect::<Vec<_>>().join(", ")
            ));
            None
        }
    }
}

fn parse_redeem(deposit: Address, tokens: &[String], diag: &Diagnostics) -> Option<DepositCommand> {
    match tokens {
        [] => {
            diag.report("redeem requires a BTC address to send the redeemed funds to");
            None
        }
        [btc_address] => Some(DepositCommand::Redeem {
            deposit,
            btc_address: btc_address.clone(),
        }),
        [_, extra @ ..] => {
            rejects_trailing("redeem", extra, diag);
            None
        }
    }
}

fn parse_withdraw(
    deposit: Address,
    tokens: &[String],
    diag: &Diagnostics,
) -> Option<DepositCommand> {
    let dry_run = consume_existence(tokens, Flag::DryRun);
    if rejects_trailing("withdraw", &dry_run.remaining, diag) {
        return None;
    }
    Some(DepositCommand::Withdraw {
        deposit,
        dry_run: dry_run.present,
    })
}

fn parse_resume(deposit: Address, tokens: &[String], diag: &Diagnostics) -> Option<DepositCommand> {
    let (flags, remaining) =
        consume_flags(tokens, &[Flag::NoMint, Flag::Funding, Flag::Redemption]);

    if flags.has(Flag::Funding) && flags.has(Flag::Redemption) {
        diag.report("--funding and --redemption are mutually exclusive");
        return None;
    }
    if flags.has(Flag::Redemption) && flags.has(Flag::NoMint) {
        diag.report("--no-mint has no meaning when resuming a redemption");
        return None;
    }
    if rejects_trailing("resume", &remaining, diag) {
        return None;
    }

    Some(DepositCommand::Resume {
        deposit,
        only_funding: flags.has(Flag::Funding),
        only_redemption: flags.has(Flag::Redemption),
        mint: !flags.has(Flag::NoMint),
    })
}

fn parse_courtesy_call(
    deposit: Address,
    tokens: &[String],
    diag: &Diagnostics,
) -> Option<DepositCommand> {
    if rejects_trailing("courtesy-call", tokens, diag) {
        return None;
    }
    Some(DepositCommand::CourtesyCall { deposit })
}

fn parse_liquidate(
    deposit: Address,
    tokens: &[String],
    diag: &Diagnostics,
) -> Option<DepositCommand> {
    match tokens {
        [] => Some(DepositCommand::Liquidate {
            deposit,
            reason: None,
        }),
        [keyword, key] if keyword == "for" => match liquidation::lookup(key) {
            Some(entry) => Some(DepositCommand::Liquidate {
                deposit,
                reason: Some(entry.reason),
            }),
            None => {
                diag.report(&format!(
                    "Unknown liquidation reason {}; valid reasons are: {}",
                    key,
                    liquidation::keys().collect::<Vec<_>>().join(", ")
                ));
                None
            }
        },
        _ => {
            diag.report("usage: liquidate [for <reason>]");
            None
        }
    }
}

/// Report and signal leftover tokens
fn rejects_trailing(subcommand: &str, remaining: &[String], diag: &Diagnostics) -> bool {
    if remaining.is_empty() {
        return false;
    }
    diag.report(&format!(
        "Unexpected arguments for {}: {}",
        subcommand,
        remaining.join(" ")
    ));
    true
}
