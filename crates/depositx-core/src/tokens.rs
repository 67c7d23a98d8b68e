//! Flag extraction over raw command-line tokens
//!
//! The resolver peels known flags off a token list and then inspects what is
//! left. Every function here is pure: it never mutates its input and always
//! returns the unmatched tokens in their original relative order.
//!
//! Flags are identified by the [`Flag`] and [`ValueFlag`] enums rather than
//! by normalizing strings at runtime, so a result map can only be indexed by
//! a flag the resolver actually asked for.

use std::collections::BTreeMap;
use thiserror::Error;

/// Presence-only switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Flag {
    NoMint,
    VendingMachine,
    DryRun,
    Funding,
    Redemption,
}

impl Flag {
    pub fn token(self) -> &'static str {
        match self {
            Flag::NoMint => "--no-mint",
            Flag::VendingMachine => "--vending-machine",
            Flag::DryRun => "--dry-run",
            Flag::Funding => "--funding",
            Flag::Redemption => "--redemption",
        }
    }
}

/// Switches that take the following token as their value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueFlag {
    Address,
}

impl ValueFlag {
    pub fn token(self) -> &'static str {
        match self {
            ValueFlag::Address => "--address",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The flag was the last token, so there is nothing to take as its value
    #[error("{flag} requires a value")]
    MissingValue { flag: &'static str },
}

/// Outcome of looking for a presence flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Existence {
    pub present: bool,
    pub remaining: Vec<String>,
}

/// Outcome of looking for a value flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueMatch {
    pub value: Option<String>,
    pub remaining: Vec<String>,
}

/// Remove the first occurrence of `flag`
pub fn consume_existence(tokens: &[String], flag: Flag) -> Existence {
    match tokens.iter().position(|t| t == flag.token()) {
        Some(idx) => {
            let mut remaining = tokens.to_vec();
            remaining.remove(idx);
            Existence {
                present: true,
                remaining,
            }
        }
        None => Existence {
            present: false,
            remaining: tokens.to_vec(),
        },
    }
}

/// Remove the first occurrence of `flag` together with the token after it
///
/// # Errors
/// `MissingValue` if `flag` is the final token.
pub fn consume_value(tokens: &[String], flag: ValueFlag) -> Result<ValueMatch, TokenError> {
    let Some(idx) = tokens.iter().position(|t| t == flag.token()) else {
        return Ok(ValueMatch {
            value: None,
            remaining: tokens.to_vec(),
        });
    };

    let value = tokens
        .get(idx + 1)
        .cloned()
        .ok_or(TokenError::MissingValue { flag: flag.token() })?;

    let remaining = tokens[..idx]
        .iter()
        .chain(tokens[idx + 2..].iter())
        .cloned()
        .collect();

    Ok(ValueMatch {
        value: Some(value),
        remaining,
    })
}

/// Presence results for a set of flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet(BTreeMap<Flag, bool>);

impl FlagSet {
    /// True if the flag was requested and found
    pub fn has(&self, flag: Flag) -> bool {
        self.0.get(&flag).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Flag, bool)> + '_ {
        self.0.iter().map(|(f, p)| (*f, *p))
    }
}

/// Value results for a set of value flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueSet(BTreeMap<ValueFlag, Option<String>>);

impl ValueSet {
    pub fn get(&self, flag: ValueFlag) -> Option<&str> {
        self.0.get(&flag).and_then(|v| v.as_deref())
    }
}

/// Apply [`consume_existence`] for each flag in order, threading the remainder
pub fn consume_flags(tokens: &[String], flags: &[Flag]) -> (FlagSet, Vec<String>) {
    let mut found = BTreeMap::new();
    let mut remaining = tokens.to_vec();
    for &flag in flags {
        let step = consume_existence(&remaining, flag);
        found.insert(flag, step.present);
        remaining = step.remaining;
    }
    (FlagSet(found), remaining)
}

/// Apply [`consume_value`] for each flag in order, threading the remainder
///
/// # Errors
/// The first `MissingValue` encountered.
pub fn consume_values(
    tokens: &[String],
    flags: &[ValueFlag],
) -> Result<(ValueSet, Vec<String>), TokenError> {
    let mut found = BTreeMap::new();
    let mut remaining = tokens.to_vec();
    for &flag in flags {
        let step = consume_value(&remaining, flag)?;
        found.insert(flag, step.value);
        remaining = step.remaining;
    }
    Ok((ValueSet(found), remaining))
}
