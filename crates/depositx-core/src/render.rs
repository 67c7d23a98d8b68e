//! Result line rendering
//!
//! Every successful command prints exactly one tab-delimited line per
//! deposit: `<address>\t<STATE>\t<lot size>`, optionally followed by
//! flow-specific fields (minted amount, redemption transaction id).

use crate::model::{Address, DepositState};

/// Render the standard `<address>\t<STATE>\t<lot size>` line
pub fn standard_line(address: &Address, state: DepositState, lot_size: u64) -> String {
    format!("{}\t{}\t{}", address, state, lot_size)
}

/// Append one extra field to a rendered line
pub fn with_extra(line: String, extra: impl std::fmt::Display) -> String {
    format!("{}\t{}", line, extra)
}

/// Join per-deposit lines into the listing output
pub fn join_lines<I>(lines: I) -> String
where
    I: IntoIterator<Item = String>,
{
    lines.into_iter().collect::<Vec<_>>().join("\n")
}
