#![allow(clippy::unwrap_used, clippy::expect_used)]

use depositx_core::tokens::{
    consume_existence, consume_flags, consume_value, consume_values, Flag, TokenError, ValueFlag,
};
use proptest::prelude::*;

fn toks(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// Plain words that can never collide with a flag token
fn word() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,8}"
}

proptest! {
    #[test]
    fn prop_absent_flag_leaves_tokens_untouched(tokens in prop::collection::vec(word(), 0..8)) {
        let out = consume_existence(&tokens, Flag::NoMint);
        prop_assert!(!out.present);
        prop_assert_eq!(out.remaining, tokens);
    }

    #[test]
    fn prop_existence_preserves_order_of_other_tokens(
        before in prop::collection::vec(word(), 0..5),
        after in prop::collection::vec(word(), 0..5),
    ) {
        let mut tokens = before.clone();
        tokens.push("--dry-run".to_string());
        tokens.extend(after.iter().cloned());

        let out = consume_existence(&tokens, Flag::DryRun);
        let mut expected = before;
        expected.extend(after);
        prop_assert!(out.present);
        prop_assert_eq!(out.remaining, expected);
    }

    #[test]
    fn prop_value_removes_flag_and_value_only(
        before in prop::collection::vec(word(), 0..5),
        value in word(),
        after in prop::collection::vec(word(), 0..5),
    ) {
        let mut tokens = before.clone();
        tokens.push("--address".to_string());
        tokens.push(value.clone());
        tokens.extend(after.iter().cloned());

        let out = consume_value(&tokens, ValueFlag::Address).unwrap();
        let mut expected = before;
        expected.extend(after);
        prop_assert_eq!(out.value, Some(value));
        prop_assert_eq!(out.remaining, expected);
    }
}

#[test]
fn test_value_flag_absent_returns_none() {
    let tokens = toks(&["--dry-run"]);
    let out = consume_value(&tokens, ValueFlag::Address).unwrap();
    assert_eq!(out.value, None);
    assert_eq!(out.remaining, tokens);
}

#[test]
fn test_value_flag_final_token_is_malformed() {
    let result = consume_values(&toks(&["--vending-machine", "--address"]), &[ValueFlag::Address]);
    assert_eq!(
        result.unwrap_err(),
        TokenError::MissingValue { flag: "--address" }
    );
}

#[test]
fn test_value_may_look_like_a_flag() {
    // Whatever follows the flag is its value; validation happens downstream.
    let out = consume_value(&toks(&["--address", "--dry-run"]), ValueFlag::Address).unwrap();
    assert_eq!(out.value.as_deref(), Some("--dry-run"));
    assert!(out.remaining.is_empty());
}

#[test]
fn test_consume_values_collects_by_flag() {
    let (values, rest) =
        consume_values(&toks(&["a", "--address", "0x1", "b"]), &[ValueFlag::Address]).unwrap();
    assert_eq!(values.get(ValueFlag::Address), Some("0x1"));
    assert_eq!(rest, toks(&["a", "b"]));
}

#[test]
fn test_flag_set_records_requested_flags_only() {
    let (found, _) = consume_flags(&toks(&["--funding"]), &[Flag::Funding, Flag::Redemption]);
    let recorded: Vec<_> = found.iter().collect();
    assert_eq!(
        recorded,
        vec![(Flag::Funding, true), (Flag::Redemption, false)]
    );
}
