#![allow(clippy::unwrap_used, clippy::expect_used)]

use depositx_core::errors::DepositError;
use depositx_core::logging_facility::test_capture::init_test_capture;
use depositx_core::logging_facility::Diagnostics;
use depositx_core::resolver::resolve;
use depositx_core::{log_op_end, log_op_error, log_op_start, DepositState};
use depositx_core_types::schema::{
    EVENT_DIAGNOSTIC, EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DEPOSIT, FIELD_ERR_CODE,
};

const DEPOSIT: &str = "0x00000000000000000000000000000000000000d1";

fn tokens(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

#[test]
fn test_log_op_start_and_end() {
    let capture = init_test_capture();
    let op = "test_log_op_boundaries_unique_1";

    log_op_start!(op, deposit: DEPOSIT, mint = true);
    log_op_end!(op, duration_ms = 7);

    capture.assert_event_exists(op, EVENT_START);
    capture.assert_event_exists(op, EVENT_END);
    let start = capture
        .events()
        .into_iter()
        .find(|e| e.op.as_deref() == Some(op) && e.event.as_deref() == Some(EVENT_START))
        .unwrap();
    assert_eq!(start.fields.get(FIELD_DEPOSIT), Some(&DEPOSIT.to_string()));
    assert_eq!(start.fields.get("mint"), Some(&"true".to_string()));
    let end = capture
        .events()
        .into_iter()
        .find(|e| e.op.as_deref() == Some(op) && e.event.as_deref() == Some(EVENT_END))
        .unwrap();
    assert_eq!(end.fields.get("duration_ms"), Some(&"7".to_string()));
}

#[test]
fn test_log_op_error_carries_stable_code() {
    let capture = init_test_capture();
    let op = "test_log_op_error_unique_2";

    let err = DepositError::NoLiquidationStrategy {
        deposit: DEPOSIT.to_string(),
        state: DepositState::Redeemed,
    };
    log_op_error!(op, err, duration_ms = 3, deposit: DEPOSIT);

    let errors: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].fields.get(FIELD_ERR_CODE),
        Some(&"ERR_NO_LIQUIDATION_STRATEGY".to_string())
    );
    assert_eq!(errors[0].fields.get(FIELD_DEPOSIT), Some(&DEPOSIT.to_string()));
}

#[test]
fn test_log_op_end_without_deposit_keeps_extra_fields() {
    let capture = init_test_capture();
    let op = "test_log_op_end_fields_unique_3";

    log_op_start!(op, owner = %DEPOSIT);
    log_op_end!(op, duration_ms = 1, count = 2);

    let end = capture
        .events()
        .into_iter()
        .find(|e| e.op.as_deref() == Some(op) && e.event.as_deref() == Some(EVENT_END))
        .unwrap();
    assert_eq!(end.fields.get("count"), Some(&"2".to_string()));
    assert!(end.fields.get(FIELD_DEPOSIT).is_none());
}

#[test]
fn test_debug_diagnostics_explain_unknown_subcommand() {
    let capture = init_test_capture();
    let line = "0x1111111111111111111111111111111111111111 frobnicate";

    assert!(resolve(&tokens(line), &Diagnostics::debug()).is_none());

    let messages = capture.messages_for(EVENT_DIAGNOSTIC);
    let msg = messages
        .iter()
        .find(|m| m.contains("frobnicate"))
        .expect("diagnostic for unknown subcommand");
    for name in ["redeem", "withdraw", "resume", "courtesy-call", "liquidate"] {
        assert!(msg.contains(name), "{msg} should list {name}");
    }
}

#[test]
fn test_quiet_diagnostics_are_suppressed() {
    let capture = init_test_capture();
    let line = "0x2222222222222222222222222222222222222222 quietly-unknown";

    assert!(resolve(&tokens(line), &Diagnostics::quiet()).is_none());

    assert!(capture
        .messages_for(EVENT_DIAGNOSTIC)
        .iter()
        .all(|m| !m.contains("quietly-unknown")));
}
