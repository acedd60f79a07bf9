//! Tests for the domain error payload.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
#[case("")]
#[case("   ")]
fn try_new_rejects_empty_messages(#[case] message: &str) {
    let result = Error::try_new(ErrorCode::InvalidRequest, message);
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn serialises_code_in_snake_case_and_skips_missing_details() {
    let value = serde_json::to_value(Error::not_found("missing")).expect("serialise error");
    assert_eq!(value, json!({ "code": "not_found", "message": "missing" }));
}

#[rstest]
fn details_round_trip_through_serde() {
    let error = Error::invalid_request("bad").with_details(json!({ "field": "email" }));
    let value = serde_json::to_value(&error).expect("serialise error");
    let decoded: Error = serde_json::from_value(value).expect("deserialise error");
    assert_eq!(decoded, error);
}

#[rstest]
fn deserialising_blank_message_fails() {
    let payload = json!({ "code": "internal_error", "message": " " });
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err());
}
