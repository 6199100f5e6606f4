//! Tests for the domain error payload.

use rstest::rstest;
use serde_json::json;

use super::*;

#[rstest]
#[case(DomainError::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(DomainError::forbidden("hidden"), ErrorCode::Forbidden)]
#[case(DomainError::not_found("gone"), ErrorCode::NotFound)]
#[case(DomainError::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(DomainError::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: DomainError, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = DomainError::try_new(ErrorCode::InvalidRequest, "   ");
    assert_eq!(result, Err(DomainErrorValidationError::EmptyMessage));
}

#[rstest]
fn new_falls_back_to_a_generic_message() {
    let error = DomainError::new(ErrorCode::Forbidden, "");
    assert_eq!(error.message(), "access denied");
}

#[rstest]
fn serialises_with_snake_case_code_and_details() {
    let error = DomainError::forbidden("employee 20902 is outside your scope")
        .with_details(json!({"reason": "exception_exclusion"}));
    let value = serde_json::to_value(&error).expect("error serialises");
    assert_eq!(
        value,
        json!({
            "code": "forbidden",
            "message": "employee 20902 is outside your scope",
            "details": {"reason": "exception_exclusion"}
        })
    );
}

#[rstest]
fn omits_absent_details() {
    let value = serde_json::to_value(DomainError::not_found("gone")).expect("error serialises");
    assert_eq!(value, json!({"code": "not_found", "message": "gone"}));
}

#[rstest]
fn deserialising_a_blank_message_fails() {
    let result: Result<DomainError, _> =
        serde_json::from_value(json!({"code": "internal_error", "message": " "}));
    assert!(result.is_err());
}
