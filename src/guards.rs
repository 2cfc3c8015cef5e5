//! Guard functions.
//!
//! Every guard returns `Ok(())` when the value passes and an [`IntegrityError`] otherwise.
//! Without message fragments the error carries a default message describing the expected
//! type and what was found; with fragments the message is built from them instead (see
//! [`format_message`]). Fragments are not rendered unless the check fails.
//!
//! Guards are `#[track_caller]`: the location in the error is the caller's.

use crate::{
    error::{ErrorKind, IntegrityError},
    format::{default_message, format_message},
    settings,
    value::{Inspect, Value},
};
use std::panic::Location;

const INTEGRITY_FAILED: &str = "Integrity test failed";

/// Check an assumption
///
/// Fails with `TypeMismatch` (or `MissingValue` for undefined) if `condition` is not a
/// boolean, and with `IntegrityFailure` if it is false.
#[track_caller]
pub fn check(condition: &Value, msg: &[&dyn Inspect]) -> Result<(), IntegrityError> {
    check_is_bool(condition, &[])?;
    if condition.as_bool() == Some(false) {
        return raise(
            ErrorKind::IntegrityFailure,
            format_message(INTEGRITY_FAILED, msg, settings::truncation_limit()),
        );
    }
    Ok(())
}

/// Unconditionally fail with `IntegrityFailure`
#[track_caller]
pub fn fail(msg: &[&dyn Inspect]) -> Result<(), IntegrityError> {
    raise(
        ErrorKind::IntegrityFailure,
        format_message(INTEGRITY_FAILED, msg, settings::truncation_limit()),
    )
}

/// Check that a value is a boolean
///
/// Undefined fails with `MissingValue`; null and every other non-boolean with
/// `TypeMismatch`. Default messages look like "Expected boolean, but was null" or
/// "Expected boolean, but was number, value was '1'".
#[track_caller]
pub fn check_is_bool(value: &Value, msg: &[&dyn Inspect]) -> Result<(), IntegrityError> {
    match value {
        Value::Bool(_) => Ok(()),
        other => type_failure("boolean", other, msg),
    }
}

/// Like [`check_is_bool`], but null and undefined pass
#[track_caller]
pub fn check_is_bool_or_null(value: &Value, msg: &[&dyn Inspect]) -> Result<(), IntegrityError> {
    if value.is_nullish() {
        return Ok(());
    }
    check_is_bool(value, msg)
}

/// Check that a value is neither null nor undefined
///
/// Any other value passes, including `0`, `false` and `""`.
#[track_caller]
pub fn check_not_null(value: &Value, msg: &[&dyn Inspect]) -> Result<(), IntegrityError> {
    let limit = settings::truncation_limit();
    match value {
        Value::Undefined => raise(
            ErrorKind::MissingValue,
            format_message("Integrity test failed: Undefined encountered", msg, limit),
        ),
        Value::Null => raise(
            ErrorKind::TypeMismatch,
            format_message("Integrity test failed: Null encountered", msg, limit),
        ),
        _ => Ok(()),
    }
}

/// Check that a value is a finite number
///
/// NaN and the infinities fail with `TypeMismatch`, as does a numeric string like "1".
#[track_caller]
pub fn check_is_valid_number(value: &Value, msg: &[&dyn Inspect]) -> Result<(), IntegrityError> {
    if value.is_finite_number() {
        return Ok(());
    }
    type_failure("number", value, msg)
}

#[track_caller]
pub fn check_is_valid_number_or_null(value: &Value, msg: &[&dyn Inspect]) -> Result<(), IntegrityError> {
    if value.is_nullish() {
        return Ok(());
    }
    check_is_valid_number(value, msg)
}

#[track_caller]
pub fn check_is_string(value: &Value, msg: &[&dyn Inspect]) -> Result<(), IntegrityError> {
    match value {
        Value::String(_) => Ok(()),
        other => type_failure("string", other, msg),
    }
}

#[track_caller]
pub fn check_is_string_or_null(value: &Value, msg: &[&dyn Inspect]) -> Result<(), IntegrityError> {
    if value.is_nullish() {
        return Ok(());
    }
    check_is_string(value, msg)
}

/// Check that a value is a non-empty string
///
/// Type failures are reported as by [`check_is_string`]; `""` fails with
/// `EmptyStringFailure`.
#[track_caller]
pub fn check_string_not_null_or_empty(value: &Value, msg: &[&dyn Inspect]) -> Result<(), IntegrityError> {
    check_is_string(value, msg)?;
    if value.as_str() == Some("") {
        return raise(
            ErrorKind::EmptyStringFailure,
            format_message("Empty string", msg, settings::truncation_limit()),
        );
    }
    Ok(())
}

#[track_caller]
pub fn check_is_function(value: &Value, msg: &[&dyn Inspect]) -> Result<(), IntegrityError> {
    match value {
        Value::Function(_) => Ok(()),
        other => type_failure("function", other, msg),
    }
}

#[track_caller]
pub fn check_is_function_or_null(value: &Value, msg: &[&dyn Inspect]) -> Result<(), IntegrityError> {
    if value.is_nullish() {
        return Ok(());
    }
    check_is_function(value, msg)
}

// Undefined is missing, everything else is the wrong type
#[track_caller]
fn type_failure(expected: &str, value: &Value, msg: &[&dyn Inspect]) -> Result<(), IntegrityError> {
    let limit = settings::truncation_limit();
    let text = if msg.is_empty() {
        default_message(expected, value, limit)
    } else {
        format_message("", msg, limit)
    };

    let kind = if value.is_undefined() {
        ErrorKind::MissingValue
    } else {
        ErrorKind::TypeMismatch
    };
    raise(kind, text)
}

#[track_caller]
fn raise(kind: ErrorKind, message: String) -> Result<(), IntegrityError> {
    let location = Location::caller();
    tracing::trace!(
        %kind,
        file = location.file(),
        line = location.line(),
        "Integrity check failed: {}",
        message
    );
    Err(IntegrityError::new(kind, message, location))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(result: Result<(), IntegrityError>) -> ErrorKind {
        result.expect_err("check should fail").kind()
    }

    fn message(result: Result<(), IntegrityError>) -> String {
        result.expect_err("check should fail").message().to_string()
    }

    fn samples() -> Vec<Value> {
        vec![
            Value::from(0),
            Value::from(1.5),
            Value::Number(f64::NAN),
            Value::Number(f64::INFINITY),
            Value::from(""),
            Value::from("true"),
            Value::from(vec![true]),
            Value::object([("a", 1)]),
            Value::function("f", |_| Value::Undefined),
        ]
    }

    #[test]
    fn test_check_is_bool_accepts_booleans() {
        assert!(check_is_bool(&Value::from(true), &[]).is_ok());
        assert!(check_is_bool(&Value::from(false), &[]).is_ok());
    }

    #[test]
    fn test_check_is_bool_rejects_other_types() {
        for value in samples() {
            assert_eq!(kind(check_is_bool(&value, &[])), ErrorKind::TypeMismatch, "{:?}", value);
        }
    }

    #[test]
    fn test_check_is_bool_missing_vs_null() {
        assert_eq!(kind(check_is_bool(&Value::Undefined, &[])), ErrorKind::MissingValue);
        assert_eq!(kind(check_is_bool(&Value::Null, &[])), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_check_is_bool_default_messages() {
        assert_eq!(message(check_is_bool(&Value::Null, &[])), "Expected boolean, but was null");
        assert_eq!(
            message(check_is_bool(&Value::Undefined, &[])),
            "Expected boolean, but was undefined"
        );
        assert_eq!(
            message(check_is_bool(&Value::from(1), &[])),
            "Expected boolean, but was number, value was '1'"
        );
    }

    #[test]
    fn test_fragments_replace_default_message() {
        let name = "enabled";
        assert_eq!(
            message(check_is_bool(&Value::from(1), &[&"{} must be a flag", &name])),
            "enabled must be a flag"
        );
    }

    #[test]
    fn test_check_is_bool_or_null() {
        assert!(check_is_bool_or_null(&Value::Null, &[]).is_ok());
        assert!(check_is_bool_or_null(&Value::Undefined, &[]).is_ok());
        assert!(check_is_bool_or_null(&Value::from(true), &[]).is_ok());
        assert_eq!(kind(check_is_bool_or_null(&Value::from("x"), &[])), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_check_not_null() {
        for value in [Value::from(0), Value::from(false), Value::from("")] {
            assert!(check_not_null(&value, &[]).is_ok());
        }

        let missing = check_not_null(&Value::Undefined, &[]).unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::MissingValue);
        assert_eq!(missing.message(), "Integrity test failed: Undefined encountered");

        let null = check_not_null(&Value::Null, &[]).unwrap_err();
        assert_eq!(null.kind(), ErrorKind::TypeMismatch);
        assert_eq!(null.message(), "Integrity test failed: Null encountered");
    }

    #[test]
    fn test_check_is_valid_number() {
        assert!(check_is_valid_number(&Value::from(1), &[]).is_ok());
        assert!(check_is_valid_number(&Value::from(-0.25), &[]).is_ok());

        for value in [
            Value::Number(f64::NAN),
            Value::Number(f64::INFINITY),
            Value::Number(f64::NEG_INFINITY),
            Value::from("1"),
            Value::Null,
        ] {
            assert_eq!(kind(check_is_valid_number(&value, &[])), ErrorKind::TypeMismatch);
        }
        assert_eq!(kind(check_is_valid_number(&Value::Undefined, &[])), ErrorKind::MissingValue);
    }

    #[test]
    fn test_check_is_valid_number_messages() {
        assert_eq!(
            message(check_is_valid_number(&Value::Number(f64::NAN), &[])),
            "Expected number, but was NaN"
        );
        assert_eq!(
            message(check_is_valid_number(&Value::from("1"), &[])),
            "Expected number, but was string, value was '1'"
        );
    }

    #[test]
    fn test_check_is_valid_number_or_null() {
        assert!(check_is_valid_number_or_null(&Value::Null, &[]).is_ok());
        assert!(check_is_valid_number_or_null(&Value::Undefined, &[]).is_ok());
        assert!(check_is_valid_number_or_null(&Value::from(3), &[]).is_ok());
        assert_eq!(
            kind(check_is_valid_number_or_null(&Value::Number(f64::NAN), &[])),
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_check_is_string() {
        assert!(check_is_string(&Value::from(""), &[]).is_ok());
        assert_eq!(kind(check_is_string(&Value::Undefined, &[])), ErrorKind::MissingValue);
        assert_eq!(kind(check_is_string(&Value::Null, &[])), ErrorKind::TypeMismatch);
        assert_eq!(
            message(check_is_string(&Value::from(1), &[])),
            "Expected string, but was number, value was '1'"
        );
    }

    #[test]
    fn test_check_is_string_or_null() {
        assert!(check_is_string_or_null(&Value::Null, &[]).is_ok());
        assert!(check_is_string_or_null(&Value::Undefined, &[]).is_ok());
        assert_eq!(kind(check_is_string_or_null(&Value::from(true), &[])), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_check_string_not_null_or_empty() {
        assert!(check_string_not_null_or_empty(&Value::from("a"), &[]).is_ok());

        let empty = check_string_not_null_or_empty(&Value::from(""), &[]).unwrap_err();
        assert_eq!(empty.kind(), ErrorKind::EmptyStringFailure);
        assert_eq!(empty.message(), "Empty string");

        assert_eq!(kind(check_string_not_null_or_empty(&Value::Undefined, &[])), ErrorKind::MissingValue);
        assert_eq!(kind(check_string_not_null_or_empty(&Value::Null, &[])), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_check_is_function() {
        let f = Value::function("noop", |_| Value::Undefined);
        assert!(check_is_function(&f, &[]).is_ok());
        assert_eq!(kind(check_is_function(&Value::Undefined, &[])), ErrorKind::MissingValue);
        assert_eq!(
            message(check_is_function(&Value::from("noop"), &[])),
            "Expected function, but was string, value was 'noop'"
        );
    }

    #[test]
    fn test_check_is_function_or_null() {
        assert!(check_is_function_or_null(&Value::Null, &[]).is_ok());
        assert!(check_is_function_or_null(&Value::Undefined, &[]).is_ok());
        assert_eq!(kind(check_is_function_or_null(&Value::from(1), &[])), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_check() {
        assert!(check(&Value::from(true), &[]).is_ok());

        let failed = check(&Value::from(false), &[]).unwrap_err();
        assert_eq!(failed.kind(), ErrorKind::IntegrityFailure);
        assert_eq!(failed.message(), "Integrity test failed");

        assert_eq!(kind(check(&Value::from(1), &[])), ErrorKind::TypeMismatch);
        assert_eq!(kind(check(&Value::Undefined, &[])), ErrorKind::MissingValue);
    }

    #[test]
    fn test_check_non_boolean_ignores_fragments() {
        assert_eq!(
            message(check(&Value::from(1), &[&"should not appear"])),
            "Expected boolean, but was number, value was '1'"
        );
    }

    #[test]
    fn test_check_with_fragments() {
        let id = 7;
        assert_eq!(message(check(&Value::from(false), &[&"bad id {}", &id])), "bad id 7");
    }

    #[test]
    fn test_fail() {
        let err = fail(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IntegrityFailure);
        assert_eq!(err.message(), "Integrity test failed");

        assert_eq!(message(fail(&[&"unreachable state {}", &3])), "unreachable state 3");
    }

    #[test]
    fn test_location_is_caller() {
        let line = line!() + 1;
        let err = check_is_bool_or_null(&Value::from(1), &[]).unwrap_err();

        assert_eq!(err.location().file(), file!());
        assert_eq!(err.location().line(), line);
    }

    #[test]
    fn test_repeated_calls_are_stable() {
        let valid = Value::from("ok");
        let invalid = Value::Null;

        for _ in 0..2 {
            assert!(check_is_string(&valid, &[]).is_ok());
            assert_eq!(kind(check_is_string(&invalid, &[])), ErrorKind::TypeMismatch);
        }
    }
}
