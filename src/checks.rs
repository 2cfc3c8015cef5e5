use crate::error::IntegrityError;
use colored::Colorize;

/// Helper to format multiple integrity errors into a single report
pub fn format_errors(errors: &[IntegrityError]) -> String {
    let error_summary = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Integrity checks failed with {} error(s):\n{}",
        errors.len().to_string().yellow().bold(),
        error_summary
    )
}

/// Collects the outcome of many guards so every failure is reported at once
///
/// # Example
/// ```rust
/// use integrity_check::{check_is_string, check_is_valid_number, Checks, Value};
///
/// let name = Value::from("api");
/// let port = Value::Null;
///
/// let mut checks = Checks::new();
/// checks.record(check_is_string!(name));
/// checks.record(check_is_valid_number!(port, "port must be set"));
///
/// let errors = checks.finish().unwrap_err();
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors[0].message(), "port must be set");
/// ```
#[derive(Debug)]
pub struct Checks {
    errors: Vec<IntegrityError>,
    passed: usize,
}

impl Checks {
    /// Create an empty collector
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            passed: 0,
        }
    }

    /// Record the result of a guard, returning whether it passed
    pub fn record(&mut self, result: Result<(), IntegrityError>) -> bool {
        match result {
            Ok(()) => {
                self.passed += 1;
                true
            }
            Err(e) => {
                tracing::debug!(kind = %e.kind(), "Collected failed check: {}", e.message());
                self.errors.push(e);
                false
            }
        }
    }

    /// Number of checks that passed so far
    pub fn passed(&self) -> usize {
        self.passed
    }

    /// Failures collected so far
    pub fn errors(&self) -> &[IntegrityError] {
        &self.errors
    }

    /// Validate that all recorded checks passed
    ///
    /// Unlike `finish()`, this doesn't consume the collector, so more checks can be
    /// recorded afterward.
    pub fn validate(&self) -> Result<(), Vec<IntegrityError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors.clone())
        }
    }

    /// Consume the collector and return any errors that were collected
    pub fn finish(self) -> Result<(), Vec<IntegrityError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    /// Consume the collector and panic if there were any errors
    #[track_caller]
    pub fn finish_or_panic(self) {
        if !self.errors.is_empty() {
            panic!("{}", format_errors(&self.errors));
        }
    }
}

impl Default for Checks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, guards, value::Value};

    #[test]
    fn test_checks_new() {
        let checks = Checks::new();
        assert_eq!(checks.errors.len(), 0);
        assert_eq!(checks.passed(), 0);
    }

    #[test]
    fn test_checks_default() {
        let checks = Checks::default();
        assert_eq!(checks.errors.len(), 0);
    }

    #[test]
    fn test_finish_with_no_errors() {
        let mut checks = Checks::new();
        assert!(checks.record(guards::check_is_bool(&Value::from(true), &[])));

        assert_eq!(checks.passed(), 1);
        assert!(checks.finish().is_ok());
    }

    #[test]
    fn test_collects_multiple_errors() {
        let mut checks = Checks::new();

        assert!(!checks.record(guards::check_is_string(&Value::Undefined, &[])));
        assert!(!checks.record(guards::check_not_null(&Value::Null, &[])));
        assert!(checks.record(guards::check_is_valid_number(&Value::from(2), &[])));

        let result = checks.finish();
        assert!(result.is_err());

        if let Err(errors) = result {
            assert_eq!(errors.len(), 2);
            assert_eq!(errors[0].kind(), ErrorKind::MissingValue);
            assert_eq!(errors[1].kind(), ErrorKind::TypeMismatch);
        }
    }

    #[test]
    fn test_validate_does_not_consume() {
        let mut checks = Checks::new();
        checks.record(guards::fail(&[]));

        assert!(checks.validate().is_err());
        // Collector still usable here
        checks.record(guards::fail(&[]));
        assert_eq!(checks.errors().len(), 2);
    }

    #[test]
    fn test_format_errors_single() {
        colored::control::set_override(false);

        let errors = vec![guards::check_is_bool(&Value::Null, &[]).unwrap_err()];

        let formatted = format_errors(&errors);
        assert!(formatted.contains("Integrity checks failed with 1 error(s)"));
        assert!(formatted.contains("  - TypeError: Expected boolean, but was null"));
    }

    #[test]
    fn test_format_errors_multiple() {
        colored::control::set_override(false);

        let errors = vec![
            guards::check_is_string(&Value::Undefined, &[]).unwrap_err(),
            guards::check_string_not_null_or_empty(&Value::from(""), &[]).unwrap_err(),
        ];

        let formatted = format_errors(&errors);
        assert!(formatted.contains("Integrity checks failed with 2 error(s)"));
        assert!(formatted.contains("ReferenceError: Expected string, but was undefined"));
        assert!(formatted.contains("Error: Empty string"));
    }

    #[test]
    fn test_finish_or_panic_succeeds() {
        let checks = Checks::new();
        checks.finish_or_panic();
    }

    #[test]
    #[should_panic(expected = "error(s)")]
    fn test_finish_or_panic_panics() {
        let mut checks = Checks::new();
        checks.record(guards::fail(&[&"broken"]));
        checks.finish_or_panic();
    }
}
