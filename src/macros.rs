// Variadic front-ends for the guard functions.
//
// Each macro takes the value to check followed by zero or more message fragments. A
// fragment is any expression whose type implements `Inspect`; it is borrowed and only
// rendered when the check fails.

#[doc(hidden)]
#[macro_export]
macro_rules! __fragments {
    ($($fragment:expr),*) => {
        &[$(&$fragment as &dyn $crate::Inspect),*]
    };
}

/// Check an assumption: the condition must be a boolean and true
///
/// Accepts a `bool` or a [`Value`](crate::Value) condition.
///
/// ```
/// use integrity_check::{check, ErrorKind};
///
/// let retries = 4;
/// assert!(check!(retries < 5).is_ok());
///
/// let err = check!(retries < 3, "too many retries: {}", retries).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::IntegrityFailure);
/// assert_eq!(err.message(), "too many retries: 4");
/// ```
#[macro_export]
macro_rules! check {
    ($condition:expr $(, $fragment:expr)* $(,)?) => {
        $crate::guards::check(
            &$crate::Value::from($condition),
            $crate::__fragments!($($fragment),*),
        )
    };
}

/// Fail unconditionally with an `IntegrityFailure`
#[macro_export]
macro_rules! fail {
    ($($fragment:expr),* $(,)?) => {
        $crate::guards::fail($crate::__fragments!($($fragment),*))
    };
}

/// See [`check_is_bool`](crate::guards::check_is_bool)
#[macro_export]
macro_rules! check_is_bool {
    ($value:expr $(, $fragment:expr)* $(,)?) => {
        $crate::guards::check_is_bool(&$value, $crate::__fragments!($($fragment),*))
    };
}

#[macro_export]
macro_rules! check_is_bool_or_null {
    ($value:expr $(, $fragment:expr)* $(,)?) => {
        $crate::guards::check_is_bool_or_null(&$value, $crate::__fragments!($($fragment),*))
    };
}

/// See [`check_not_null`](crate::guards::check_not_null)
#[macro_export]
macro_rules! check_not_null {
    ($value:expr $(, $fragment:expr)* $(,)?) => {
        $crate::guards::check_not_null(&$value, $crate::__fragments!($($fragment),*))
    };
}

/// See [`check_is_valid_number`](crate::guards::check_is_valid_number)
#[macro_export]
macro_rules! check_is_valid_number {
    ($value:expr $(, $fragment:expr)* $(,)?) => {
        $crate::guards::check_is_valid_number(&$value, $crate::__fragments!($($fragment),*))
    };
}

#[macro_export]
macro_rules! check_is_valid_number_or_null {
    ($value:expr $(, $fragment:expr)* $(,)?) => {
        $crate::guards::check_is_valid_number_or_null(&$value, $crate::__fragments!($($fragment),*))
    };
}

#[macro_export]
macro_rules! check_is_string {
    ($value:expr $(, $fragment:expr)* $(,)?) => {
        $crate::guards::check_is_string(&$value, $crate::__fragments!($($fragment),*))
    };
}

#[macro_export]
macro_rules! check_is_string_or_null {
    ($value:expr $(, $fragment:expr)* $(,)?) => {
        $crate::guards::check_is_string_or_null(&$value, $crate::__fragments!($($fragment),*))
    };
}

#[macro_export]
macro_rules! check_string_not_null_or_empty {
    ($value:expr $(, $fragment:expr)* $(,)?) => {
        $crate::guards::check_string_not_null_or_empty(&$value, $crate::__fragments!($($fragment),*))
    };
}

#[macro_export]
macro_rules! check_is_function {
    ($value:expr $(, $fragment:expr)* $(,)?) => {
        $crate::guards::check_is_function(&$value, $crate::__fragments!($($fragment),*))
    };
}

#[macro_export]
macro_rules! check_is_function_or_null {
    ($value:expr $(, $fragment:expr)* $(,)?) => {
        $crate::guards::check_is_function_or_null(&$value, $crate::__fragments!($($fragment),*))
    };
}

/// Build a string from fragments, `{}` placeholders first, then comma-joined
///
/// ```
/// use integrity_check::deferred_string;
///
/// assert_eq!(deferred_string!("abc"), "abc");
/// assert_eq!(deferred_string!(123, "and now {}", 345), "123, and now 345");
/// ```
#[macro_export]
macro_rules! deferred_string {
    ($($fragment:expr),* $(,)?) => {
        $crate::format::deferred_string($crate::__fragments!($($fragment),*))
    };
}
