use colored::Colorize;
use std::{fmt, panic::Location};

/// The category of a failed integrity check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The value was absent (undefined)
    MissingValue,
    /// The value was present but of the wrong type, including null where a value was required
    TypeMismatch,
    /// A condition was false, or `fail` was called
    IntegrityFailure,
    /// A string was present but empty where a non-empty string was required
    EmptyStringFailure,
}

impl ErrorKind {
    /// Conventional error label for this kind, as printed in front of the message
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingValue => "ReferenceError",
            Self::TypeMismatch => "TypeError",
            Self::IntegrityFailure | Self::EmptyStringFailure => "Error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingValue => write!(f, "missing value"),
            Self::TypeMismatch => write!(f, "type mismatch"),
            Self::IntegrityFailure => write!(f, "integrity failure"),
            Self::EmptyStringFailure => write!(f, "empty string"),
        }
    }
}

/// Error returned by every guard when a check fails
///
/// The location points at the code that called the guard, not at the guard itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityError {
    kind: ErrorKind,
    message: String,
    location: &'static Location<'static>,
}

impl IntegrityError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, location: &'static Location<'static>) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Source location of the failing check
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    pub fn is_missing_value(&self) -> bool {
        matches!(self.kind, ErrorKind::MissingValue)
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.kind, ErrorKind::TypeMismatch)
    }

    /// Panic with this error, for callers that want exception-like behaviour
    #[track_caller]
    pub fn raise(self) -> ! {
        panic!("{}", self)
    }
}

impl fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {}",
            self.kind.label().red().bold(),
            self.message,
            format!(
                "(at {}:{}:{})",
                self.location.file(),
                self.location.line(),
                self.location.column()
            )
            .dimmed(),
        )
    }
}

impl std::error::Error for IntegrityError {}

/// A message fragment could not be turned into a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectError {
    /// Serialization of a foreign type failed
    Serialize { type_name: &'static str, reason: String },
    /// A `Display` implementation reported an error
    Display { type_name: &'static str },
}

impl fmt::Display for InspectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InspectError::Serialize { type_name, reason } => {
                write!(f, "could not serialize {}: {}", type_name.cyan(), reason)
            }
            InspectError::Display { type_name } => {
                write!(f, "formatting {} returned an error", type_name.cyan())
            }
        }
    }
}

impl std::error::Error for InspectError {}
