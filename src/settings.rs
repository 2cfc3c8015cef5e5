use colored::Colorize;
use std::{
    env, fmt,
    path::Path,
    sync::atomic::{AtomicUsize, Ordering},
};

/// Default maximum length of a stringified value before it is cut off with "..."
pub const DEFAULT_TRUNCATION_LIMIT: usize = 30;

/// Environment variable read by [`Settings::from_env`]
pub const TRUNCATION_LIMIT_ENV: &str = "INTEGRITY_TRUNCATION_LIMIT";

static TRUNCATION_LIMIT: AtomicUsize = AtomicUsize::new(DEFAULT_TRUNCATION_LIMIT);

/// Current process-wide truncation limit
pub fn truncation_limit() -> usize {
    TRUNCATION_LIMIT.load(Ordering::Relaxed)
}

/// Change the process-wide truncation limit, returning the previous one
///
/// A limit of 0 would reduce every value to "..." and is ignored.
pub fn set_truncation_limit(limit: usize) -> usize {
    if limit == 0 {
        tracing::warn!("Ignoring truncation limit of 0, keeping {}", truncation_limit());
        return truncation_limit();
    }
    TRUNCATION_LIMIT.swap(limit, Ordering::Relaxed)
}

/// Errors that can occur while loading settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// An environment variable has a value that cannot be used
    InvalidValue {
        key: String,
        value: String,
        description: String,
    },
    /// A dotenv file could not be read
    EnvFile { path: String, reason: String },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::InvalidValue {
                key,
                value,
                description,
            } => {
                writeln!(
                    f,
                    "{}: Invalid value {}",
                    key.magenta().bold(),
                    format!("'{}'", value).red(),
                )?;
                write!(f, "\tDescription: {}", description)
            }
            SettingsError::EnvFile { path, reason } => {
                write!(f, "Could not load {}: {}", path.cyan(), reason)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

/// Tunables for message formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Settings {
    /// Maximum characters kept when stringifying a value
    pub truncation_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            truncation_limit: DEFAULT_TRUNCATION_LIMIT,
        }
    }
}

impl Settings {
    /// Read settings from the environment, falling back to defaults for unset variables
    ///
    /// A variable that is set but unparsable (or zero) is an error rather than silently
    /// replaced by the default.
    pub fn from_env() -> Result<Self, SettingsError> {
        let truncation_limit = limit_from_var(env::var(TRUNCATION_LIMIT_ENV))?;
        Ok(Self { truncation_limit })
    }

    /// Load `.env` from the working directory if there is one, then read the environment
    pub fn load() -> Result<Self, SettingsError> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("No .env loaded: {}", e);
        }
        Self::from_env()
    }

    /// Load a specific dotenv file, then read the environment
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        dotenvy::from_filename(path).map_err(|e| SettingsError::EnvFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_env()
    }

    /// Make these settings the process-wide ones
    pub fn install(&self) {
        set_truncation_limit(self.truncation_limit);
    }
}

// Only an unset variable falls back to the default; a non-UTF-8 value is invalid
fn limit_from_var(var: Result<String, env::VarError>) -> Result<usize, SettingsError> {
    match var {
        Ok(raw) => parse_limit(&raw),
        Err(env::VarError::NotPresent) => Ok(DEFAULT_TRUNCATION_LIMIT),
        Err(env::VarError::NotUnicode(raw)) => Err(invalid_limit(raw.to_string_lossy().into_owned())),
    }
}

fn invalid_limit(value: String) -> SettingsError {
    SettingsError::InvalidValue {
        key: TRUNCATION_LIMIT_ENV.to_string(),
        value,
        description: "Expected a positive number of characters".to_string(),
    }
}

fn parse_limit(raw: &str) -> Result<usize, SettingsError> {
    match raw.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(invalid_limit(raw.to_string())),
    }
}
