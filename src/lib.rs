pub mod checks;
pub mod error;
pub mod format;
pub mod guards;
pub mod macros;
pub mod settings;
pub mod value;

// Re-export main types
pub use checks::{Checks, format_errors};
pub use error::{ErrorKind, InspectError, IntegrityError};
pub use settings::{Settings, SettingsError, set_truncation_limit, truncation_limit};
pub use value::{Callable, Displayed, Inspect, Json, Value};

// Re-export derive macro
pub use integrity_check_macros::Inspect;
