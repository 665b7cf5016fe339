//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use crate::errors::{ElError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, Once};
use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Human-readable output for development
    #[default]
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

impl FromStr for Profile {
    type Err = ElError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            _ => Err(ElError::Config {
                reason: format!("unknown logging profile '{}'", s),
            }),
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// This function should be called once at application startup. It sets up
/// the tracing subscriber based on the selected profile; later calls without
/// a log file are no-ops.
///
/// # Profiles
///
/// - **Development**: Human-readable logs with debug level
/// - **Production**: JSON structured logs with info level
/// - **Test**: Capture mode for test assertions
///
/// When `log_file` is given, every event is also appended to that file as
/// plain text. `RUST_LOG` overrides the default filter of the profile.
///
/// # Errors
///
/// Returns [`ElError::Io`] if the log file cannot be opened, and
/// [`ElError::Config`] if a log file is passed with the `Test` profile or
/// after logging was already initialized (the file could not be attached).
///
/// # Example
///
/// ```
/// use dailyelt_core::logging_facility::{init, Profile};
///
/// init(Profile::Development, None).unwrap();
/// ```
pub fn init(profile: Profile, log_file: Option<&Path>) -> Result<()> {
    if profile == Profile::Test && log_file.is_some() {
        return Err(ElError::Config {
            reason: "the test logging profile does not write a log file".to_string(),
        });
    }
    if INIT_ONCE.is_completed() {
        return match log_file {
            Some(path) => Err(already_initialized(path)),
            None => Ok(()),
        };
    }

    let mut file = match log_file {
        Some(path) => Some(open_log_file(path)?),
        None => None,
    };

    INIT_ONCE.call_once(|| {
        let file = file.take();
        // A subscriber installed elsewhere (e.g. test capture) wins.
        let _ = match profile {
            Profile::Development => tracing_subscriber::registry()
                .with(env_filter("dailyelt=debug"))
                .with(fmt::layer())
                .with(file_layer(file))
                .try_init(),
            Profile::Production => tracing_subscriber::registry()
                .with(env_filter("dailyelt=info"))
                .with(fmt::layer().json())
                .with(file_layer(file))
                .try_init(),
            Profile::Test => {
                super::test_capture::init_test_capture();
                Ok(())
            }
        };
    });

    // Still holding the file means a concurrent caller won the race.
    match (log_file, file) {
        (Some(path), Some(_)) => Err(already_initialized(path)),
        _ => Ok(()),
    }
}

fn already_initialized(path: &Path) -> ElError {
    ElError::Config {
        reason: format!(
            "logging already initialized; log file {} was not attached",
            path.display()
        ),
    }
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ElError::io(path, e))
}

fn file_layer<S>(file: Option<File>) -> Option<impl Layer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    file.map(|f| fmt::layer().with_ansi(false).with_writer(Mutex::new(f)))
}
