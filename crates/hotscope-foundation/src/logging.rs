//! Tracing subscriber setup

use hotscope_kernel::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Logging initialization errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Install a global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `config.filter`. Returns an error
/// instead of panicking when a global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| LoggingError::Init(e.to_string()))
}
