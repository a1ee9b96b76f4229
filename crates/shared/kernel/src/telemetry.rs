//! Logging bootstrap driven by [`LoggingConfig`].

use crate::domain::config::LoggingConfig;
use std::str::FromStr;
use taskschema_logger::{LevelFilter, Logger, LoggerError};

/// Installs the global tracing subscriber described by `config`.
///
/// # Errors
/// Returns [`LoggerError::InvalidConfiguration`] for an unknown level name, and any
/// error the logger builder's `init` reports.
pub fn init_logging(config: &LoggingConfig) -> Result<Logger, LoggerError> {
    let level = parse_level(&config.level)?;

    let builder = Logger::builder().name(config.name.clone()).level(level).console(config.console);
    let builder = match &config.env_filter {
        Some(filter) => builder.env_filter(filter.clone()),
        None => builder,
    };

    match &config.path {
        Some(path) => {
            let builder = builder.path(path.clone()).max_files(config.max_files);
            if config.json { builder.json().init() } else { builder.init() }
        },
        None => builder.init(),
    }
}

/// Parses a level name such as `info` or `DEBUG`.
///
/// # Errors
/// Returns [`LoggerError::InvalidConfiguration`] for unknown names.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    LevelFilter::from_str(level.trim()).map_err(|e| LoggerError::InvalidConfiguration {
        message: format!("Unknown log level '{level}': {e}").into(),
        context: Some("logging.level".into()),
    })
}
