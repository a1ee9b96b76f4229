//! # Logger
//!
//! Installs the process-wide `tracing` subscriber for hosts of the task schema
//! service. Console output comes in a compact, pretty or JSON style. Rolling log
//! files are optional and written from a background worker.
//!
//! Library crates in the workspace only emit `tracing` events; which subscriber
//! receives them is up to the host.
//!
//! ## Example
//!
//! ```rust
//! use taskschema_logger::{ConsoleFormat, LevelFilter, Logger};
//!
//! let logger = Logger::builder()
//!     .name("schema-host")
//!     .console_format(ConsoleFormat::Pretty)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .expect("first subscriber in this process");
//! assert!(logger.guard().is_none());
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const DEFAULT_KEPT_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

type Filtered = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Filtered> + Send + Sync>;

/// Console rendering style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Settings shared by console-only and file-backed builders.
#[derive(Debug)]
struct Settings {
    console: Option<ConsoleFormat>,
    level: LevelFilter,
    directives: Option<String>,
}

/// Where and how rolling log files are written.
#[derive(Debug)]
struct FileOutput {
    dir: PathBuf,
    rotation: Rotation,
    keep: usize,
    json: bool,
}

/// Builder state before [`LoggerBuilder::name`] is called.
#[derive(Debug)]
pub struct Unnamed;
/// Builder state carrying the log file prefix.
#[derive(Debug)]
pub struct Named(String);
/// Builder state without file output.
#[derive(Debug)]
pub struct ConsoleOnly;
/// Builder state with a log directory; unlocks the file options.
#[derive(Debug)]
pub struct WithFiles(FileOutput);

mod private {
    pub trait Sealed {}
}
impl Sealed for Unnamed {}
impl Sealed for Named {}
impl Sealed for ConsoleOnly {}
impl Sealed for WithFiles {}

/// Typestate builder for the global subscriber.
///
/// `init` only exists once a name is set, and rotation, retention and JSON file
/// output only exist once [`LoggerBuilder::path`] chose a directory.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = Unnamed, F: Sealed = ConsoleOnly> {
    settings: Settings,
    name: N,
    files: F,
}

impl LoggerBuilder<Unnamed, ConsoleOnly> {
    /// Names the logger; the name doubles as the log file prefix.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<Named, ConsoleOnly> {
        LoggerBuilder { settings: self.settings, name: Named(name.into()), files: ConsoleOnly }
    }
}

impl<F: Sealed> LoggerBuilder<Named, F> {
    /// Default level for targets no directive mentions.
    #[must_use = "builder settings only take effect through `init`"]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.settings.level = level;
        self
    }

    /// Uses `directives` (e.g. `taskschema_core=debug`) instead of reading `RUST_LOG`.
    ///
    /// Unparseable directives make `init` fail.
    #[must_use = "builder settings only take effect through `init`"]
    pub fn env_filter(mut self, directives: impl Into<String>) -> Self {
        self.settings.directives = Some(directives.into());
        self
    }

    /// Turns compact console output on or off.
    #[must_use = "builder settings only take effect through `init`"]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.settings.console = if enabled { Some(ConsoleFormat::Compact) } else { None };
        self
    }

    #[must_use = "builder settings only take effect through `init`"]
    pub const fn console_format(mut self, format: ConsoleFormat) -> Self {
        self.settings.console = Some(format);
        self
    }
}

impl LoggerBuilder<Named, ConsoleOnly> {
    /// Also writes rolling log files into `dir`, created on `init` if missing.
    pub fn path(self, dir: impl Into<PathBuf>) -> LoggerBuilder<Named, WithFiles> {
        let files = FileOutput { dir: dir.into(), rotation: Rotation::DAILY, keep: DEFAULT_KEPT_FILES, json: false };
        LoggerBuilder { settings: self.settings, name: self.name, files: WithFiles(files) }
    }

    /// Installs a console-only subscriber.
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] for a blank name, bad
    /// directives or disabled console output, and [`LoggerError::Subscriber`]
    /// when a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        install(&self.name.0, &self.settings, None)
    }
}

impl LoggerBuilder<Named, WithFiles> {
    /// How many rotated files to keep.
    #[must_use = "builder settings only take effect through `init`"]
    pub const fn max_files(mut self, keep: usize) -> Self {
        self.files.0.keep = keep;
        self
    }

    #[must_use = "builder settings only take effect through `init`"]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.files.0.rotation = rotation;
        self
    }

    /// Writes log files as JSON lines.
    #[must_use = "builder settings only take effect through `init`"]
    pub const fn json(mut self) -> Self {
        self.files.0.json = true;
        self
    }

    /// Installs the subscriber with file output.
    ///
    /// The returned [`Logger`] owns the background writer; logs are flushed when
    /// it is dropped.
    ///
    /// # Errors
    /// As the console-only `init`, plus [`LoggerError::InvalidConfiguration`] for
    /// `max_files(0)`, [`LoggerError::Io`] when the directory cannot be created
    /// and [`LoggerError::Appender`] when the file appender cannot start.
    pub fn init(self) -> Result<Logger, LoggerError> {
        install(&self.name.0, &self.settings, Some(self.files.0))
    }
}

/// Keeps the file writer alive; dropping it flushes pending lines.
#[must_use = "dropping the logger stops the background file writer"]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    #[must_use = "builder settings only take effect through `init`"]
    pub fn builder() -> LoggerBuilder {
        let settings = Settings { console: Some(ConsoleFormat::Compact), level: LevelFilter::INFO, directives: None };
        LoggerBuilder { settings, name: Unnamed, files: ConsoleOnly }
    }

    /// The background writer guard; `None` for console-only loggers.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Flushing log files before shutdown");
        }
    }
}

fn install(name: &str, settings: &Settings, files: Option<FileOutput>) -> Result<Logger, LoggerError> {
    if name.trim().is_empty() {
        return Err(invalid("Logger name cannot be empty"));
    }
    if files.as_ref().is_some_and(|files| files.keep == 0) {
        return Err(invalid("max_files must be greater than zero"));
    }
    if settings.console.is_none() && files.is_none() {
        return Err(invalid("Nothing to log to: console output is off and no log directory is set"));
    }

    let filter = settings.env_filter()?;
    let mut layers: Vec<BoxedLayer> = settings.console.map(console_layer).into_iter().collect();
    let guard = match files {
        Some(files) => {
            let (file_layer, guard) = file_layer(name, files)?;
            layers.push(file_layer);
            Some(guard)
        },
        None => None,
    };

    tracing_subscriber::registry().with(filter).with(layers).try_init()?;
    Ok(Logger { guard })
}

impl Settings {
    fn env_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        match &self.directives {
            None => Ok(builder.from_env_lossy()),
            Some(directives) => builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Cannot parse log directives '{directives}': {e}").into(),
                context: None,
            }),
        }
    }
}

fn console_layer(format: ConsoleFormat) -> BoxedLayer {
    match format {
        ConsoleFormat::Compact => layer().compact().with_ansi(true).boxed(),
        ConsoleFormat::Pretty => layer().pretty().with_ansi(true).boxed(),
        ConsoleFormat::Json => layer().json().boxed(),
    }
}

fn file_layer(name: &str, files: FileOutput) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    fs::create_dir_all(&files.dir).context(format!("Cannot create log directory {}", files.dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(files.rotation)
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(files.keep)
        .build(&files.dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let plain = layer().with_writer(writer).with_ansi(false);
    let boxed = if files.json { plain.json().boxed() } else { plain.boxed() };
    Ok((boxed, guard))
}

fn invalid(message: &'static str) -> LoggerError {
    LoggerError::InvalidConfiguration { message: message.into(), context: None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = Logger::builder().name("schema-host").env_filter("taskschema_core=debug");
        assert_eq!(builder.settings.console, Some(ConsoleFormat::Compact));
        assert_eq!(builder.settings.level, LevelFilter::INFO);
        assert_eq!(builder.settings.directives.as_deref(), Some("taskschema_core=debug"));
    }

    #[test]
    fn test_file_settings_follow_path() {
        let builder = Logger::builder()
            .name("schema-host")
            .console_format(ConsoleFormat::Pretty)
            .path("/tmp/schema-logs")
            .max_files(3)
            .json()
            .level(LevelFilter::DEBUG);

        assert_eq!(builder.settings.console, Some(ConsoleFormat::Pretty));
        assert_eq!(builder.settings.level, LevelFilter::DEBUG);
        assert_eq!(builder.files.0.dir, PathBuf::from("/tmp/schema-logs"));
        assert_eq!(builder.files.0.keep, 3);
        assert_eq!(builder.files.0.rotation, Rotation::DAILY);
        assert!(builder.files.0.json);
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let err = Logger::builder().name("  ").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_no_outputs_is_rejected() {
        let err = Logger::builder().name("silent").console(false).init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_zero_retention_is_rejected_before_touching_disk() {
        let dir = std::env::temp_dir().join("taskschema-logger-never-created");
        let err = Logger::builder().name("files").path(&dir).max_files(0).init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert!(!dir.exists());
    }

    #[test]
    fn test_invalid_env_filter_is_rejected() {
        let err = Logger::builder().name("filtered").env_filter("taskschema_core=loud").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }
}
