use crate::constants::{DEFAULT_FILE_MATCH, DEFAULT_SCHEMA_ID};
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration of a process hosting the schema service.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfigInner {
    pub schema: SchemaSettings,
    pub events: EventSettings,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(flatten, default)]
    inner: Arc<ServiceConfigInner>,
}

impl Deref for ServiceConfig {
    type Target = ServiceConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ServiceConfig {
    fn deref_mut(&mut self) -> &mut ServiceConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Where and for which files the schema is published.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchemaSettings {
    /// Resource identifier of the published document.
    pub id: String,
    /// File name patterns the schema is associated with on first publication.
    pub file_match: Vec<String>,
}

/// Registry notification buffering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EventSettings {
    pub capacity: usize,
}

/// Logging bootstrap settings, mapped onto the logger builder by the kernel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub name: String,
    pub level: String,
    pub console: bool,
    pub json: bool,
    pub path: Option<PathBuf>,
    pub env_filter: Option<String>,
    pub max_files: usize,
}

// --- Default ---

impl Default for SchemaSettings {
    fn default() -> Self {
        Self { id: DEFAULT_SCHEMA_ID.to_owned(), file_match: vec![DEFAULT_FILE_MATCH.to_owned()] }
    }
}

impl Default for EventSettings {
    fn default() -> Self {
        Self { capacity: 64 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            name: "taskschema".to_owned(),
            level: "info".to_owned(),
            console: true,
            json: false,
            path: None,
            env_filter: None,
            max_files: 10,
        }
    }
}
