//! Fixed values of the published tasks schema.

/// Identifier under which the schema document is published.
pub const DEFAULT_SCHEMA_ID: &str = "tasks://schemas/tasks";

/// File name the schema is associated with by default.
pub const DEFAULT_FILE_MATCH: &str = "tasks.json";

/// Task types that are always valid, whatever the registries contain.
pub const DEFAULT_TASK_TYPES: [&str; 2] = ["shell", "process"];

/// Leading character of a problem matcher reference.
pub const PROBLEM_MATCHER_SIGIL: char = '$';

/// The configuration file format version the template describes.
pub const TASKS_VERSION: &str = "2.0.0";
