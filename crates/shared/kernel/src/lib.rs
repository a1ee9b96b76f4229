//! Kernel utilities for processes hosting the schema service.
//! Keep this crate lightweight: config loading and logging bootstrap only.
//!
//! ## Config loading
//! ```rust,no_run
//! use taskschema_kernel::config::load_config;
//! use taskschema_kernel::domain::config::ServiceConfig;
//!
//! let cfg: ServiceConfig = load_config(Some("taskschema")).unwrap_or_default();
//! let _logger = taskschema_kernel::telemetry::init_logging(&cfg.logging);
//! ```
pub mod config;
pub mod telemetry;

pub use taskschema_domain as domain;
