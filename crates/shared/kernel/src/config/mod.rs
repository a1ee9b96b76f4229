use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment variables overriding file settings.
pub const ENV_PREFIX: &str = "TSCHEMA";

const DEFAULT_CONFIG_FILE: &str = "taskschema";

/// Custom error type for config loading.
#[taskschema_derive::schema_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads configuration from a file layered with environment overrides.
///
/// 1. **Base File**: `path` (any format the `config` crate recognizes by extension);
///    defaults to `taskschema` in the working directory.
/// 2. **Environment Overrides**: variables prefixed with `TSCHEMA__`, nested keys
///    separated by double underscores (`TSCHEMA__SCHEMA__ID` maps to `schema.id`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is missing, cannot be parsed, or does
/// not match the structure of `T`.
///
/// # Example
/// ```rust,no_run
/// use taskschema_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct HostConfig {
///     name: String,
/// }
///
/// let cfg: HostConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!(path = %effective_path.display(), "Loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
