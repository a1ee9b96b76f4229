use std::fs;
use taskschema_kernel::config::{ConfigError, load_config};
use taskschema_kernel::domain::config::ServiceConfig;
use tempfile::tempdir;

#[test]
fn loads_toml_file_over_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("taskschema.toml");
    fs::write(
        &path,
        r#"
[schema]
id = "memory://schemas/tasks"
file_match = ["tasks.json", "*.tasks.json"]

[events]
capacity = 16
"#,
    )?;

    let cfg: ServiceConfig = load_config(Some(&path))?;
    assert_eq!(cfg.schema.id, "memory://schemas/tasks");
    assert_eq!(cfg.schema.file_match, vec!["tasks.json".to_owned(), "*.tasks.json".to_owned()]);
    assert_eq!(cfg.events.capacity, 16);
    assert_eq!(cfg.logging.level, "info");
    Ok(())
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempdir().expect("temp dir");
    let result = load_config::<ServiceConfig>(Some(dir.path().join("absent.toml")));
    assert!(matches!(result, Err(ConfigError::Config { .. })));
}
