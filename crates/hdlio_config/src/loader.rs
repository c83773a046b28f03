//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// File name looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "hdlio.toml";

/// Loads and validates `<project_dir>/hdlio.toml`.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    let content = std::fs::read_to_string(&config_path)?;
    let config = load_config_from_str(&content)?;
    tracing::debug!(
        path = %config_path.display(),
        libraries = config.libraries.len(),
        "loaded project configuration"
    );
    Ok(config)
}

/// Parses and validates a configuration held in a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if let Some(project) = &config.project {
        if project.name.trim().is_empty() {
            return Err(ConfigError::MissingField("project.name".to_string()));
        }
    }
    for (name, library) in &config.libraries {
        if name.trim().is_empty() || name.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "invalid library name '{name}'"
            )));
        }
        if library.files.is_empty() {
            return Err(ConfigError::MissingField(format!("libraries.{name}.files")));
        }
        if library.files.iter().any(|f| f.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "library '{name}' lists an empty file path"
            )));
        }
    }
    Ok(())
}
