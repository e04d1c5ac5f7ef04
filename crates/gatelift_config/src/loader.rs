//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::Config;
use std::path::Path;

/// File name looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "gatelift.toml";

/// Loads and validates `gatelift.toml` from a project directory.
///
/// A missing file is not an error: the default configuration is returned.
pub fn load_config(project_dir: &Path) -> Result<Config, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `gatelift.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let elab = &config.elaborate;
    if elab.top.as_deref() == Some("") {
        return Err(ConfigError::ValidationError(
            "elaborate.top must not be empty".to_string(),
        ));
    }
    for (field, value) in [
        ("elaborate.gnd_gate_name", &elab.gnd_gate_name),
        ("elaborate.vcc_gate_name", &elab.vcc_gate_name),
        ("elaborate.top_instance_name", &elab.top_instance_name),
    ] {
        if value.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{field} must not be empty"
            )));
        }
    }
    if elab.gnd_gate_name == elab.vcc_gate_name {
        return Err(ConfigError::ValidationError(
            "GND and VCC driver gates need distinct names".to_string(),
        ));
    }
    Ok(())
}
