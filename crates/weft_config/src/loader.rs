//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::WeftConfig;
use std::path::Path;

/// Loads and validates a `weft.toml` configuration from a project directory.
///
/// Reads `<project_dir>/weft.toml`, parses it, and validates budget values.
/// A missing file is not an error; the defaults are returned instead.
pub fn load_config(project_dir: &Path) -> Result<WeftConfig, ConfigError> {
    let config_path = project_dir.join("weft.toml");
    if !config_path.exists() {
        return Ok(WeftConfig::default());
    }
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `weft.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<WeftConfig, ConfigError> {
    let config: WeftConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that budget and watchdog values are usable.
fn validate_config(config: &WeftConfig) -> Result<(), ConfigError> {
    if config.router.node_budget == 0 {
        return Err(ConfigError::ValidationError(
            "router.node_budget must be nonzero".to_string(),
        ));
    }
    if config.router.long_line_threshold <= 0 {
        return Err(ConfigError::ValidationError(
            "router.long_line_threshold must be positive".to_string(),
        ));
    }
    if config.router.enable_ripup && config.router.ripup_rounds == 0 {
        return Err(ConfigError::ValidationError(
            "router.ripup_rounds must be nonzero when rip-up is enabled".to_string(),
        ));
    }
    if config.router.lut_probe_depth == 0 {
        return Err(ConfigError::ValidationError(
            "router.lut_probe_depth must be nonzero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_node_budget_errors() {
        let toml = r#"
[router]
node_budget = 0
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn negative_long_line_threshold_errors() {
        let toml = r#"
[router]
long_line_threshold = -1
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn zero_ripup_rounds_with_ripup_disabled_ok() {
        let toml = r#"
[router]
enable_ripup = false
ripup_rounds = 0
"#;
        let config = load_config_from_str(toml).unwrap();
        assert!(!config.router.enable_ripup);
    }

    #[test]
    fn zero_ripup_rounds_with_ripup_enabled_errors() {
        let toml = r#"
[router]
enable_ripup = true
ripup_rounds = 0
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/dir")).unwrap();
        assert_eq!(config.router.node_budget, 100_000);
    }
}
