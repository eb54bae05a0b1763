use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Storage path is not empty
/// - Server port is not 0
/// - Request timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.storage.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.path cannot be empty".to_string(),
        ));
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.server.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "server.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
