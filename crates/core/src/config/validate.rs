use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - File path template is not empty and names the video
/// - Requested quality is not empty
/// - Download concurrency is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let template = config.file_path_formatting.trim();
    if template.is_empty() {
        return Err(ConfigError::ValidationError(
            "file_path_formatting cannot be empty".to_string(),
        ));
    }
    if template.ends_with('/') {
        return Err(ConfigError::ValidationError(
            "file_path_formatting must end with a file name, not a folder".to_string(),
        ));
    }

    if config.floatplane.quality.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "floatplane.quality cannot be empty".to_string(),
        ));
    }

    if config.downloads.max_concurrent == 0 {
        return Err(ConfigError::ValidationError(
            "downloads.max_concurrent cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_empty_template_fails() {
        let config = Config {
            file_path_formatting: "  ".to_string(),
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_folder_only_template_fails() {
        let config = Config {
            file_path_formatting: "%channelTitle%/".to_string(),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_concurrency_fails() {
        let mut config = Config::default();
        config.downloads.max_concurrent = 0;
        assert!(validate_config(&config).is_err());
    }
}
