use std::env;

use crate::config::ConfigError;

/// Upload storage configuration: where originals land on disk and the URL
/// prefix they are served back under.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory uploaded originals are written to
    pub upload_dir: String,
    /// Public URL prefix the directory is served under
    pub public_path: String,
}

impl UploadConfig {
    /// Load upload configuration from environment variables
    ///
    /// Expected environment variables:
    /// - UPLOAD_DIR: storage directory (defaults to "uploads")
    /// - UPLOAD_PUBLIC_PATH: URL prefix (defaults to "/uploads")
    pub fn from_env() -> Result<Self, ConfigError> {
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());
        let public_path = env::var("UPLOAD_PUBLIC_PATH").unwrap_or_else(|_| "/uploads".to_string());

        let config = UploadConfig {
            upload_dir,
            public_path,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upload_dir.is_empty() {
            return Err(ConfigError::ValidationError(
                "Upload directory cannot be empty".to_string(),
            ));
        }
        if !self.public_path.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "Upload public path must start with '/'".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        UploadConfig {
            upload_dir: "uploads".to_string(),
            public_path: "/uploads".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UploadConfig::default();
        assert_eq!(config.upload_dir, "uploads");
        assert_eq!(config.public_path, "/uploads");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_dir() {
        let mut config = UploadConfig::default();
        config.upload_dir = "".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_public_path_must_be_absolute() {
        let mut config = UploadConfig::default();
        config.public_path = "uploads".to_string();
        assert!(config.validate().is_err());
    }
}
