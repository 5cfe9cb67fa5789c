use std::env;
use tracing::error;

use crate::config::ConfigError;

/// Bootstrap admin account, created at startup when configured.
#[derive(Debug, Clone)]
pub struct AdminUserConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl AdminUserConfig {
    /// Load the bootstrap admin account from environment variables
    ///
    /// Expected environment variables:
    /// - ADMIN_USERNAME, ADMIN_EMAIL, ADMIN_PASSWORD (all required together)
    pub fn from_env() -> Result<Self, ConfigError> {
        let username = env::var("ADMIN_USERNAME")
            .map_err(|_| ConfigError::EnvVarNotFound("ADMIN_USERNAME".to_string()))?;
        let email = env::var("ADMIN_EMAIL")
            .map_err(|_| ConfigError::EnvVarNotFound("ADMIN_EMAIL".to_string()))?;
        let password = env::var("ADMIN_PASSWORD")
            .map_err(|_| ConfigError::EnvVarNotFound("ADMIN_PASSWORD".to_string()))?;

        if password.len() < 8 {
            error!("ADMIN_PASSWORD is too short (minimum 8 characters)");
            return Err(ConfigError::InvalidValue(
                "ADMIN_PASSWORD must be at least 8 characters long".to_string(),
            ));
        }

        Ok(AdminUserConfig {
            username,
            email,
            password,
        })
    }
}
