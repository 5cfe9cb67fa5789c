use std::env;

/// Application-level configuration: bind address, environment name and the
/// frontend origin allowed by CORS.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub frontend_origin: String,
}

impl AppConfig {
    /// Load application configuration from environment variables
    ///
    /// Expected environment variables:
    /// - APP_HOST: bind address (defaults to 127.0.0.1)
    /// - APP_PORT: listening port (defaults to 5000)
    /// - APP_ENV: environment name (defaults to "development")
    /// - FRONTEND_ORIGIN: allowed CORS origin (defaults to "*")
    pub fn from_env() -> Self {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5000);
        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let frontend_origin = env::var("FRONTEND_ORIGIN").unwrap_or_else(|_| "*".to_string());
        AppConfig {
            host,
            port,
            environment,
            frontend_origin,
        }
    }

    /// Internal error details are suppressed from responses in production.
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            environment: "development".to_string(),
            frontend_origin: "*".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert_eq!(config.environment, "development");
        assert_eq!(config.frontend_origin, "*");
        assert!(!config.is_production());
    }

    #[test]
    fn test_is_production() {
        let mut config = AppConfig::default();
        config.environment = "production".to_string();
        assert!(config.is_production());
    }
}
