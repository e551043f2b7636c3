//! Configuration loader with layered sources.

use crate::AppConfig;
use config::{Config, ConfigError, Environment, File};
use mercato_core::MercatoError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides, not committed
    /// 4. Environment variables with `MERCATO__` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, MercatoError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, MercatoError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    pub async fn reload(&self) -> Result<(), MercatoError> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> Result<AppConfig, MercatoError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("MERCATO_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder
            .set_override("app.environment", environment.clone())
            .map_err(config_error_to_mercato_error)?
            .add_source(
                Environment::with_prefix("MERCATO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error_to_mercato_error)?;

        Self::validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Validates the configuration.
    fn validate_config(config: &AppConfig) -> Result<(), MercatoError> {
        if config.redis.enabled && config.redis.url.is_empty() {
            return Err(MercatoError::Configuration(
                "Redis URL is required when Redis is enabled".to_string(),
            ));
        }

        if config.cache.bypass_header.trim().is_empty() {
            return Err(MercatoError::Configuration(
                "Cache bypass header name cannot be empty".to_string(),
            ));
        }

        if config.cache.page_sizes.iter().any(|size| *size == 0) {
            return Err(MercatoError::Configuration(
                "Cache page sizes must be positive".to_string(),
            ));
        }

        if config.cache.operation_timeout_ms == 0 {
            warn!("Cache operation timeout is 0ms; every cache call will time out");
        }

        Ok(())
    }
}

fn config_error_to_mercato_error(err: ConfigError) -> MercatoError {
    MercatoError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_loads_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("default.toml")).unwrap();
        writeln!(
            file,
            "[cache]\ndefault_ttl_secs = 120\nbypass_header = \"x-no-cache\"\n\n[server]\nport = 9000"
        )
        .unwrap();

        let loader = ConfigLoader::new(dir.path().to_string_lossy().to_string()).unwrap();
        let config = loader.get().await;

        assert_eq!(config.cache.default_ttl_secs, 120);
        assert_eq!(config.cache.bypass_header, "x-no-cache");
        assert_eq!(config.server.port, 9000);
        // Untouched fields keep their defaults.
        assert_eq!(config.cache.invalidation_page_depth, 5);
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let mut config = AppConfig::default();
        config.cache.page_sizes = vec![10, 0];
        assert!(matches!(
            ConfigLoader::validate_config(&config),
            Err(MercatoError::Configuration(_))
        ));
    }

    #[test]
    fn test_server_address() {
        let config = AppConfig::default();
        assert_eq!(config.server.addr(), "0.0.0.0:8080");
    }
}
