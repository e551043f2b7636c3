//! Application configuration structures.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Redis configuration.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Cache layer configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Returns true when running in production.
    ///
    /// Production hides diagnostic detail from error responses.
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.app.environment.eq_ignore_ascii_case("production")
    }
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "mercato".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Enable CORS.
    pub cors_enabled: bool,
    /// CORS allowed origins.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl ServerConfig {
    /// Returns the server address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the request timeout as a Duration.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Redis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Redis URL.
    pub url: String,
    /// Connection pool size.
    pub pool_size: usize,
    /// Enable Redis. When disabled the cache always misses.
    pub enabled: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            pool_size: 10,
            enabled: true,
        }
    }
}

/// Cache layer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// TTL used when a domain has no TTL of its own, in seconds.
    pub default_ttl_secs: u64,
    /// Per-domain TTL overrides in seconds, keyed by domain name
    /// (`user`, `username`, `profile`, `listing`, `listing_page`, ...).
    pub ttl_overrides: HashMap<String, u64>,
    /// Upper bound for a single store call, in milliseconds.
    pub operation_timeout_ms: u64,
    /// Request header that forces a cache bypass.
    pub bypass_header: String,
    /// How many leading pages a mutation invalidates per page size.
    pub invalidation_page_depth: u32,
    /// Page sizes the clients use; list invalidation enumerates these.
    pub page_sizes: Vec<u32>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: 3600,
            ttl_overrides: HashMap::new(),
            operation_timeout_ms: 500,
            bypass_header: "x-cache-bypass".to_string(),
            invalidation_page_depth: 5,
            page_sizes: vec![10, 20, 50],
        }
    }
}

impl CacheConfig {
    /// Returns the default TTL as a Duration.
    #[must_use]
    pub const fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Returns the configured TTL override for a domain.
    #[must_use]
    pub fn ttl_override(&self, domain: &str) -> Option<Duration> {
        self.ttl_overrides.get(domain).copied().map(Duration::from_secs)
    }

    /// Returns the store operation timeout as a Duration.
    #[must_use]
    pub const fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level directive used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Log format (`json` or `pretty`).
    pub log_format: String,
    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,
    /// Metrics endpoint path.
    pub metrics_path: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info,mercato=debug,tower_http=debug".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: true,
            metrics_path: "/metrics".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.default_ttl(), Duration::from_secs(3600));
        assert_eq!(config.operation_timeout(), Duration::from_millis(500));
        assert_eq!(config.bypass_header, "x-cache-bypass");
        assert!(config.ttl_override("listing_page").is_none());
    }

    #[test]
    fn test_ttl_override() {
        let mut config = CacheConfig::default();
        config.ttl_overrides.insert("geocode".to_string(), 60);
        assert_eq!(config.ttl_override("geocode"), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_is_production() {
        let mut config = AppConfig::default();
        assert!(!config.is_production());
        config.app.environment = "Production".to_string();
        assert!(config.is_production());
    }
}
