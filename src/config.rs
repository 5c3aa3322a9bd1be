//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

/// Cache layer configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Hard cap on the number of entries in the memory tier
    pub max_memory_entries: usize,
    /// Default TTL in milliseconds for entries set without an explicit TTL
    pub default_ttl_ms: u64,
    /// Background sweep interval in seconds
    pub sweep_interval_secs: u64,
    /// HTTP server port for the administrative surface
    pub server_port: u16,
    /// SQLite connection URL for the durable tier
    pub database_url: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_MEMORY_ENTRIES` - Memory tier capacity (default: 1000)
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000, i.e. 5 minutes)
    /// - `SWEEP_INTERVAL_SECS` - Sweep cadence in seconds (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_DB_URL` - Durable tier URL (default: sqlite://tandem_cache.db?mode=rwc)
    pub fn from_env() -> Self {
        Self {
            max_memory_entries: env::var("MAX_MEMORY_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            default_ttl_ms: env::var("DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300_000),
            sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("CACHE_DB_URL")
                .unwrap_or_else(|_| "sqlite://tandem_cache.db?mode=rwc".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_memory_entries: 1000,
            default_ttl_ms: 300_000,
            sweep_interval_secs: 60,
            server_port: 3000,
            database_url: "sqlite://tandem_cache.db?mode=rwc".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_memory_entries, 1000);
        assert_eq!(config.default_ttl_ms, 300_000);
        assert_eq!(config.sweep_interval_secs, 60);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("MAX_MEMORY_ENTRIES");
        env::remove_var("DEFAULT_TTL_MS");
        env::remove_var("SWEEP_INTERVAL_SECS");
        env::remove_var("SERVER_PORT");
        env::remove_var("CACHE_DB_URL");

        let config = Config::from_env();
        assert_eq!(config.max_memory_entries, 1000);
        assert_eq!(config.default_ttl_ms, 300_000);
        assert_eq!(config.sweep_interval_secs, 60);
        assert_eq!(config.server_port, 3000);
        assert!(config.database_url.starts_with("sqlite://"));
    }
}
