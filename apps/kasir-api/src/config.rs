//! Kasir API configuration module.
//!
//! Sources, later ones winning:
//! 1. Built-in defaults
//! 2. `kasir.toml` in the working directory (optional)
//! 3. Environment variables prefixed `KASIR_` (e.g. `KASIR_PORT=9090`)

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use kasir_core::StockPolicy;
use kasir_db::DbConfig;
use serde::{Deserialize, Serialize};

/// Base name of the optional configuration file.
pub const CONFIG_FILE: &str = "kasir";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "KASIR";

/// Kasir API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite file (or `:memory:`)
    pub database_path: String,

    /// Pool size
    pub max_connections: u32,

    /// Deadline for one checkout, in seconds
    pub checkout_timeout_secs: u64,

    /// `allow_negative` or `require_available`
    pub stock_policy: String,

    /// Default tracing filter; `RUST_LOG` takes precedence
    pub log_level: String,
}

impl ApiConfig {
    /// Load configuration from defaults, `kasir.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Some(CONFIG_FILE), Environment::with_prefix(ENV_PREFIX))
    }

    /// Load from an explicit file name (without extension) and environment source.
    pub fn load_from(file: Option<&str>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("database_path", "kasir.db")?
            .set_default("max_connections", 5)?
            .set_default("checkout_timeout_secs", 10)?
            .set_default("stock_policy", StockPolicy::default().as_str())?
            .set_default("log_level", "info")?;

        if let Some(name) = file {
            builder = builder.add_source(File::with_name(name).required(false));
        }

        let config: ApiConfig = builder.add_source(env).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "port".to_string(),
                reason: "must not be 0".to_string(),
            });
        }

        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_connections".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.checkout_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "checkout_timeout_secs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        self.policy()?;
        Ok(())
    }

    /// Parsed stock policy.
    pub fn policy(&self) -> Result<StockPolicy, ConfigError> {
        self.stock_policy
            .parse()
            .map_err(|reason| ConfigError::InvalidValue {
                key: "stock_policy".to_string(),
                reason,
            })
    }

    /// `host:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> Result<DbConfig, ConfigError> {
        let base = if self.database_path == ":memory:" {
            DbConfig::in_memory()
        } else {
            DbConfig::new(PathBuf::from(&self.database_path)).max_connections(self.max_connections)
        };

        Ok(base
            .checkout_timeout(Duration::from_secs(self.checkout_timeout_secs))
            .stock_policy(self.policy()?))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Environment {
        let map: config::Map<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::load_from(None, env(&[])).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.database_path, "kasir.db");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.checkout_timeout_secs, 10);
        assert_eq!(config.policy().unwrap(), StockPolicy::AllowNegative);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_env_overrides() {
        let config = ApiConfig::load_from(
            None,
            env(&[
                ("KASIR_PORT", "9090"),
                ("KASIR_STOCK_POLICY", "require_available"),
                ("KASIR_DATABASE_PATH", ":memory:"),
            ]),
        )
        .unwrap();

        assert_eq!(config.port, 9090);
        let db = config.db_config().unwrap();
        assert_eq!(db.stock_policy, StockPolicy::RequireAvailable);
        assert_eq!(db.max_connections, 1);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ApiConfig::load_from(None, env(&[("KASIR_PORT", "0")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            ApiConfig::load_from(None, env(&[("KASIR_STOCK_POLICY", "strict")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(ApiConfig::load_from(None, env(&[("KASIR_PORT", "eighty")])).is_err());
    }
}
