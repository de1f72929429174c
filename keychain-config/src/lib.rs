//! Configuration management for the keychain tools

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Console,
    Json,
}

/// External programs the tools shell out to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub security_bin: String,
    pub openssl_bin: String,
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub security_bin: String,
    pub openssl_bin: String,
    /// RSA key size for `genrsa`; the manager's default when unset
    pub key_size: Option<u32>,
    /// Keychain used when none is named on the command line. An empty
    /// value is treated as unset.
    pub name: Option<String>,
    pub log_level: Option<String>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from `KEYCHAIN_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        Self::from_source(Environment::with_prefix("KEYCHAIN").try_parsing(true))
    }

    /// Load configuration from an arbitrary source layered over the defaults
    pub fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let mut config: Self = Config::builder()
            .set_default("security_bin", "security")?
            .set_default("openssl_bin", "openssl")?
            .set_default("log_level", "info")?
            .set_default("log_format", "console")?
            .add_source(source)
            .build()?
            .try_deserialize()?;

        config.name = config.name.filter(|name| !name.is_empty());
        Ok(config)
    }

    pub fn tools(&self) -> ToolConfig {
        ToolConfig {
            security_bin: self.security_bin.clone(),
            openssl_bin: self.openssl_bin.clone(),
        }
    }

    /// Get log level, defaulting to "info"
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}
