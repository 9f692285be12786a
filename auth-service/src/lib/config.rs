use std::env;

use auth::SettingsError;
use auth::TokenSettings;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_ttl_hours: i64,
    pub refresh_token_ttl_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    /// Fixed salt mixed into every password hash; changing it invalidates stored hashes
    pub salt: String,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (AUTH_JWT__SECRET, AUTH_SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH_JWT__SECRET=... overrides jwt.secret
            .add_source(
                Environment::with_prefix("AUTH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }

    /// Token lifetimes from the `jwt` section.
    ///
    /// # Errors
    /// * `SettingsError` - Lifetimes are non-positive or access outlives refresh
    pub fn token_settings(&self) -> Result<TokenSettings, SettingsError> {
        TokenSettings::new(
            Duration::hours(self.jwt.access_token_ttl_hours),
            Duration::hours(self.jwt.refresh_token_ttl_hours),
        )
    }
}
