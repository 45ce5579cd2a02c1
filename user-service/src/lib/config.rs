use std::env;
use std::path::PathBuf;

use config::builder::ConfigBuilder;
use config::builder::DefaultState;
use config::Config as ConfigSource;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub uploads: UploadsConfig,
}

/// Without a URL the service keeps users in process memory.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadsConfig {
    pub directory: PathBuf,
}

impl JwtConfig {
    /// HS256 keys shorter than the digest size are rejected.
    pub const MIN_SECRET_LENGTH: usize = 32;
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults for port, token lifetime and upload directory
    ///
    /// `jwt.secret` has no default and must come from one of the above.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = Self::with_defaults()?
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::with_prefix("").separator("__"));

        Self::from_builder(builder)
    }

    fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        ConfigSource::builder()
            .set_default("server.http_port", 3000)?
            .set_default("jwt.expiration_hours", 24)?
            .set_default("uploads.directory", "uploads/avatars")
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < JwtConfig::MIN_SECRET_LENGTH {
            return Err(ConfigError::Message(format!(
                "jwt.secret must be at least {} bytes",
                JwtConfig::MIN_SECRET_LENGTH
            )));
        }
        if self.jwt.expiration_hours <= 0 {
            return Err(ConfigError::Message(
                "jwt.expiration_hours must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
