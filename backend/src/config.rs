//! Configuration management for the Inventory Indent System
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with INDENT_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Indent numbering configuration
    pub indent: IndentConfig,

    /// Indent letter output configuration
    pub documents: DocumentsConfig,

    /// Outgoing mail configuration
    pub mail: MailConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IndentConfig {
    /// Prefix for generated indent numbers
    pub prefix: String,

    /// Institution name printed on indent letters
    pub institution: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DocumentsConfig {
    /// Directory where indent letters are written
    pub output_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    /// Mail relay endpoint; when empty, notifications are logged only
    pub endpoint: String,

    /// API token for the mail relay
    pub token: String,

    /// Sender address
    pub from_address: String,

    /// Department address copied on every indent notification; falls back
    /// to the sender address when unset
    pub copy_address: String,
}

impl MailConfig {
    /// Mail delivery is optional; an unset endpoint disables it
    pub fn is_configured(&self) -> bool {
        !self.endpoint.is_empty()
    }

    /// Address copied on indent notifications
    pub fn department_copy(&self) -> &str {
        if self.copy_address.is_empty() {
            &self.from_address
        } else {
            &self.copy_address
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("INDENT_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.access_token_expiry", 3600)?
            .set_default("indent.prefix", "KIET")?
            .set_default("indent.institution", "KIET GROUP OF INSTITUTIONS")?
            .set_default("documents.output_dir", "indents")?
            .set_default("mail.endpoint", "")?
            .set_default("mail.token", "")?
            .set_default("mail.from_address", "")?
            .set_default("mail.copy_address", "")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (INDENT_ prefix)
            .add_source(
                Environment::with_prefix("INDENT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
