use std::fmt;

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub store: StoreConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub clients: ClientsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u8,
    pub run_migrations: bool,
}

/// The URL may carry credentials, so only its presence is shown.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("max_connections", &self.max_connections)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

impl DatabaseConfig {
    /// ## Summary
    /// Returns the configured database URL.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` if no URL is configured.
    pub fn require_url(&self) -> CoreResult<&str> {
        self.url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                CoreError::InvalidConfiguration(
                    "database.url is required for the postgres store backend".to_string(),
                )
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub serve_origin: Option<String>,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the server address as a string in the format "host:port".
    #[must_use]
    pub fn serve_origin(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// ## Summary
    /// Returns the server origin URL.
    #[must_use]
    pub fn origin(&self) -> String {
        if let Some(origin) = &self.serve_origin {
            origin.clone()
        } else {
            self.serve_origin()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Client defaults applied at creation time.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientsConfig {
    /// Domain of the email generated for clients created without one.
    pub placeholder_email_domain: String,
}

impl Default for ClientsConfig {
    fn default() -> Self {
        Self {
            placeholder_email_domain: "example.com".to_string(),
        }
    }
}

/// Environment source. Nested keys use a double underscore, so
/// `CLIENTS__PLACEHOLDER_EMAIL_DOMAIN` sets `clients.placeholder_email_domain`.
fn environment() -> Environment {
    Environment::default()
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}

impl Settings {
    /// ## Summary
    /// Loads configuration from an optional `config.toml` and environment variables
    /// into a `Settings`. Environment variables take precedence over the file.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Self::load_from(environment())
    }

    fn load_from(env: Environment) -> Result<Self> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8698)?
            .set_default("database.max_connections", 4)?
            .set_default("database.run_migrations", true)?
            .set_default("store.backend", "postgres")?
            .set_default("logging.level", "debug")?
            .set_default("clients.placeholder_email_domain", "example.com")?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env
            .add_source(env)
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
