//! Server configuration
//!
//! Configuration is loaded from environment variables. A `.env` file in the
//! working directory is read first when present.

use std::env;
use thiserror::Error;

/// Origins allowed to call the API when `CORS_ALLOWED_ORIGINS` is unset
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:5175",
];

/// Errors raised while resolving configuration at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MONGO_URI not found in environment variables")]
    MissingMongoUri,
}

/// Main server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// MongoDB connection string
    pub mongo_uri: Option<String>,
    /// Cross-origin configuration
    pub cors: CorsConfig,
}

/// Cross-origin policy configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Origins permitted to call `/api`
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            mongo_uri: None,
            cors: CorsConfig::default(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("PORT")
            && let Ok(p) = port.parse()
        {
            config.port = p;
        }
        if let Ok(uri) = env::var("MONGO_URI")
            && !uri.is_empty()
        {
            config.mongo_uri = Some(uri);
        }
        if let Ok(val) = env::var("CORS_ALLOWED_ORIGINS") {
            let origins = parse_origin_list(&val);
            if !origins.is_empty() {
                config.cors.allowed_origins = origins;
            }
        }

        config
    }

    /// The MongoDB connection string, which must be configured
    pub fn mongo_uri(&self) -> Result<&str, ConfigError> {
        self.mongo_uri.as_deref().ok_or(ConfigError::MissingMongoUri)
    }
}

/// Split a comma-separated origin list, dropping blanks
fn parse_origin_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
