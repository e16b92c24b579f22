use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Failed to parse {var} as {expected_type}: {source}")]
    ParseError {
        var: String,
        expected_type: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3030";
pub const DEFAULT_LOG_FILE: &str = "data/events.log";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_API_URL: &str = "http://localhost:3030";

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Event log read on every request, relative to the working directory
    pub log_file: PathBuf,
    pub allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3030)),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
        }
    }
}

impl ServerConfig {
    /// The allowed origin as a header value. Validated by `Config::from_env`.
    pub fn allowed_origin_header(&self) -> Result<HeaderValue, ConfigError> {
        HeaderValue::from_str(&self.allowed_origin).map_err(|e| ConfigError::ParseError {
            var: "EVENTS_LOG_ALLOWED_ORIGIN".to_string(),
            expected_type: "header value".to_string(),
            source: Box::new(e),
        })
    }
}

/// Configuration for the query client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Configuration for diagnostics output
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub rust_log: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            rust_log: "info".to_string(),
        }
    }
}

/// Main configuration container
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub log: LogConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // EVENTS_LOG_BIND
        if let Ok(bind_str) = std::env::var("EVENTS_LOG_BIND") {
            config.server.bind = bind_str.parse().map_err(|e| ConfigError::ParseError {
                var: "EVENTS_LOG_BIND".to_string(),
                expected_type: "socket address".to_string(),
                source: Box::new(e),
            })?;
        }

        // EVENTS_LOG_FILE
        if let Ok(log_file) = std::env::var("EVENTS_LOG_FILE") {
            config.server.log_file = PathBuf::from(log_file);
        }

        // EVENTS_LOG_ALLOWED_ORIGIN
        if let Ok(origin) = std::env::var("EVENTS_LOG_ALLOWED_ORIGIN") {
            config.server.allowed_origin = origin;
        }

        // EVENTS_LOG_API_URL
        if let Ok(api_url) = std::env::var("EVENTS_LOG_API_URL") {
            config.client.api_url = api_url;
        }

        // RUST_LOG
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            config.log.rust_log = rust_log;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.log_file.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "EVENTS_LOG_FILE".to_string(),
                message: "log file path must not be empty".to_string(),
            });
        }

        self.server.allowed_origin_header()?;

        if self.client.api_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "EVENTS_LOG_API_URL".to_string(),
                message: "API URL must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
