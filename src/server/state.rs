use crate::{config::ServerConfig, events::LogSource};
use std::sync::Arc;

/// Shared, read-only state handed to every request handler
#[derive(Debug, Clone)]
pub struct AppState {
    /// The log file every request reads from
    pub(crate) source: Arc<LogSource>,
}

impl AppState {
    pub fn new(source: LogSource) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(LogSource::new(config.log_file.clone()))
    }
}
