//! Application state for the document gateway.

use std::sync::Arc;

use common::config::{AppConfig, ConfigError};

use crate::store::{CouchClient, DocumentStore};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    /// Creates the state with a client for the configured remote service.
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        let client = CouchClient::new(&config.couch)?;
        tracing::info!(remote = %client.base_url(), "remote document service configured");
        Ok(Self::with_store(config, Arc::new(client)))
    }

    /// Creates the state around an existing store.
    pub fn with_store(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self { config, store }
    }
}
