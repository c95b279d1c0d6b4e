//! # Application State
//!
//! Shared state handed to every handler: configuration, the location
//! store and the token verifier. Built once in `main` (or a test) and
//! cloned per request; every field is behind an `Arc`.

use std::sync::Arc;

use saathi_token::TokenVerifier;

use crate::config::AppConfig;
use crate::db::LocationStore;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Runtime configuration.
    pub config: Arc<AppConfig>,
    /// Where uploads are written.
    pub store: Arc<dyn LocationStore>,
    /// Verifier built from `config.jwt_secret`.
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    /// Build the state, deriving the token verifier from the configured secret.
    pub fn new(config: AppConfig, store: Arc<dyn LocationStore>) -> Self {
        let verifier = Arc::new(TokenVerifier::new(&config.jwt_secret));
        Self {
            config: Arc::new(config),
            store,
            verifier,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("store", &"dyn LocationStore")
            .field("verifier", &self.verifier)
            .finish()
    }
}
