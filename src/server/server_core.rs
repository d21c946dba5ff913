//! TTS Server Core
//!
//! Server state and router assembly with the Axum web framework.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::adapters::AdapterCache;
use crate::core::error::Result;
use crate::router::EnablementStore;

use super::config::ServerConfig;
use super::credentials::CredentialStore;
use super::routes;

/// Server state shared across handlers
pub struct ServerState {
    /// Server configuration
    pub config: ServerConfig,
    /// Credential and enablement store
    pub store: Arc<CredentialStore>,
    /// Lazily built engine adapters
    pub adapters: Arc<AdapterCache>,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        let store = Arc::new(CredentialStore::from_env());

        // Config-file overrides win over the environment-derived defaults
        for (engine, enabled) in &config.engines {
            store.set_enabled(*engine, *enabled);
        }

        Self {
            config,
            store,
            adapters: Arc::new(AdapterCache::new()),
            start_time: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Create the router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health_check))
        .route("/api/voices", get(routes::get_voices))
        .route("/api/tts", post(routes::post_tts))
        .route("/api/engines", get(routes::get_engines))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// VoiceRoute TTS server
pub struct TtsServer {
    state: Arc<ServerState>,
}

impl TtsServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            state: Arc::new(ServerState::new(config)),
        }
    }

    /// Run the server until shutdown
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.bind_addr();
        let router = create_router(Arc::clone(&self.state));

        info!(
            engines = self.state.store.enabled_engines().len(),
            "starting VoiceRoute TTS server on {}", addr
        );

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .await
            .map_err(|e| crate::core::error::TtsError::Io {
                message: e.to_string(),
            })?;

        Ok(())
    }

    /// Get server state
    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::Engine;

    #[test]
    fn test_config_overrides_apply_to_store() {
        let mut config = ServerConfig::default();
        config.engines.insert(Engine::Mock, false);

        let state = ServerState::new(config);
        assert!(!state.store.is_enabled(Engine::Mock));
    }
}
