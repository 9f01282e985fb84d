//! API server implementation

use crate::Result;
use crate::{html, routes};
use axum::Router;
use axum::routing::{get, post};
use cbam_core::Estimator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl ServerConfig {
    /// Default listening port.
    pub const DEFAULT_PORT: u16 = 5099;

    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: Self::DEFAULT_PORT,
        }
    }
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Estimator shared by all requests.
    pub estimator: Estimator,
    /// Input form, rendered once from the catalogs.
    pub form_page: Arc<str>,
}

impl AppState {
    /// State for `estimator`, pre-rendering the input form.
    pub fn new(estimator: Estimator) -> Self {
        let form_page = html::render_form(estimator.context().reference()).into();
        Self {
            estimator,
            form_page,
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/compute", post(routes::compute))
        .route("/api/estimate", post(routes::api_estimate))
        .route("/health", get(routes::health))
        .with_state(state)
}

/// CBAM HTTP server
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Listener settings.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind and serve until the process stops.
    pub async fn serve(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_address()).await?;
        tracing::info!(address = %listener.local_addr()?, "Listening");
        axum::serve(listener, router(self.state)).await?;
        Ok(())
    }
}
