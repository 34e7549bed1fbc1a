//! courseinfo HTTP/JSON gateway.
//!
//! Exposes the course-registration [`Registry`] over REST. Callers present an
//! API key; each request runs as the actor that key maps to.

pub mod auth;
pub mod config;
pub mod error;
pub mod json;
pub mod routes;

pub use auth::{Actor, ApiKeyAuthenticator};
pub use config::{Args, GatewayConfig};
pub use error::AppError;

use std::sync::Arc;

use axum::Router;
use courseinfo_core::{ActorAuthenticator, Registry};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Record registry.
    pub registry: Arc<Registry>,
    /// Resolves API keys to actors.
    pub authenticator: Arc<dyn ActorAuthenticator>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new application state.
    pub fn new(registry: Registry, authenticator: impl ActorAuthenticator + 'static, config: GatewayConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            authenticator: Arc::new(authenticator),
            config,
        }
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::routes())
        .merge(routes::kinds::routes())
        .merge(routes::entities::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
