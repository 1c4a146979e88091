//! Coffee Shop Web Server
//!
//! REST API over the drink menu. Reads are public; every mutation and the
//! detailed listing require a bearer token carrying the matching permission.

pub mod auth;
pub mod database;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use error::ApiError;
pub use auth::{AuthError, Claims, TokenVerifier};
pub use server::CoffeeShopServer;
pub use state::AppState;

pub use coffeeshop_core::CoffeeShopConfig;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::drink_routes(&state))
        .merge(routes::service_routes())
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] coffeeshop_core::CoffeeShopError),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

/// Initialize logging for the web server
pub fn init_logging(config: &coffeeshop_core::LoggingConfig) -> WebResult<()> {
    coffeeshop_core::init_logging(config)
        .map_err(|e| WebError::Config(format!("Failed to initialize logging: {}", e)))
}
