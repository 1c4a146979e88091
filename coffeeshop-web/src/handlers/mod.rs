//! HTTP handlers for the drink API

pub mod drinks;
pub mod health;
pub mod types;

pub use drinks::*;
pub use health::*;
pub use types::*;

use crate::error::ApiError;

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Fallback for known routes called with an unsupported method
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
