//! Coffee Shop Core - Domain types and shared infrastructure
//!
//! This crate defines the drink model, the persistence trait implemented by
//! storage backends, and the error, configuration and logging plumbing shared
//! by the web server.

pub mod config;
pub mod error;
pub mod logging;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use traits::*;
pub use types::*;

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use tracing;
