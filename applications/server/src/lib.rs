//! Movieland Server Library
//!
//! HTTP JSON API for movie genres, with a lifecycle controller that drains
//! in-flight requests on shutdown.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod shutdown;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{ApiError, Result, ServerError};
pub use routes::create_router;
pub use server::{Listener, Server, ServerState, DEFAULT_SHUTDOWN_TIMEOUT};
pub use state::AppState;
