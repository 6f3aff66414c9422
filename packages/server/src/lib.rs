//! Arbor Server - HTTP surface for the tree engine
//!
//! # Modules
//!
//! - [`config`] - Environment-driven server configuration
//! - [`http`] - axum router, endpoints, error mapping, event logging

pub mod config;
pub mod http;

pub use config::{ConfigError, ServerConfig};
pub use http::{create_router, start_server, AppState, HttpError};
