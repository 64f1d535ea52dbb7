//! service-core: Shared infrastructure for the Content Hub backend.
//!
//! Hosts the ambient stack every binary in the workspace uses (configuration,
//! errors, logging, HTTP middleware) together with the client for the managed
//! Firebase / Google Cloud platform the API optionally hands off to.
pub mod config;
pub mod error;
pub mod firebase;
pub mod middleware;
pub mod observability;

pub use axum;
pub use reqwest;
pub use secrecy;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tower;
pub use tower_http;
pub use tracing;
