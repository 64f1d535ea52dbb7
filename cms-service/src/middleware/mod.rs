pub mod auth;
pub mod cors;

pub use auth::BearerToken;
pub use cors::cors_layer;
