pub mod health;
pub mod root;

pub use health::{health_check, HealthResponse};
pub use root::{root, ApiInfo, API_NAME, API_VERSION};
