use axum::Json;
use serde::Serialize;

pub const API_NAME: &str = "Content Hub CMS API";
pub const API_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub message: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

pub async fn root() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: API_NAME,
        version: API_VERSION,
        status: "running",
    })
}
