#![allow(dead_code)]

use cms_service::bootstrap::ServiceHandle;
use cms_service::config::CmsConfig;
use cms_service::startup::{build_router, AppState, Application};
use service_core::firebase::{FirebaseApp, FirebaseOptions};
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

pub const FIXTURE_CREDENTIALS: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../service-core/tests/fixtures/service_account.json"
);

/// A Firebase handle built from the fixture key. Construction is local, so
/// no platform access is needed.
pub fn fixture_handle() -> ServiceHandle {
    let app = FirebaseApp::from_credentials_file(
        Path::new(FIXTURE_CREDENTIALS),
        FirebaseOptions::new("content-hub-test.firebasestorage.app"),
    )
    .expect("Fixture credentials should build a Firebase app");
    Some(Arc::new(app))
}

pub fn test_config() -> CmsConfig {
    let mut config = CmsConfig::default();
    config.common.host = IpAddr::from([127, 0, 0, 1]);
    config.common.port = 0; // Random port for testing
    config
}

/// Router without a listener, for `oneshot` tests.
pub fn router(firebase: ServiceHandle) -> axum::Router {
    build_router(AppState {
        config: test_config(),
        firebase,
    })
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    pub async fn spawn(firebase: ServiceHandle) -> Self {
        let app = Application::build_with_handle(test_config(), firebase)
            .await
            .expect("Failed to build test application");
        Self::serve(app).await
    }

    /// Run an already built application in the background.
    pub async fn serve(app: Application) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/api/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }
}
