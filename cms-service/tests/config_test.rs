//! Configuration loaded from the environment, through to the health flag.
//!
//! Environment variables are process-global, so every test here is serial.

mod common;

use cms_service::config::{
    CmsConfig, DEFAULT_STORAGE_BUCKET, DEPLOYMENT_CREDENTIALS_PATH, FALLBACK_ORIGINS,
    LOCAL_CREDENTIALS_PATH,
};
use cms_service::Application;
use common::TestApp;
use reqwest::Client;
use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const OVERRIDES: [&str; 6] = [
    "FIREBASE_STORAGE_BUCKET",
    "FIREBASE_CREDENTIALS_PATH",
    "FIREBASE_LOCAL_CREDENTIALS_PATH",
    "CORS_ORIGINS",
    "APP__HOST",
    "APP__PORT",
];

fn clear_overrides() {
    for key in OVERRIDES {
        std::env::remove_var(key);
    }
}

/// Point both credential paths into `dir` and bind to a random local port.
fn set_test_env(dir: &TempDir) -> (PathBuf, PathBuf) {
    let deployment = dir.path().join("secrets/firebase-admin.json");
    let local = dir.path().join("serviceAccountKey.json");

    clear_overrides();
    std::env::set_var("FIREBASE_CREDENTIALS_PATH", &deployment);
    std::env::set_var("FIREBASE_LOCAL_CREDENTIALS_PATH", &local);
    std::env::set_var("APP__HOST", "127.0.0.1");
    std::env::set_var("APP__PORT", "0"); // Random port

    (deployment, local)
}

async fn health_flag(app: &TestApp) -> bool {
    let body: serde_json::Value = Client::new()
        .get(format!("{}/api/health", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");

    assert_eq!(body["status"], "healthy");
    body["firebase_configured"]
        .as_bool()
        .expect("firebase_configured should be a bool")
}

#[test]
#[serial]
fn load_uses_defaults_without_overrides() {
    clear_overrides();

    let config = CmsConfig::load().expect("Failed to load config");

    assert_eq!(config.common.port, 8000);
    assert_eq!(config.firebase.storage_bucket, DEFAULT_STORAGE_BUCKET);
    assert_eq!(
        config.firebase.deployment_credentials_path,
        PathBuf::from(DEPLOYMENT_CREDENTIALS_PATH)
    );
    assert_eq!(
        config.firebase.local_credentials_path,
        PathBuf::from(LOCAL_CREDENTIALS_PATH)
    );
    assert_eq!(config.cors.allowed_origins, FALLBACK_ORIGINS.to_vec());
}

#[test]
#[serial]
fn load_reads_firebase_and_cors_overrides() {
    clear_overrides();
    std::env::set_var("FIREBASE_STORAGE_BUCKET", "media.example.appspot.com");
    std::env::set_var("FIREBASE_CREDENTIALS_PATH", "/etc/cms/firebase.json");
    std::env::set_var("FIREBASE_LOCAL_CREDENTIALS_PATH", "dev-key.json");
    std::env::set_var(
        "CORS_ORIGINS",
        " https://cms.example.com ,https://admin.example.com,",
    );
    std::env::set_var("APP__PORT", "9100");

    let config = CmsConfig::load().expect("Failed to load config");
    clear_overrides();

    assert_eq!(config.common.port, 9100);
    assert_eq!(config.firebase.storage_bucket, "media.example.appspot.com");
    assert_eq!(
        config.firebase.deployment_credentials_path,
        PathBuf::from("/etc/cms/firebase.json")
    );
    assert_eq!(
        config.firebase.local_credentials_path,
        PathBuf::from("dev-key.json")
    );
    assert_eq!(
        config.firebase.options().storage_bucket,
        "media.example.appspot.com"
    );
    assert_eq!(
        config.cors.allowed_origins,
        vec!["https://cms.example.com", "https://admin.example.com"]
    );
}

#[tokio::test]
#[serial]
async fn health_reports_false_when_no_credential_path_exists() {
    let dir = TempDir::new().unwrap();
    set_test_env(&dir);

    let config = CmsConfig::load().expect("Failed to load config");
    let app = Application::build(config)
        .await
        .expect("Failed to build application");
    clear_overrides();

    assert!(!app.firebase_configured());
    let app = TestApp::serve(app).await;
    assert!(!health_flag(&app).await);
}

#[tokio::test]
#[serial]
async fn health_reports_true_once_deployment_credentials_exist() {
    let dir = TempDir::new().unwrap();
    let (deployment, _local) = set_test_env(&dir);
    fs::create_dir_all(deployment.parent().unwrap()).unwrap();
    fs::copy(common::FIXTURE_CREDENTIALS, &deployment).unwrap();

    let config = CmsConfig::load().expect("Failed to load config");
    let app = Application::build(config)
        .await
        .expect("Failed to build application");
    clear_overrides();

    assert!(app.firebase_configured());
    let app = TestApp::serve(app).await;
    assert!(health_flag(&app).await);
}

#[tokio::test]
#[serial]
async fn health_reports_false_when_credentials_are_rejected() {
    let dir = TempDir::new().unwrap();
    let (_deployment, local) = set_test_env(&dir);
    fs::write(&local, "{ not json").unwrap();

    let config = CmsConfig::load().expect("Failed to load config");
    let app = Application::build(config)
        .await
        .expect("Failed to build application");
    clear_overrides();

    assert!(!app.firebase_configured());
    let app = TestApp::serve(app).await;
    assert!(!health_flag(&app).await);
}
