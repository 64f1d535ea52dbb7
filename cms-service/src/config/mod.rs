use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use service_core::firebase::FirebaseOptions;
use std::env;
use std::path::PathBuf;

use crate::bootstrap::CredentialPaths;

/// Service-account key location inside the deployment image.
pub const DEPLOYMENT_CREDENTIALS_PATH: &str = "/app/backend/secrets/firebase-admin.json";
/// Service-account key location for local development, relative to the
/// working directory.
pub const LOCAL_CREDENTIALS_PATH: &str = "serviceAccountKey.json";
pub const DEFAULT_STORAGE_BUCKET: &str = "admin-dashboard-5c0bb.firebasestorage.app";

/// Origins allowed when `CORS_ORIGINS` is left at the wildcard.
pub const FALLBACK_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "http://localhost:3001",
    "http://localhost:8000",
];

const WILDCARD_ORIGIN: &str = "*";

#[derive(Debug, Clone, Deserialize)]
pub struct CmsConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub firebase: FirebaseConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseConfig {
    pub storage_bucket: String,
    /// Checked first.
    pub deployment_credentials_path: PathBuf,
    pub local_credentials_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CmsConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(CmsConfig {
            common,
            firebase: FirebaseConfig {
                storage_bucket: env_or("FIREBASE_STORAGE_BUCKET", DEFAULT_STORAGE_BUCKET),
                deployment_credentials_path: env_or(
                    "FIREBASE_CREDENTIALS_PATH",
                    DEPLOYMENT_CREDENTIALS_PATH,
                )
                .into(),
                local_credentials_path: env_or(
                    "FIREBASE_LOCAL_CREDENTIALS_PATH",
                    LOCAL_CREDENTIALS_PATH,
                )
                .into(),
            },
            cors: CorsConfig {
                allowed_origins: parse_allowed_origins(&env_or("CORS_ORIGINS", WILDCARD_ORIGIN)),
            },
        })
    }
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            firebase: FirebaseConfig {
                storage_bucket: DEFAULT_STORAGE_BUCKET.to_string(),
                deployment_credentials_path: DEPLOYMENT_CREDENTIALS_PATH.into(),
                local_credentials_path: LOCAL_CREDENTIALS_PATH.into(),
            },
            cors: CorsConfig {
                allowed_origins: parse_allowed_origins(WILDCARD_ORIGIN),
            },
        }
    }
}

impl FirebaseConfig {
    pub fn credential_paths(&self) -> CredentialPaths {
        CredentialPaths {
            deployment: self.deployment_credentials_path.clone(),
            local: self.local_credentials_path.clone(),
        }
    }

    pub fn options(&self) -> FirebaseOptions {
        FirebaseOptions::new(self.storage_bucket.clone())
    }
}

/// Turn the raw comma-separated `CORS_ORIGINS` value into the effective
/// allow-list.
///
/// A lone `*` does not mean "any origin": it selects [`FALLBACK_ORIGINS`].
/// A `*` mixed with explicit origins is dropped, since credentials are
/// allowed and a wildcard cannot be combined with them.
pub fn parse_allowed_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect();

    if origins == [WILDCARD_ORIGIN] {
        return FALLBACK_ORIGINS.iter().map(|o| o.to_string()).collect();
    }

    origins
        .into_iter()
        .filter(|o| {
            if o == WILDCARD_ORIGIN {
                tracing::warn!("Ignoring wildcard entry in CORS_ORIGINS alongside explicit origins");
                false
            } else {
                true
            }
        })
        .collect()
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
