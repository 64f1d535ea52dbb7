use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::path::Path;

use super::FirebaseError;

pub const SERVICE_ACCOUNT_TYPE: &str = "service_account";

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// A Google service-account key as downloaded from the Firebase console.
///
/// Fields the backend never uses (client id, cert URLs, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub account_type: String,
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: Secret<String>,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, FirebaseError> {
        let raw = std::fs::read_to_string(path).map_err(|source| FirebaseError::CredentialRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, FirebaseError> {
        let key: ServiceAccountKey = serde_json::from_str(raw)
            .map_err(|e| FirebaseError::InvalidCredentials(e.to_string()))?;
        key.validate()?;
        Ok(key)
    }

    fn validate(&self) -> Result<(), FirebaseError> {
        if self.account_type != SERVICE_ACCOUNT_TYPE {
            return Err(FirebaseError::InvalidCredentials(format!(
                "expected credential type '{}', got '{}'",
                SERVICE_ACCOUNT_TYPE, self.account_type
            )));
        }
        if self.project_id.trim().is_empty() {
            return Err(FirebaseError::InvalidCredentials(
                "project_id is empty".to_string(),
            ));
        }
        if self.client_email.trim().is_empty() {
            return Err(FirebaseError::InvalidCredentials(
                "client_email is empty".to_string(),
            ));
        }
        if self.private_key.expose_secret().trim().is_empty() {
            return Err(FirebaseError::InvalidCredentials(
                "private_key is empty".to_string(),
            ));
        }
        Ok(())
    }
}
