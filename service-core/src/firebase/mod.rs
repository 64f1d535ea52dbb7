//! Client for the managed Firebase / Google Cloud platform.
//!
//! Everything here talks plain REST with a service-account credential: the
//! credential is exchanged for an OAuth2 access token, which then authorizes
//! Firestore and Cloud Storage calls. Building a [`FirebaseApp`] is purely
//! local; no request is made until a client method is called.

pub mod credentials;
pub mod firestore;
pub mod storage;
pub mod token;

use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub use credentials::ServiceAccountKey;
pub use firestore::{Document, FirestoreClient, FIRESTORE_API_BASE};
pub use storage::{CorsRule, StorageClient, STORAGE_API_BASE};
pub use token::{AccessToken, TokenSource};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum FirebaseError {
    #[error("Failed to read credential file {}: {source}", .path.display())]
    CredentialRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Token exchange failed: {0}")]
    Token(String),

    #[error("Failed to sign assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Connection error: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },
}

/// REST base URLs of the platform; tests point them at a mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub firestore: String,
    pub storage: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            firestore: FIRESTORE_API_BASE.to_string(),
            storage: STORAGE_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FirebaseOptions {
    pub storage_bucket: String,
    pub endpoints: Endpoints,
}

impl FirebaseOptions {
    pub fn new(storage_bucket: impl Into<String>) -> Self {
        Self {
            storage_bucket: storage_bucket.into(),
            endpoints: Endpoints::default(),
        }
    }
}

/// An initialized platform app: the credential's project plus ready-made
/// Firestore and Storage clients sharing one token source.
#[derive(Clone)]
pub struct FirebaseApp {
    project_id: String,
    client_email: String,
    storage_bucket: String,
    firestore: FirestoreClient,
    storage: StorageClient,
}

impl FirebaseApp {
    pub fn from_credentials_file(
        path: &Path,
        options: FirebaseOptions,
    ) -> Result<Self, FirebaseError> {
        let key = ServiceAccountKey::from_file(path)?;
        Self::from_key(&key, options)
    }

    pub fn from_key(key: &ServiceAccountKey, options: FirebaseOptions) -> Result<Self, FirebaseError> {
        let client = http_client()?;
        let tokens = TokenSource::new(client.clone(), key)?;

        let firestore = FirestoreClient::new(
            client.clone(),
            tokens.clone(),
            &key.project_id,
            options.endpoints.firestore,
        );
        let storage = StorageClient::new(client, tokens, options.endpoints.storage);

        Ok(Self {
            project_id: key.project_id.clone(),
            client_email: key.client_email.clone(),
            storage_bucket: options.storage_bucket,
            firestore,
            storage,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Default bucket for uploads, as configured at initialization.
    pub fn storage_bucket(&self) -> &str {
        &self.storage_bucket
    }

    pub fn firestore(&self) -> &FirestoreClient {
        &self.firestore
    }

    pub fn storage(&self) -> &StorageClient {
        &self.storage
    }
}

/// HTTP client shared by all platform calls.
pub fn http_client() -> Result<Client, FirebaseError> {
    Ok(Client::builder().timeout(HTTP_TIMEOUT).build()?)
}
