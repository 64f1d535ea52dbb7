//! Applies the upload CORS policy to the first candidate bucket that exists.
//!
//! The project's default bucket has gone by several names over time, so the
//! tool walks an ordered list of guesses. Each candidate is handled
//! independently: a failure is logged and the next name is tried, and the
//! first successful update ends the run.

use async_trait::async_trait;
use service_core::firebase::{
    http_client, CorsRule, FirebaseError, ServiceAccountKey, StorageClient, TokenSource,
    STORAGE_API_BASE,
};
use std::path::PathBuf;

pub const DEFAULT_CREDENTIALS_PATH: &str = "serviceAccountKey.json";

pub const DEFAULT_CANDIDATES: [&str; 3] = [
    "admin-dashboard-5c0bb.firebasestorage.app",
    "admin-dashboard-5c0bb.appspot.com",
    "admin-dashboard-5c0bb",
];

/// Policy that lets the browser upload directly to the bucket, including
/// resumable uploads.
pub fn upload_cors_policy() -> Vec<CorsRule> {
    vec![CorsRule {
        origin: vec!["*".to_string()],
        method: ["GET", "PUT", "POST", "DELETE", "OPTIONS"]
            .into_iter()
            .map(String::from)
            .collect(),
        response_header: vec!["Content-Type".to_string(), "x-goog-resumable".to_string()],
        max_age_seconds: 3600,
    }]
}

/// Bucket operations the tool needs.
#[async_trait]
pub trait BucketAdmin: Send + Sync {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, FirebaseError>;
    async fn patch_cors(&self, bucket: &str, rules: &[CorsRule]) -> Result<(), FirebaseError>;
}

#[async_trait]
impl BucketAdmin for StorageClient {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, FirebaseError> {
        StorageClient::bucket_exists(self, bucket).await
    }

    async fn patch_cors(&self, bucket: &str, rules: &[CorsRule]) -> Result<(), FirebaseError> {
        StorageClient::patch_cors(self, bucket, rules).await
    }
}

/// Produces an authenticated [`BucketAdmin`]; called once per candidate.
pub trait StorageConnector: Send + Sync {
    fn connect(&self) -> Result<Box<dyn BucketAdmin>, FirebaseError>;
}

/// Authenticates from a service-account key file on disk.
pub struct CredentialFileConnector {
    credentials_path: PathBuf,
    storage_base_url: String,
}

impl CredentialFileConnector {
    pub fn new(credentials_path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: credentials_path.into(),
            storage_base_url: STORAGE_API_BASE.to_string(),
        }
    }

    pub fn with_storage_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.storage_base_url = base_url.into();
        self
    }
}

impl StorageConnector for CredentialFileConnector {
    fn connect(&self) -> Result<Box<dyn BucketAdmin>, FirebaseError> {
        let key = ServiceAccountKey::from_file(&self.credentials_path)?;
        let client = http_client()?;
        let tokens = TokenSource::new(client.clone(), &key)?;
        Ok(Box::new(StorageClient::new(
            client,
            tokens,
            self.storage_base_url.clone(),
        )))
    }
}

#[derive(Debug)]
pub enum CandidateResult {
    Missing,
    Updated,
    Failed(FirebaseError),
}

#[derive(Debug)]
pub struct CandidateAttempt {
    pub bucket: String,
    pub result: CandidateResult,
}

/// What happened to each candidate that was tried, in order.
#[derive(Debug, Default)]
pub struct CorsRunReport {
    pub attempts: Vec<CandidateAttempt>,
}

impl CorsRunReport {
    pub fn updated_bucket(&self) -> Option<&str> {
        self.attempts
            .iter()
            .find(|attempt| matches!(attempt.result, CandidateResult::Updated))
            .map(|attempt| attempt.bucket.as_str())
    }
}

pub async fn apply_cors<C>(candidates: &[String], rules: &[CorsRule], connector: &C) -> CorsRunReport
where
    C: StorageConnector + ?Sized,
{
    let mut report = CorsRunReport::default();

    for bucket in candidates {
        tracing::info!(bucket = %bucket, "Attempting bucket");

        let result = try_candidate(bucket, rules, connector).await;
        match &result {
            CandidateResult::Missing => {
                tracing::info!(bucket = %bucket, "Bucket does not exist");
            }
            CandidateResult::Updated => {
                tracing::info!(bucket = %bucket, "Updated CORS configuration");
            }
            CandidateResult::Failed(e) => {
                tracing::error!(bucket = %bucket, error = %e, "Failed to update bucket");
            }
        }

        let updated = matches!(result, CandidateResult::Updated);
        report.attempts.push(CandidateAttempt {
            bucket: bucket.clone(),
            result,
        });
        if updated {
            break;
        }
    }

    report
}

async fn try_candidate<C>(bucket: &str, rules: &[CorsRule], connector: &C) -> CandidateResult
where
    C: StorageConnector + ?Sized,
{
    let admin = match connector.connect() {
        Ok(admin) => admin,
        Err(e) => return CandidateResult::Failed(e),
    };

    match admin.bucket_exists(bucket).await {
        Ok(true) => {}
        Ok(false) => return CandidateResult::Missing,
        Err(e) => return CandidateResult::Failed(e),
    }

    match admin.patch_cors(bucket, rules).await {
        Ok(()) => CandidateResult::Updated,
        Err(e) => CandidateResult::Failed(e),
    }
}
