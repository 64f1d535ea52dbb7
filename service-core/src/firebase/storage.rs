use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::token::TokenSource;
use super::FirebaseError;

pub const STORAGE_API_BASE: &str = "https://storage.googleapis.com";

/// One entry of a bucket's CORS configuration, in Cloud Storage JSON API
/// field naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorsRule {
    pub origin: Vec<String>,
    pub method: Vec<String>,
    pub response_header: Vec<String>,
    pub max_age_seconds: u32,
}

#[derive(Debug, Serialize)]
struct CorsPatch<'a> {
    cors: &'a [CorsRule],
}

/// Minimal Cloud Storage bucket client: existence checks and CORS updates.
#[derive(Clone)]
pub struct StorageClient {
    client: Client,
    tokens: TokenSource,
    base_url: String,
}

impl StorageClient {
    pub fn new(client: Client, tokens: TokenSource, base_url: impl Into<String>) -> Self {
        Self {
            client,
            tokens,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn bucket_url(&self, bucket: &str) -> String {
        format!("{}/storage/v1/b/{}", self.base_url, bucket)
    }

    pub async fn bucket_exists(&self, bucket: &str) -> Result<bool, FirebaseError> {
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .get(self.bucket_url(bucket))
            .bearer_auth(token.secret())
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(FirebaseError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }

    /// Replace the bucket's CORS configuration with `rules`.
    pub async fn patch_cors(&self, bucket: &str, rules: &[CorsRule]) -> Result<(), FirebaseError> {
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .patch(self.bucket_url(bucket))
            .bearer_auth(token.secret())
            .json(&CorsPatch { cors: rules })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FirebaseError::Api {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        tracing::info!(bucket = %bucket, rules = rules.len(), "Bucket CORS configuration updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firebase::credentials::ServiceAccountKey;
    use httpmock::prelude::*;

    const FIXTURE: &str = include_str!("../../tests/fixtures/service_account.json");

    async fn client_for(server: &MockServer) -> StorageClient {
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200).json_body(serde_json::json!({
                    "access_token": "ya29.storage",
                    "expires_in": 3600
                }));
            })
            .await;

        let mut key = ServiceAccountKey::from_json(FIXTURE).unwrap();
        key.token_uri = server.url("/token");
        let http = Client::new();
        let tokens = TokenSource::new(http.clone(), &key).unwrap();
        StorageClient::new(http, tokens, server.base_url())
    }

    #[test]
    fn cors_rule_uses_json_api_field_names() {
        let rule = CorsRule {
            origin: vec!["*".to_string()],
            method: vec!["GET".to_string()],
            response_header: vec!["Content-Type".to_string()],
            max_age_seconds: 3600,
        };
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["responseHeader"][0], "Content-Type");
        assert_eq!(json["maxAgeSeconds"], 3600);
    }

    #[tokio::test]
    async fn bucket_exists_maps_404_to_false() {
        let server = MockServer::start_async().await;
        let storage = client_for(&server).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/storage/v1/b/missing-bucket");
                then.status(404);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/storage/v1/b/present-bucket")
                    .header("authorization", "Bearer ya29.storage");
                then.status(200)
                    .json_body(serde_json::json!({ "name": "present-bucket" }));
            })
            .await;

        assert!(!storage.bucket_exists("missing-bucket").await.unwrap());
        assert!(storage.bucket_exists("present-bucket").await.unwrap());
    }

    #[tokio::test]
    async fn bucket_exists_surfaces_permission_errors() {
        let server = MockServer::start_async().await;
        let storage = client_for(&server).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/storage/v1/b/locked");
                then.status(403).body("forbidden");
            })
            .await;

        let err = storage.bucket_exists("locked").await.unwrap_err();
        assert!(matches!(err, FirebaseError::Api { status: 403, .. }));
    }

    #[tokio::test]
    async fn patch_cors_sends_rules() {
        let server = MockServer::start_async().await;
        let storage = client_for(&server).await;
        let patch = server
            .mock_async(|when, then| {
                when.method(httpmock::Method::PATCH)
                    .path("/storage/v1/b/media")
                    .json_body(serde_json::json!({
                        "cors": [{
                            "origin": ["*"],
                            "method": ["GET", "PUT"],
                            "responseHeader": ["Content-Type"],
                            "maxAgeSeconds": 60
                        }]
                    }));
                then.status(200).json_body(serde_json::json!({ "name": "media" }));
            })
            .await;

        let rules = [CorsRule {
            origin: vec!["*".to_string()],
            method: vec!["GET".to_string(), "PUT".to_string()],
            response_header: vec!["Content-Type".to_string()],
            max_age_seconds: 60,
        }];
        storage.patch_cors("media", &rules).await.unwrap();
        patch.assert_async().await;
    }
}
