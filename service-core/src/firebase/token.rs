use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::credentials::ServiceAccountKey;
use super::FirebaseError;

pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Cached tokens are refreshed this long before they actually expire.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: &'a str,
    scope: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// An OAuth2 access token obtained for the service account.
#[derive(Clone)]
pub struct AccessToken {
    secret: Secret<String>,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn secret(&self) -> &str {
        self.secret.expose_secret()
    }

    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

/// Exchanges signed service-account assertions for access tokens
/// (RFC 7523 JWT bearer grant) and caches the result until shortly before
/// it expires.
#[derive(Clone)]
pub struct TokenSource {
    client: Client,
    client_email: String,
    token_uri: String,
    key_id: Option<String>,
    encoding_key: EncodingKey,
    scope: String,
    cached: Arc<Mutex<Option<AccessToken>>>,
}

impl TokenSource {
    pub fn new(client: Client, key: &ServiceAccountKey) -> Result<Self, FirebaseError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.expose_secret().as_bytes())
            .map_err(|e| {
                FirebaseError::InvalidCredentials(format!("Failed to parse private key: {}", e))
            })?;

        Ok(Self {
            client,
            client_email: key.client_email.clone(),
            token_uri: key.token_uri.clone(),
            key_id: key.private_key_id.clone(),
            encoding_key,
            scope: CLOUD_PLATFORM_SCOPE.to_string(),
            cached: Arc::new(Mutex::new(None)),
        })
    }

    /// Build the signed JWT presented to the token endpoint.
    pub fn assertion(&self, now: DateTime<Utc>) -> Result<String, FirebaseError> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            sub: &self.client_email,
            aud: &self.token_uri,
            scope: &self.scope,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();

        Ok(encode(&header, &claims, &self.encoding_key)?)
    }

    pub async fn access_token(&self) -> Result<AccessToken, FirebaseError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.clone());
        }

        let token = self.exchange(now).await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    async fn exchange(&self, now: DateTime<Utc>) -> Result<AccessToken, FirebaseError> {
        let assertion = self.assertion(now)?;

        let response = self
            .client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FirebaseError::Token(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| FirebaseError::Token(format!("Failed to parse token response: {}", e)))?;

        tracing::debug!(client_email = %self.client_email, "Obtained access token");

        Ok(AccessToken {
            secret: Secret::new(parsed.access_token),
            expires_at: now
                + Duration::seconds(parsed.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS)),
        })
    }
}
