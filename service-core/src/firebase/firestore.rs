use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::token::TokenSource;
use super::FirebaseError;

pub const FIRESTORE_API_BASE: &str = "https://firestore.googleapis.com";

/// A Firestore document as returned by the REST API. Field values keep
/// their typed wire encoding (`{"stringValue": ...}`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
}

impl Document {
    /// Read a string field, if present and string-typed.
    pub fn string_field(&self, field: &str) -> Option<&str> {
        self.fields.get(field)?.get("stringValue")?.as_str()
    }
}

/// Handle to the project's default Firestore database.
#[derive(Clone)]
pub struct FirestoreClient {
    client: Client,
    tokens: TokenSource,
    project_id: String,
    base_url: String,
}

impl FirestoreClient {
    pub fn new(
        client: Client,
        tokens: TokenSource,
        project_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            tokens,
            project_id: project_id.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}/{}",
            self.base_url, self.project_id, collection, id
        )
    }

    /// Fetch a single document; `Ok(None)` when it does not exist.
    pub async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, FirebaseError> {
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .get(self.document_url(collection, id))
            .bearer_auth(token.secret())
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            status => Err(FirebaseError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}
