//! Diagnostic lookups of the CMS content: page documents in Firestore and
//! the upload bucket in Cloud Storage.

use service_core::firebase::{Document, FirebaseApp, FirebaseError, FirestoreClient};

pub const PAGES_COLLECTION: &str = "pages";

/// Pages the frontend expects to find.
pub const KNOWN_PAGES: [&str; 6] = ["home", "gallery", "profile", "teaching", "research", "contact"];

pub enum PageStatus {
    Found(Document),
    Missing,
    Error(FirebaseError),
}

pub struct PageCheck {
    pub id: String,
    pub status: PageStatus,
}

/// Look up each page id in order. Lookup errors are recorded per page and do
/// not stop the remaining checks.
pub async fn check_pages(firestore: &FirestoreClient, ids: &[&str]) -> Vec<PageCheck> {
    let mut results = Vec::with_capacity(ids.len());

    for id in ids {
        let status = match firestore.get_document(PAGES_COLLECTION, id).await {
            Ok(Some(document)) => PageStatus::Found(document),
            Ok(None) => PageStatus::Missing,
            Err(e) => {
                tracing::error!(page = %id, error = %e, "Page lookup failed");
                PageStatus::Error(e)
            }
        };
        results.push(PageCheck {
            id: id.to_string(),
            status,
        });
    }

    results
}

/// Whether the bucket configured for uploads exists.
pub async fn check_storage_bucket(app: &FirebaseApp) -> Result<bool, FirebaseError> {
    app.storage().bucket_exists(app.storage_bucket()).await
}
