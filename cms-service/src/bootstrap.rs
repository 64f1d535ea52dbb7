//! One-shot initialization of the Firebase service handle.
//!
//! The API must come up whether or not a credential is available, so nothing
//! here returns an error or panics: every path ends in a [`BootstrapOutcome`]
//! that the caller turns into the (possibly absent) [`ServiceHandle`].

use service_core::firebase::{FirebaseApp, FirebaseError, FirebaseOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The process-wide reference to the managed backend. `None` means the API
/// runs in degraded mode.
pub type ServiceHandle = Option<Arc<FirebaseApp>>;

/// Where to look for the service-account key, in priority order.
#[derive(Debug, Clone)]
pub struct CredentialPaths {
    pub deployment: PathBuf,
    pub local: PathBuf,
}

impl CredentialPaths {
    /// First candidate that exists on disk; the deployment path wins when
    /// both are present.
    pub fn locate(&self) -> Option<&Path> {
        [&self.deployment, &self.local]
            .into_iter()
            .find(|path| path.exists())
            .map(PathBuf::as_path)
    }
}

pub enum BootstrapOutcome {
    Ready {
        app: Arc<FirebaseApp>,
        credential_path: PathBuf,
    },
    /// Neither credential path exists.
    NotConfigured { searched: Vec<PathBuf> },
    /// A credential file was found but the client could not be built from it.
    Failed {
        credential_path: PathBuf,
        error: FirebaseError,
    },
}

impl BootstrapOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, BootstrapOutcome::Ready { .. })
    }

    pub fn handle(&self) -> ServiceHandle {
        match self {
            BootstrapOutcome::Ready { app, .. } => Some(Arc::clone(app)),
            _ => None,
        }
    }

    pub fn into_handle(self) -> ServiceHandle {
        match self {
            BootstrapOutcome::Ready { app, .. } => Some(app),
            _ => None,
        }
    }
}

pub fn initialize(paths: &CredentialPaths, options: FirebaseOptions) -> BootstrapOutcome {
    let Some(credential_path) = paths.locate() else {
        tracing::warn!("Firebase Admin SDK not configured; backend Firebase features are disabled");
        tracing::info!(
            deployment_path = %paths.deployment.display(),
            local_path = %paths.local.display(),
            "To enable backend Firebase features, download a service account key from the \
             Firebase console and save it at the deployment path (containers) or the local path"
        );
        return BootstrapOutcome::NotConfigured {
            searched: vec![paths.deployment.clone(), paths.local.clone()],
        };
    };

    match FirebaseApp::from_credentials_file(credential_path, options) {
        Ok(app) => {
            tracing::info!(
                credential_path = %credential_path.display(),
                project_id = %app.project_id(),
                client_email = %app.client_email(),
                storage_bucket = %app.storage_bucket(),
                "Firebase Admin initialized"
            );
            BootstrapOutcome::Ready {
                app: Arc::new(app),
                credential_path: credential_path.to_path_buf(),
            }
        }
        Err(error) => {
            tracing::error!(
                credential_path = %credential_path.display(),
                error = %error,
                "Firebase Admin initialization error"
            );
            BootstrapOutcome::Failed {
                credential_path: credential_path.to_path_buf(),
                error,
            }
        }
    }
}
