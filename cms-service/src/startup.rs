//! Application startup and lifecycle management.

use axum::{middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{
    request_id_middleware, security_headers_middleware, tracing::make_request_span,
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::bootstrap::{self, ServiceHandle};
use crate::config::CmsConfig;
use crate::handlers;
use crate::middleware::cors_layer;

/// Shared application state. The Firebase handle is fixed at startup and
/// only ever read by handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: CmsConfig,
    pub firebase: ServiceHandle,
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors.allowed_origins);

    Router::new()
        .route("/api", get(handlers::root))
        .route("/api/", get(handlers::root))
        .route("/api/health", get(handlers::health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Initialize the Firebase handle and bind the HTTP listener.
    pub async fn build(config: CmsConfig) -> Result<Self, AppError> {
        let outcome = bootstrap::initialize(
            &config.firebase.credential_paths(),
            config.firebase.options(),
        );
        Self::build_with_handle(config, outcome.into_handle()).await
    }

    /// Bind the HTTP listener around an already initialized handle
    /// (port 0 = random port for testing).
    pub async fn build_with_handle(
        config: CmsConfig,
        firebase: ServiceHandle,
    ) -> Result<Self, AppError> {
        let addr = config.common.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            state: AppState { config, firebase },
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn firebase_configured(&self) -> bool {
        self.state.firebase.is_some()
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let firebase_configured = self.firebase_configured();
        let router = build_router(self.state);

        tracing::info!(
            port = self.port,
            firebase_configured,
            "Content Hub CMS API started successfully"
        );

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
