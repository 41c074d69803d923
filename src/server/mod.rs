//! HTTP surface: `POST /process` and `GET /ping`.

pub mod error;
pub mod handlers;
pub mod response;
pub mod upload;

use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Error;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use log::{error, info};
use tower_http::trace::TraceLayer;
use crate::config::config::AppConfig;
use crate::pipeline::pipeline::MeasurementPipeline;

/// Shared by every request.
pub struct AppState {
    pub pipeline: MeasurementPipeline,
    pub temp_dir: PathBuf,
}

impl AppState {
    pub fn new(pipeline: MeasurementPipeline, temp_dir: PathBuf) -> Self {
        AppState { pipeline, temp_dir }
    }
}

/// router builds the application routes with the upload limit applied.
pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/process", post(handlers::process_image))
        .route("/ping", get(handlers::ping))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// serve binds the configured address and runs until Ctrl+C or SIGTERM.
///
/// # Arguments
/// * `config` - Validated application configuration
/// * `pipeline` - Pipeline wired to a landmark provider
///
/// # Returns
/// * `Result<(), Error>`
pub async fn serve(config: &AppConfig, pipeline: MeasurementPipeline) -> Result<(), Error> {
    let server = &config.server;
    tokio::fs::create_dir_all(&server.temp_dir).await.map_err(|e| {
        Error::msg(format!("failed to create upload directory {}: {}", server.temp_dir.display(), e))
    })?;

    let state = Arc::new(AppState::new(pipeline, server.temp_dir.clone()));
    let app = router(state, server.max_upload_bytes);

    let addr = format!("{}:{}", server.host, server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return Err(e.into())
        }
    };
    info!("Face measurement server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
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
    info!("Shutdown signal received");
}
