//! HTTP server exposing the source map.
//!
//! `GET <route>` returns the active pipeline's slug → source path mapping as
//! a flat JSON object. Any failure is a plain 500.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use color_eyre::eyre::{Result, WrapErr};
use docsource_core::SourceMapService;
use docsource_shared::{DocSourceError, SourceMap};
use tokio::net::TcpListener;
use tracing::{error, info};

/// Failure surfaced to HTTP clients as a generic server error.
struct ApiError(DocSourceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "source map request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
    }
}

impl From<DocSourceError> for ApiError {
    fn from(err: DocSourceError) -> Self {
        Self(err)
    }
}

async fn handle_source_map(
    State(service): State<Arc<SourceMapService>>,
) -> std::result::Result<Json<SourceMap>, ApiError> {
    Ok(Json(service.source_map().await?))
}

/// Build the router serving `route`.
pub(crate) fn router(service: Arc<SourceMapService>, route: &str) -> Router {
    Router::new()
        .route(route, get(handle_source_map))
        .with_state(service)
}

/// Bind `bind_addr` and serve until Ctrl+C or SIGTERM.
pub(crate) async fn run(service: SourceMapService, bind_addr: &str, route: &str) -> Result<()> {
    let pipeline = service.active();
    let app = router(Arc::new(service), route);
    let listener = TcpListener::bind(bind_addr)
        .await
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;

    info!(%bind_addr, %route, %pipeline, "source map server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("server error")?;
    info!("source map server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
