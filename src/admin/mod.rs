//! Admin HTTP endpoint.
//!
//! - `GET /healthz`: liveness, always 200
//! - `GET /readyz`: 200 once a pass has finished, 503 before
//! - `GET /status`: JSON summary of the last pass

pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use self::handlers::*;
use crate::reconcile::StatusBoard;

pub fn setup_admin_router(board: Arc<StatusBoard>) -> Router {
    Router::new()
        .route("/healthz", get(get_healthz))
        .route("/readyz", get(get_readyz))
        .route("/status", get(get_status))
        .with_state(board)
}

/// Serve the admin router until shutdown is signalled.
pub async fn serve(
    listener: TcpListener,
    board: Arc<StatusBoard>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Admin server starting");

    axum::serve(listener, setup_admin_router(board))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!("Admin server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::reconcile::{PassError, PassSummary};
    use crate::store::StoreError;

    async fn status_of(board: Arc<StatusBoard>, uri: &str) -> StatusCode {
        setup_admin_router(board)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_readiness_follows_first_pass() {
        let board = Arc::new(StatusBoard::new());
        assert_eq!(status_of(board.clone(), "/healthz").await, StatusCode::OK);
        assert_eq!(status_of(board.clone(), "/readyz").await, StatusCode::SERVICE_UNAVAILABLE);

        let error = PassError::List {
            what: "target resources",
            source: StoreError::Backend("timeout".into()),
        };
        board.publish(PassSummary::aborted(&error));

        assert_eq!(status_of(board.clone(), "/readyz").await, StatusCode::OK);
        assert_eq!(status_of(board, "/status").await, StatusCode::OK);
    }
}
