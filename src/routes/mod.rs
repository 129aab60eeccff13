//! Route modules for IdLens Server

pub mod health;
pub mod upload;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload_bytes = state.config().server.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/health", get(health::health_check))
        .nest("/api/v1", upload::router(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::ocr::StaticAnalyzer;

    async fn test_router(max_upload_bytes: usize) -> (Router, TempDir) {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.images_dir = dir.path().to_path_buf();
        config.server.max_upload_bytes = max_upload_bytes;

        let state = AppState::new(config, Arc::new(StaticAnalyzer::default()))
            .await
            .unwrap();
        (app(state), dir)
    }

    #[tokio::test]
    async fn test_upload_over_body_limit() {
        let (router, _dir) = test_router(1024).await;

        let boundary = "idlens-boundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"big.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .into_bytes();
        body.extend(std::iter::repeat(0u8).take(4096));
        body.extend(format!("\r\n--{boundary}--\r\n").into_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/upload_image")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert!(
            response.status() == StatusCode::PAYLOAD_TOO_LARGE
                || response.status() == StatusCode::BAD_REQUEST,
            "status = {}",
            response.status()
        );
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (router, _dir) = test_router(1024).await;

        let request = Request::builder()
            .uri("/api/v1/upload")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
