//! HTTP surface: one POST + OPTIONS route per proxy handler.

use crate::app::App;
use crate::handlers::{ChatTitle, ProjectDocumentary, ProjectLessons, ThreeDDescription};
use crate::proxy::{self, ProxyHandler};
use crate::{Error, Result};
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info};

pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
pub const ALLOWED_METHODS: &str = "POST, OPTIONS";

/// Largest accepted request body. Chat histories can run to several MB.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Converts any crate error into the `{ error, success: false }` envelope.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.0.to_string();
        error!("Request failed: {}", message);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message, "success": false })),
        )
            .into_response()
    }
}

pub fn router(app: Arc<App>) -> Router {
    Router::new()
        .route(
            "/generate-3d-description",
            post(proxy_route::<ThreeDDescription>).options(preflight),
        )
        .route(
            "/generate-chat-title",
            post(proxy_route::<ChatTitle>).options(preflight),
        )
        .route(
            "/generate-project-documentary",
            post(proxy_route::<ProjectDocumentary>).options(preflight),
        )
        .route(
            "/generate-project-lessons",
            post(proxy_route::<ProjectLessons>).options(preflight),
        )
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .with_state(app)
}

/// Serve the gateway on an already-bound listener until Ctrl-C.
pub async fn serve(listener: TcpListener, app: Arc<App>) -> Result<()> {
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn proxy_route<H: ProxyHandler>(
    State(app): State<Arc<App>>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> std::result::Result<Json<H::Response>, ApiError> {
    // Oversized or unreadable bodies still get the JSON error envelope.
    let body = body
        .map_err(|e| Error::MalformedInput(format!("Could not read request body: {}", e)))?;
    let response = proxy::execute::<H>(&app, &body).await?;
    Ok(Json(response))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
