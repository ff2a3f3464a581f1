//! Google Custom Search proxy variant: `GET /search` backed by server-side
//! credentials. No cache, no rate limiting; upstream errors pass through.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::types::{ErrorResponse, SearchParams, WebSearchPage};
use crate::{google, GoogleConfig, GoogleState, UpstreamError};

pub fn router(state: Arc<GoogleState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/search", get(search_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    let http_client = crate::upstream_client()?;
    let state = Arc::new(GoogleState::new(http_client, GoogleConfig::from_env()));

    let port = crate::listen_port();
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("google proxy listening on http://0.0.0.0:{}", port);

    axum::serve(listener, router(state)).await?;

    Ok(())
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "google-proxy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

async fn search_handler(
    State(state): State<Arc<GoogleState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<WebSearchPage>, Response> {
    let query = params.q.as_deref().unwrap_or("").trim().to_string();
    if query.is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "Missing q"));
    }

    // Checked before any outbound call.
    let Some((api_key, cx)) = state.config.credentials() else {
        error!("missing GOOGLE_API_KEY or GOOGLE_CX");
        return Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server not configured",
        ));
    };

    let start = params.start.unwrap_or(1);
    match google::web_search(&state.http_client, api_key, cx, &query, start).await {
        Ok(page) => Ok(Json(page)),
        Err(UpstreamError::Status { status, body }) => {
            warn!("upstream returned status {}", status);
            // Forward the upstream status and body verbatim.
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            Err((
                status,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response())
        }
        Err(e) => {
            error!("upstream fetch failed: {}", e);
            Err(error_response(
                StatusCode::BAD_GATEWAY,
                "Upstream fetch failed",
            ))
        }
    }
}
