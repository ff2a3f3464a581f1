//! DuckDuckGo proxy variant: `GET /search` with rate limiting and a 60 s
//! response cache.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::rate_limit;
use crate::types::{ErrorResponse, InstantAnswer, SearchParams};
use crate::{ddg, DdgState};

pub fn router(state: Arc<DdgState>) -> Router {
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
    let state = Arc::new(DdgState::new(http_client));

    let port = crate::listen_port();
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("search proxy listening on http://0.0.0.0:{}", port);

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "search-proxy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn search_handler(
    State(state): State<Arc<DdgState>>,
    Query(params): Query<SearchParams>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
) -> Result<Json<InstantAnswer>, (StatusCode, Json<ErrorResponse>)> {
    let query = params.q.as_deref().unwrap_or("").trim().to_string();
    if query.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing q")),
        ));
    }

    let client = rate_limit::client_id(&headers, peer.map(|ConnectInfo(addr)| addr));
    if !state.limiter.check(&client) {
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse::new("Too Many Requests")),
        ));
    }

    match ddg::instant_answer(&state, &query).await {
        Ok(answer) => Ok(Json(answer)),
        Err(e) => {
            error!("upstream fetch failed: {}", e);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new("Upstream fetch failed")),
            ))
        }
    }
}
