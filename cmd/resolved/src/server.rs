//! HTTP surface of the resolution engine.
//!
//! API endpoints:
//! - POST /api/resolve - resolve one observation to a global identity
//! - GET  /api/stats   - outcome counters per source
//! - GET  /healthz     - liveness probe

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::info;

use trackfuse_resolve::{Observation, PrelimHint, ResolveError, Resolver};

#[derive(Clone)]
struct AppState {
    resolver: Arc<Resolver>,
}

/// Wire form of one observation.
#[derive(Debug, Deserialize)]
struct ResolveRequest {
    camera_id: String,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    face_embedding: Option<Vec<f32>>,
    #[serde(default)]
    body_embedding: Option<Vec<f32>>,
    /// Base64-encoded image, used only when `face_embedding` is absent.
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    prelim_identity_id: Option<String>,
    #[serde(default)]
    prelim_face_similarity: Option<f32>,
    #[serde(default)]
    prelim_reid_similarity: Option<f32>,
}

/// Serve the resolution API until the process is stopped.
pub async fn serve(addr: &str, resolver: Arc<Resolver>) -> Result<()> {
    let state = AppState { resolver };

    let app = Router::new()
        .route("/api/resolve", post(resolve))
        .route("/api/stats", get(stats))
        .route("/healthz", get(healthz))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = parse_addr(addr)?;
    info!(%addr, "resolved listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Parse address string to SocketAddr. `:8080` binds all interfaces.
fn parse_addr(addr: &str) -> Result<SocketAddr> {
    let addr = if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    };
    Ok(addr.parse()?)
}

async fn resolve(State(state): State<AppState>, Json(req): Json<ResolveRequest>) -> Response {
    let image = match &req.image {
        Some(b64) => match B64.decode(b64) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &format!("invalid image base64: {e}"),
                );
            }
        },
        None => None,
    };

    let prelim = req.prelim_identity_id.map(|identity_id| PrelimHint {
        identity_id,
        face_similarity: req.prelim_face_similarity,
        reid_similarity: req.prelim_reid_similarity,
    });

    let obs = Observation {
        camera_id: req.camera_id,
        timestamp: req.timestamp,
        face_embedding: req.face_embedding,
        body_embedding: req.body_embedding,
        image,
        prelim,
    };

    match state.resolver.resolve(&obs).await {
        Ok(resolution) => Json(resolution).into_response(),
        Err(e @ ResolveError::Dimension { .. }) => {
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
        Err(e @ ResolveError::Store(_)) => {
            error_response(StatusCode::BAD_GATEWAY, &e.to_string())
        }
    }
}

async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.resolver.reporter().snapshot())
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
