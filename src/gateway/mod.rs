//! HTTP gateway (Axum) for the recommendation endpoint.
//!
//! This module is primarily used by the `petmatch` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use handler::recommendations_handler;
pub use state::HandlerState;

use crate::config::Config;
use crate::upstream::{MediaSource, PetDirectory};

pub fn create_router_with_state<P, M>(state: HandlerState<P, M>, config: &Config) -> Router
where
    P: PetDirectory + 'static,
    M: MediaSource + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/v1/recommendations", post(recommendations_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .with_state(state)
}

/// Builds the CORS layer from config.
///
/// A wildcard origin cannot be combined with credentials, so the wildcard
/// path never sets `allow_credentials`.
pub fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let mut layer = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    if config.cors_allow_credentials {
        layer = layer.allow_credentials(true);
    }

    layer
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub embedding: &'static str,
    pub embedder_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<P, M>(State(state): State<HandlerState<P, M>>) -> Response
where
    P: PetDirectory + 'static,
    M: MediaSource + 'static,
{
    let embedder_mode = if state.engine.is_embedder_stub() {
        "stub"
    } else {
        "real"
    };

    let components = ComponentStatus {
        http: "ready",
        embedding: "ready",
        embedder_mode,
    };

    (
        StatusCode::OK,
        Json(ReadyResponse {
            status: "ok",
            components,
        }),
    )
        .into_response()
}
