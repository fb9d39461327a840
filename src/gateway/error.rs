use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::recommend::RecommendError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("candidate source unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("embedding failed: {0}")]
    EmbeddingFailed(String),
}

impl From<RecommendError> for GatewayError {
    fn from(err: RecommendError) -> Self {
        match err {
            RecommendError::CandidateListFailed(e) => {
                GatewayError::UpstreamUnavailable(e.to_string())
            }
            RecommendError::EmbeddingFailed(e) => GatewayError::EmbeddingFailed(e.to_string()),
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            GatewayError::EmbeddingFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}
