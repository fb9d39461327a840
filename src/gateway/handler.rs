use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};

use crate::gateway::error::GatewayError;
use crate::gateway::payload::{AdRequest, RecommendationResponse, ScoredPetstar};
use crate::gateway::state::HandlerState;
use crate::upstream::{MediaSource, PetDirectory};

/// Ranks petstars against the ad content and returns the top K.
///
/// The inbound `Authorization` header is forwarded verbatim to both upstream
/// services. Empty ad content is rejected rather than embedded.
#[instrument(skip(state, headers, request), fields(ad_no = tracing::field::Empty))]
pub async fn recommendations_handler<P, M>(
    State(state): State<HandlerState<P, M>>,
    headers: HeaderMap,
    Json(request): Json<AdRequest>,
) -> Result<Response, GatewayError>
where
    P: PetDirectory + 'static,
    M: MediaSource + 'static,
{
    tracing::Span::current().record("ad_no", request.ad_no);

    if request.content.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "ad content must not be empty".to_string(),
        ));
    }

    let auth = headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok());

    debug!(content_len = request.content.len(), "Processing recommendation request");

    let ranked = state.engine.recommend(&request.content, auth).await?;

    let response = RecommendationResponse {
        ad: request.ad_no,
        top_petstars: ranked
            .into_iter()
            .map(|entry| ScoredPetstar {
                pet_no: entry.pet_no,
                similarity: entry.similarity,
            })
            .collect(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}
