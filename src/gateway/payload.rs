use serde::{Deserialize, Serialize};

/// Inbound ad payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AdRequest {
    #[serde(rename = "adNo")]
    pub ad_no: i64,
    pub content: String,
}

/// One ranked petstar entry.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPetstar {
    pub pet_no: i64,
    pub similarity: f32,
}

/// Recommendation response for one ad.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub ad: i64,
    pub top_petstars: Vec<ScoredPetstar>,
}
