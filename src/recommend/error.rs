use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("failed to fetch candidate list: {0}")]
    CandidateListFailed(#[from] UpstreamError),

    #[error("embedding failed: {0}")]
    EmbeddingFailed(#[from] EmbeddingError),
}
