use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("upstream returned status {status} for {endpoint}")]
    BadStatus { endpoint: String, status: u16 },

    #[error("malformed upstream response: {reason}")]
    MalformedResponse { reason: String },
}
