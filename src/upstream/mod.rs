//! Upstream collaborators: the pet directory and the media caption source.
//!
//! Both are reached over HTTP in production ([`HttpPetDirectory`],
//! [`HttpMediaSource`]) and mocked in tests. The inbound `Authorization`
//! header is forwarded verbatim to both services.

/// HTTP implementations (reqwest).
pub mod client;
mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use client::{HttpMediaSource, HttpPetDirectory};
pub use error::UpstreamError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockMediaSource, MockPetDirectory};

use async_trait::async_trait;
use serde::Deserialize;

/// A candidate profile as returned by the pet directory.
#[derive(Debug, Clone, Deserialize)]
pub struct PetStar {
    /// Directory-unique identifier used in the ranking output.
    #[serde(rename = "petNo")]
    pub pet_no: i64,
    /// SNS account id used to fetch the candidate's media captions.
    #[serde(rename = "snsId")]
    pub sns_id: String,
}

/// Lists the candidate profiles to rank for a request.
#[async_trait]
pub trait PetDirectory: Send + Sync {
    async fn list_petstars(&self, auth: Option<&str>) -> Result<Vec<PetStar>, UpstreamError>;
}

/// Fetches the raw media captions for one candidate.
///
/// Returned strings may be empty or whitespace-only; the scoring core is
/// responsible for filtering them.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn list_captions(
        &self,
        sns_id: &str,
        auth: Option<&str>,
    ) -> Result<Vec<String>, UpstreamError>;
}

#[async_trait]
impl<T: PetDirectory + ?Sized> PetDirectory for std::sync::Arc<T> {
    async fn list_petstars(&self, auth: Option<&str>) -> Result<Vec<PetStar>, UpstreamError> {
        (**self).list_petstars(auth).await
    }
}

#[async_trait]
impl<T: MediaSource + ?Sized> MediaSource for std::sync::Arc<T> {
    async fn list_captions(
        &self,
        sns_id: &str,
        auth: Option<&str>,
    ) -> Result<Vec<String>, UpstreamError> {
        (**self).list_captions(sns_id, auth).await
    }
}
