//! Mock upstream collaborators (in-memory directory + caption source).

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::error::UpstreamError;
use super::{MediaSource, PetDirectory, PetStar};

/// In-memory pet directory with optional failure injection.
#[derive(Debug, Default)]
pub struct MockPetDirectory {
    petstars: Vec<PetStar>,
    fail: bool,
    recorded_auth: Mutex<Vec<Option<String>>>,
}

impl MockPetDirectory {
    pub fn new(petstars: Vec<PetStar>) -> Self {
        Self {
            petstars,
            ..Default::default()
        }
    }

    /// A directory whose listing call always fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Authorization values seen by `list_petstars`, in call order.
    pub fn recorded_auth(&self) -> Vec<Option<String>> {
        self.recorded_auth.lock().expect("auth log poisoned").clone()
    }
}

#[async_trait]
impl PetDirectory for MockPetDirectory {
    async fn list_petstars(&self, auth: Option<&str>) -> Result<Vec<PetStar>, UpstreamError> {
        self.recorded_auth
            .lock()
            .expect("auth log poisoned")
            .push(auth.map(str::to_string));

        if self.fail {
            return Err(UpstreamError::BadStatus {
                endpoint: "mock://pet-service/petstars".to_string(),
                status: 503,
            });
        }

        Ok(self.petstars.clone())
    }
}

/// In-memory caption source keyed by SNS id, with per-id failure injection.
#[derive(Debug, Default)]
pub struct MockMediaSource {
    captions: HashMap<String, Vec<String>>,
    failing_ids: HashSet<String>,
    recorded_auth: Mutex<Vec<Option<String>>>,
}

impl MockMediaSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Programs the captions returned for an SNS id.
    pub fn with_captions(mut self, sns_id: impl Into<String>, captions: &[&str]) -> Self {
        self.captions.insert(
            sns_id.into(),
            captions.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Makes caption fetches for an SNS id fail.
    pub fn with_failure(mut self, sns_id: impl Into<String>) -> Self {
        self.failing_ids.insert(sns_id.into());
        self
    }

    /// Authorization values seen by `list_captions`, in call order.
    pub fn recorded_auth(&self) -> Vec<Option<String>> {
        self.recorded_auth.lock().expect("auth log poisoned").clone()
    }
}

#[async_trait]
impl MediaSource for MockMediaSource {
    async fn list_captions(
        &self,
        sns_id: &str,
        auth: Option<&str>,
    ) -> Result<Vec<String>, UpstreamError> {
        self.recorded_auth
            .lock()
            .expect("auth log poisoned")
            .push(auth.map(str::to_string));

        if self.failing_ids.contains(sns_id) {
            return Err(UpstreamError::BadStatus {
                endpoint: format!("mock://sns-service/medias?instagram_id={sns_id}"),
                status: 500,
            });
        }

        Ok(self.captions.get(sns_id).cloned().unwrap_or_default())
    }
}
