use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tracing::debug;

use super::error::UpstreamError;
use super::{MediaSource, PetDirectory, PetStar};

#[derive(Debug, Deserialize)]
struct PetstarEnvelope {
    data: Option<Vec<PetStar>>,
}

#[derive(Debug, Deserialize)]
struct MediaEnvelope {
    data: Option<Vec<MediaItem>>,
}

#[derive(Debug, Deserialize)]
struct MediaItem {
    caption: Option<String>,
}

/// Pet directory backed by the pet-service HTTP API.
#[derive(Debug, Clone)]
pub struct HttpPetDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPetDirectory {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url.into()),
        }
    }
}

#[async_trait]
impl PetDirectory for HttpPetDirectory {
    async fn list_petstars(&self, auth: Option<&str>) -> Result<Vec<PetStar>, UpstreamError> {
        let endpoint = format!("{}/api/v1/pet-service/petstars", self.base_url);

        let mut request = self.client.get(&endpoint);
        if let Some(token) = auth {
            request = request.header(AUTHORIZATION, token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(UpstreamError::BadStatus {
                endpoint,
                status: response.status().as_u16(),
            });
        }

        let envelope: PetstarEnvelope =
            response
                .json()
                .await
                .map_err(|e| UpstreamError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        let petstars = envelope.data.unwrap_or_default();
        debug!(count = petstars.len(), "Fetched petstar directory");
        Ok(petstars)
    }
}

/// Media caption source backed by the sns-service HTTP API.
#[derive(Debug, Clone)]
pub struct HttpMediaSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMediaSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url.into()),
        }
    }
}

#[async_trait]
impl MediaSource for HttpMediaSource {
    async fn list_captions(
        &self,
        sns_id: &str,
        auth: Option<&str>,
    ) -> Result<Vec<String>, UpstreamError> {
        let endpoint = format!(
            "{}/api/v1/sns-service/instagram/medias",
            self.base_url
        );

        let mut request = self
            .client
            .get(&endpoint)
            .query(&[("instagram_id", sns_id)]);
        if let Some(token) = auth {
            request = request.header(AUTHORIZATION, token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(UpstreamError::BadStatus {
                endpoint,
                status: response.status().as_u16(),
            });
        }

        let envelope: MediaEnvelope =
            response
                .json()
                .await
                .map_err(|e| UpstreamError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        let captions: Vec<String> = envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(|media| media.caption)
            .collect();

        debug!(sns_id = sns_id, count = captions.len(), "Fetched media captions");
        Ok(captions)
    }
}

fn trim_base_url(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}
