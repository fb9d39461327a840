//! Request pipeline: fetch candidates, gather captions, aggregate, rank.

mod error;


pub use error::RecommendError;

use futures_util::future::join_all;
use tracing::{debug, info, instrument, warn};

use crate::embedding::CaptionEmbedder;
use crate::ranking::{BatchAggregator, ScoreEntry, rank_top_k};
use crate::upstream::{MediaSource, PetDirectory};

/// Ranks petstar candidates against ad content by caption similarity.
///
/// Each call is a clean single pass: nothing is cached or shared between
/// requests beyond the loaded model.
pub struct RecommendationEngine<P: PetDirectory, M: MediaSource> {
    directory: P,
    media: M,
    embedder: CaptionEmbedder,
    top_k: usize,
}

impl<P: PetDirectory, M: MediaSource> std::fmt::Debug for RecommendationEngine<P, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationEngine")
            .field("embedder", &self.embedder)
            .field("top_k", &self.top_k)
            .finish_non_exhaustive()
    }
}

impl<P: PetDirectory, M: MediaSource> RecommendationEngine<P, M> {
    pub fn new(directory: P, media: M, embedder: CaptionEmbedder, top_k: usize) -> Self {
        Self {
            directory,
            media,
            embedder,
            top_k,
        }
    }

    pub fn embedder(&self) -> &CaptionEmbedder {
        &self.embedder
    }

    pub fn is_embedder_stub(&self) -> bool {
        self.embedder.is_stub()
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Runs the full pipeline for one ad.
    ///
    /// Caption fetches fan out concurrently and fan back in before
    /// aggregation; a failed fetch degrades that candidate to zero captions
    /// instead of aborting the request. A candidate-list or embedding
    /// failure aborts the whole request.
    #[instrument(skip(self, ad_content, auth), fields(ad_len = ad_content.len()))]
    pub async fn recommend(
        &self,
        ad_content: &str,
        auth: Option<&str>,
    ) -> Result<Vec<ScoreEntry>, RecommendError> {
        let petstars = self.directory.list_petstars(auth).await?;

        if petstars.is_empty() {
            info!("No candidates in directory, returning empty ranking");
            return Ok(vec![]);
        }

        debug!(candidates = petstars.len(), "Fetching captions concurrently");

        let media = &self.media;
        let fetches: Vec<_> = petstars
            .iter()
            .map(|petstar| {
                let pet_no = petstar.pet_no;
                let sns_id = petstar.sns_id.clone();
                async move { (pet_no, media.list_captions(&sns_id, auth).await) }
            })
            .collect();

        let fetched = join_all(fetches).await;

        let candidates: Vec<(i64, Vec<String>)> = fetched
            .into_iter()
            .map(|(pet_no, result)| match result {
                Ok(captions) => (pet_no, captions),
                Err(e) => {
                    warn!(
                        pet_no = pet_no,
                        error = %e,
                        "Caption fetch failed, degrading candidate to zero captions"
                    );
                    (pet_no, Vec::new())
                }
            })
            .collect();

        let aggregator = BatchAggregator::new(&self.embedder);
        let vectors = aggregator.aggregate(&candidates)?;

        let query = self.embedder.embed(ad_content)?;
        let ranked = rank_top_k(&query, &vectors, self.top_k);

        info!(
            candidates = candidates.len(),
            returned = ranked.len(),
            best_score = ranked.first().map(|e| e.similarity),
            "Ranking complete"
        );

        Ok(ranked)
    }
}
