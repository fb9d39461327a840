use std::sync::Arc;

use crate::recommend::RecommendationEngine;
use crate::upstream::{MediaSource, PetDirectory};

/// Shared handler state: one engine per process, cloned per request.
pub struct HandlerState<P: PetDirectory + 'static, M: MediaSource + 'static> {
    pub engine: Arc<RecommendationEngine<P, M>>,
}

impl<P: PetDirectory, M: MediaSource> Clone for HandlerState<P, M> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<P: PetDirectory, M: MediaSource> HandlerState<P, M> {
    pub fn new(engine: RecommendationEngine<P, M>) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}
