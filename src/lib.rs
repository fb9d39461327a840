//! Petmatch library crate (used by the server binary and integration tests).
//!
//! # Modules
//!
//! - [`config`] - Environment-backed server configuration
//! - [`embedding`] - Caption embedder (BERT encoder or deterministic stub)
//! - [`ranking`] - Scoring core: caption batching, pooling, top-K ranking
//! - [`upstream`] - Pet directory and media caption clients
//! - [`recommend`] - Request pipeline tying the above together
//! - [`gateway`] - Axum HTTP surface
//!
//! Mock upstream implementations are available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod embedding;
pub mod gateway;
pub mod ranking;
pub mod recommend;
pub mod upstream;

pub use config::{Config, ConfigError};
pub use embedding::{
    CaptionEmbedder, DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_SEQ_LEN, EmbedderConfig, EmbeddingError,
};
pub use gateway::{HandlerState, create_router_with_state};
pub use ranking::{
    BatchAggregator, CaptionBatch, PetVector, ScoreEntry, cosine_similarity, rank_top_k,
};
pub use recommend::{RecommendError, RecommendationEngine};
pub use upstream::{
    HttpMediaSource, HttpPetDirectory, MediaSource, PetDirectory, PetStar, UpstreamError,
};

#[cfg(any(test, feature = "mock"))]
pub use upstream::{MockMediaSource, MockPetDirectory};
