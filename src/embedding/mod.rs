//! Caption embedder (BERT-family encoder + tokenizer).
//!
//! Use [`EmbedderConfig::stub`] for tests/deployments without model files.

/// Embedder configuration.
pub mod config;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
/// Sentence encoder wrapper (candle BERT).
pub mod encoder;
mod error;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_SEQ_LEN, EmbedderConfig};
pub use error::EmbeddingError;

use std::sync::Arc;

use candle_core::{Device, Tensor};
use tokenizers::{PaddingParams, Tokenizer, TruncationParams};
use tracing::{debug, info, warn};

use crate::embedding::device::select_device;
use crate::embedding::encoder::SentenceEncoder;

enum EmbedderBackend {
    Model {
        encoder: SentenceEncoder,
        tokenizer: Arc<Tokenizer>,
        device: Device,
    },
    Stub {
        device: Device,
    },
}

/// Text-to-vector embedding generator (supports stub mode).
///
/// All produced vectors are f32, L2-normalized, with a fixed dimension D.
pub struct CaptionEmbedder {
    backend: EmbedderBackend,
    config: EmbedderConfig,
}

impl std::fmt::Debug for CaptionEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EmbedderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EmbedderBackend::Stub { device } => format!("Stub({:?})", device),
                },
            )
            .field("embedding_dim", &self.config.embedding_dim)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl CaptionEmbedder {
    /// Loads the embedder from a config (stub mode is supported).
    pub fn load(config: EmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let device = select_device();
        debug!(?device, "Selected compute device for caption embedder");

        if config.testing_stub {
            warn!("Caption embedder running in STUB mode (testing only)");
            return Ok(Self {
                backend: EmbedderBackend::Stub { device },
                config,
            });
        }

        if !config.model_available() || !config.tokenizer_available() {
            return Err(EmbeddingError::ModelNotFound {
                path: config.model_dir.clone(),
            });
        }

        let (encoder, tokenizer) = Self::load_model(&config, &device)?;

        info!(
            model_dir = %config.model_dir.display(),
            embedding_dim = config.embedding_dim,
            max_seq_len = config.max_seq_len,
            "Caption encoder loaded"
        );

        Ok(Self {
            backend: EmbedderBackend::Model {
                encoder,
                tokenizer: Arc::new(tokenizer),
                device,
            },
            config,
        })
    }

    fn load_model(
        config: &EmbedderConfig,
        device: &Device,
    ) -> Result<(SentenceEncoder, Tokenizer), EmbeddingError> {
        let tokenizer_path = config.model_dir.join("tokenizer.json");
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        // Batch forward needs equal-length rows: truncate to the model window,
        // pad to the longest sequence in each batch.
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_seq_len,
                ..Default::default()
            }))
            .map_err(|e| EmbeddingError::TokenizationFailed {
                reason: format!("Failed to configure truncation: {}", e),
            })?;
        tokenizer.with_padding(Some(PaddingParams::default()));

        let encoder = SentenceEncoder::load(&config.model_dir, device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load encoder: {}", e),
            }
        })?;

        if config.embedding_dim != encoder.hidden_size() {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!(
                    "embedding_dim ({}) does not match model hidden_size ({})",
                    config.embedding_dim,
                    encoder.hidden_size()
                ),
            });
        }

        Ok((encoder, tokenizer))
    }

    /// Generates an embedding for a single string.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut batch = self.embed_batch(&[text])?;
        Ok(batch.pop().unwrap_or_else(|| vec![0.0; self.config.embedding_dim]))
    }

    /// Generates embeddings for a batch of strings, preserving input order 1:1.
    ///
    /// An empty batch returns an empty result without touching the model.
    pub fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        match &self.backend {
            EmbedderBackend::Model {
                encoder,
                tokenizer,
                device,
            } => self.embed_batch_with_model(texts, encoder, tokenizer, device),
            EmbedderBackend::Stub { .. } => {
                texts.iter().map(|text| self.embed_stub(text)).collect()
            }
        }
    }

    fn embed_batch_with_model(
        &self,
        texts: &[&str],
        encoder: &SentenceEncoder,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let encodings = tokenizer.encode_batch(texts.to_vec(), true).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        // Rows are equal length after padding, so stacking yields [B, L].
        let id_rows = encodings
            .iter()
            .map(|e| Tensor::new(e.get_ids(), device))
            .collect::<Result<Vec<_>, _>>()?;
        let mask_rows = encodings
            .iter()
            .map(|e| Tensor::new(e.get_attention_mask(), device))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            batch = texts.len(),
            seq_len = encodings.first().map(|e| e.get_ids().len()).unwrap_or(0),
            "Running encoder forward pass"
        );

        let input_ids = Tensor::stack(&id_rows, 0)?;
        let attention_mask = Tensor::stack(&mask_rows, 0)?;
        let token_type_ids = input_ids.zeros_like()?;

        let pooled = encoder.mean_pooled(&input_ids, &token_type_ids, &attention_mask)?;
        let rows = pooled.to_vec2::<f32>()?;

        Ok(rows.into_iter().map(normalize_l2).collect())
    }

    fn embed_stub(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let seed = hasher.finish();

        let mut embedding = Vec::with_capacity(self.config.embedding_dim);
        let mut state = seed;

        for _ in 0..self.config.embedding_dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        Ok(normalize_l2(embedding))
    }

    /// Returns the configured output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub { .. })
    }

    /// Returns `true` if a model is loaded.
    pub fn has_model(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Model { .. })
    }

    /// Returns the embedder configuration.
    pub fn config(&self) -> &EmbedderConfig {
        &self.config
    }
}

/// L2-normalizes a vector in place; a zero vector is returned unchanged.
pub fn normalize_l2(mut vector: Vec<f32>) -> Vec<f32> {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm > 0.0 {
        for x in &mut vector {
            *x /= norm;
        }
    }

    vector
}
