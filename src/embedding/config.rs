use std::path::PathBuf;

use crate::embedding::error::EmbeddingError;

/// Default embedding dimension (hidden size of the KoSimCSE-family encoders).
pub const DEFAULT_EMBEDDING_DIM: usize = 768;

/// Default max tokens per caption before truncation.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

/// Configuration for [`CaptionEmbedder`](super::CaptionEmbedder).
#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    pub model_dir: PathBuf,
    /// Max tokens to consider per input text.
    pub max_seq_len: usize,
    /// Output embedding dimension.
    pub embedding_dim: usize,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::new(),
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            testing_stub: false,
        }
    }
}

impl EmbedderConfig {
    /// Env var used to locate the model directory.
    pub const ENV_MODEL_DIR: &'static str = "PETMATCH_MODEL_PATH";

    /// Loads config from environment variables (a missing value becomes an empty path).
    pub fn from_env() -> Self {
        let model_dir = std::env::var(Self::ENV_MODEL_DIR)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_default();

        Self {
            model_dir,
            ..Default::default()
        }
    }

    /// Creates a config for a model directory.
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.into(),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; produces deterministic embeddings).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    /// Validates required fields for non-stub mode.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.testing_stub {
            return Ok(());
        }

        if self.model_dir.as_os_str().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_dir is required (stubbing is disabled)".to_string(),
            });
        }

        if !self.model_dir.exists() {
            return Err(EmbeddingError::ModelNotFound {
                path: self.model_dir.clone(),
            });
        }

        Ok(())
    }

    /// Returns `true` if the model weights file exists.
    pub fn model_available(&self) -> bool {
        !self.model_dir.as_os_str().is_empty() && self.model_dir.join("model.safetensors").exists()
    }

    /// Returns `true` if `tokenizer.json` exists in the model directory.
    pub fn tokenizer_available(&self) -> bool {
        !self.model_dir.as_os_str().is_empty() && self.model_dir.join("tokenizer.json").exists()
    }
}
