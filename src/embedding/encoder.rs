use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;

struct SentenceEncoderImpl {
    encoder: BertModel,
    hidden_size: usize,
}

impl SentenceEncoderImpl {
    fn load(vb: VarBuilder, config: &Config) -> Result<Self> {
        let encoder = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), config)?
        } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("roberta"), config)?
        } else {
            BertModel::load(vb.clone(), config)?
        };

        Ok(Self {
            encoder,
            hidden_size: config.hidden_size,
        })
    }

    /// Runs the encoder and mean-pools token states under the attention mask.
    ///
    /// Padding positions contribute nothing to the sum; the divisor is the
    /// real token count, clamped away from zero so an all-masked row cannot
    /// divide by zero.
    fn mean_pooled(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        let hidden = self
            .encoder
            .forward(input_ids, token_type_ids, Some(attention_mask))?;

        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?.maximum(1e-9)?;
        summed.broadcast_div(&counts)
    }
}

/// BERT-family sentence encoder loaded from a safetensors directory.
#[derive(Clone)]
pub struct SentenceEncoder(std::sync::Arc<SentenceEncoderImpl>);

impl SentenceEncoder {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config_path = model_dir.join("config.json");
        let weights_path = model_dir.join("model.safetensors");

        let config_content = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        let model = SentenceEncoderImpl::load(vb, &config)?;

        Ok(Self(std::sync::Arc::new(model)))
    }

    pub fn mean_pooled(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        self.0.mean_pooled(input_ids, token_type_ids, attention_mask)
    }

    /// Hidden size of the loaded encoder (the pooled output dimension).
    pub fn hidden_size(&self) -> usize {
        self.0.hidden_size
    }
}
