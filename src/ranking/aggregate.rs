use tracing::debug;

use crate::embedding::{CaptionEmbedder, EmbeddingError, normalize_l2};

/// One candidate's pooled caption embedding.
///
/// A candidate with no valid captions carries the all-zero vector, which is
/// deliberately NOT renormalized and scores 0 against any query.
#[derive(Debug, Clone, PartialEq)]
pub struct PetVector {
    pub pet_no: i64,
    pub vector: Vec<f32>,
}

/// Flat ordered caption batch plus per-candidate spans.
///
/// Invariant: the span counts sum to the number of texts, and span order
/// matches the order candidates were pushed.
#[derive(Debug, Default)]
pub struct CaptionBatch {
    texts: Vec<String>,
    spans: Vec<(i64, usize)>,
}

impl CaptionBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a candidate's captions, dropping empty/whitespace-only entries.
    ///
    /// A candidate is always recorded, even when every caption is dropped;
    /// zero-count spans are what the aggregator turns into fallback vectors.
    pub fn push_candidate<I>(&mut self, pet_no: i64, captions: I)
    where
        I: IntoIterator<Item = String>,
    {
        let before = self.texts.len();
        self.texts.extend(
            captions
                .into_iter()
                .filter(|caption| !caption.trim().is_empty()),
        );
        self.spans.push((pet_no, self.texts.len() - before));
    }

    /// Returns `true` when no candidate contributed a valid caption.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Total number of captions in the flat batch.
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Number of candidates recorded (including zero-caption ones).
    pub fn candidate_count(&self) -> usize {
        self.spans.len()
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn spans(&self) -> &[(i64, usize)] {
        &self.spans
    }
}

/// Reduces each candidate's caption set to a single unit vector via one
/// batched embedding call.
#[derive(Debug)]
pub struct BatchAggregator<'a> {
    embedder: &'a CaptionEmbedder,
}

impl<'a> BatchAggregator<'a> {
    pub fn new(embedder: &'a CaptionEmbedder) -> Self {
        Self { embedder }
    }

    /// Embeds every caption in one backend call and mean-pools per candidate.
    ///
    /// Output preserves input order and length. Candidates without valid
    /// captions get the zero vector. A backend failure aborts the whole
    /// batch; no partial results are emitted.
    pub fn aggregate(
        &self,
        candidates: &[(i64, Vec<String>)],
    ) -> Result<Vec<PetVector>, EmbeddingError> {
        let mut batch = CaptionBatch::new();
        for (pet_no, captions) in candidates {
            batch.push_candidate(*pet_no, captions.iter().cloned());
        }

        // One backend call amortizes fixed inference overhead across the
        // whole request; an empty batch skips the call entirely.
        let embedded = if batch.is_empty() {
            debug!(
                candidates = batch.candidate_count(),
                "No valid captions, skipping embedding call"
            );
            Vec::new()
        } else {
            let texts: Vec<&str> = batch.texts().iter().map(String::as_str).collect();
            debug!(
                candidates = batch.candidate_count(),
                captions = batch.len(),
                "Embedding caption batch"
            );
            self.embedder.embed_batch(&texts)?
        };

        // Backend contract: one vector per input text, same order.
        debug_assert_eq!(embedded.len(), batch.len());

        let dim = self.embedder.embedding_dim();
        let mut vectors = Vec::with_capacity(batch.candidate_count());
        let mut cursor = 0;

        for &(pet_no, count) in batch.spans() {
            if count == 0 {
                vectors.push(PetVector {
                    pet_no,
                    vector: vec![0.0; dim],
                });
                continue;
            }

            let group = &embedded[cursor..cursor + count];
            cursor += count;

            vectors.push(PetVector {
                pet_no,
                vector: mean_pool(group, dim),
            });
        }

        Ok(vectors)
    }
}

/// Component-wise mean of unit vectors, renormalized to unit length.
///
/// The mean of unit vectors is shorter than unit length whenever they
/// disagree, so the renormalization is not optional.
fn mean_pool(vectors: &[Vec<f32>], dim: usize) -> Vec<f32> {
    let mut pooled = vec![0.0f32; dim];
    for vector in vectors {
        for (acc, component) in pooled.iter_mut().zip(vector.iter()) {
            *acc += component;
        }
    }

    let count = vectors.len() as f32;
    for component in &mut pooled {
        *component /= count;
    }

    normalize_l2(pooled)
}
