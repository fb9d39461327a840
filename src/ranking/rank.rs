use std::cmp::Ordering;

use tracing::warn;

use super::aggregate::PetVector;

/// A candidate's similarity against the query, in [-1, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    pub pet_no: i64,
    pub similarity: f32,
}

/// Cosine similarity with a guarded denominator.
///
/// A zero-norm side (the zero-caption fallback vector) scores exactly 0
/// rather than NaN. For the unit vectors the pipeline produces this is a
/// plain dot product.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        warn!(
            left = a.len(),
            right = b.len(),
            "Cosine over mismatched dimensions, scoring 0"
        );
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a <= 0.0 || norm_b <= 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Scores every candidate against the query and returns the top `k`.
///
/// Sorted by similarity descending; the sort is stable, so equal scores keep
/// their original candidate order (first-seen wins). Fewer than `k`
/// candidates returns all of them; `k == 0` returns an empty list.
pub fn rank_top_k(query: &[f32], candidates: &[PetVector], k: usize) -> Vec<ScoreEntry> {
    let mut scored: Vec<ScoreEntry> = candidates
        .iter()
        .map(|candidate| ScoreEntry {
            pet_no: candidate.pet_no,
            similarity: cosine_similarity(query, &candidate.vector),
        })
        .collect();

    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });

    scored.truncate(k);
    scored
}
