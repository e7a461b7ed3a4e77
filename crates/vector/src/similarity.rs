use crate::types::{SearchMatch, VectorRecord};

/// Keeps the denominator non-zero when either vector has zero magnitude.
const NORM_EPSILON: f32 = 1e-10;

/// Cosine similarity between two equal-length vectors
///
/// Zero-magnitude inputs score 0.0 instead of dividing by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|y| y * y).sum::<f32>().sqrt();

    dot / (norm_a * norm_b + NORM_EPSILON)
}

/// Score every record against `query` and return the `k` best matches,
/// highest similarity first
///
/// The sort is stable, so records with equal scores keep their insertion
/// order.
pub fn rank_top_k(records: &[VectorRecord], query: &[f32], k: usize) -> Vec<SearchMatch> {
    let mut scored: Vec<(usize, f32)> = records
        .iter()
        .enumerate()
        .map(|(i, record)| (i, cosine_similarity(query, &record.vector)))
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(k);

    scored
        .into_iter()
        .map(|(i, score)| {
            let record = &records[i];
            SearchMatch::new(
                record.id.clone(),
                score,
                record.content.clone(),
                record.metadata.clone(),
            )
        })
        .collect()
}
