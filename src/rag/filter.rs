// Relevance filter: decides which retrieved chunks count as evidence
use serde::{Deserialize, Serialize};

use crate::errors::{RagError, Result};
use crate::types::{EvidenceSet, RetrievalResult};

/// Default minimum relevance a chunk must exceed
pub const DEFAULT_THRESHOLD: f32 = 0.4;

/// Strict-threshold predicate over retrieval results
///
/// A chunk is kept iff `relevance_score > threshold`. A chunk scoring
/// exactly at the threshold is dropped, so marginal matches fall back to
/// an ungrounded answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelevanceFilter {
    threshold: f32,
}

impl RelevanceFilter {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Replace the threshold; it must lie in [0, 1]
    pub fn set_threshold(&mut self, threshold: f32) -> Result<()> {
        validate_threshold(threshold)?;
        self.threshold = threshold;
        Ok(())
    }

    /// Keep chunks scoring strictly above the threshold, in input order
    pub fn filter(&self, result: RetrievalResult) -> EvidenceSet {
        let threshold = self.threshold;
        EvidenceSet::from_filtered(
            result
                .into_chunks()
                .into_iter()
                .filter(|chunk| chunk.relevance_score > threshold)
                .collect(),
        )
    }
}

/// Reject thresholds outside [0, 1], NaN included
pub fn validate_threshold(threshold: f32) -> Result<()> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(RagError::Configuration(format!(
            "threshold must be between 0.0 and 1.0, got {}",
            threshold
        )))
    }
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, ChunkMetadata};
    use quickcheck_macros::quickcheck;

    fn result_with_scores(scores: &[f32]) -> RetrievalResult {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| Chunk::new(format!("chunk {}", i), ChunkMetadata::new(format!("doc{}.md", i)), *s))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_default_threshold() {
        assert_eq!(RelevanceFilter::default().threshold(), 0.4);
    }

    #[test]
    fn test_score_at_threshold_is_excluded() {
        let evidence = RelevanceFilter::default().filter(result_with_scores(&[0.4]));
        assert!(evidence.is_empty());
    }

    #[test]
    fn test_keeps_high_scores_in_order() {
        let evidence = RelevanceFilter::default().filter(result_with_scores(&[0.91, 0.55, 0.3]));
        let scores: Vec<f32> = evidence.iter().map(|c| c.relevance_score).collect();

        assert_eq!(scores, vec![0.91, 0.55]);
        assert_eq!(evidence.chunks()[0].source(), "doc0.md");
        assert_eq!(evidence.chunks()[1].source(), "doc1.md");
    }

    #[test]
    fn test_order_preserved_when_input_unsorted() {
        let evidence = RelevanceFilter::new(0.1).filter(result_with_scores(&[0.2, 0.9, 0.5]));
        let scores: Vec<f32> = evidence.iter().map(|c| c.relevance_score).collect();
        assert_eq!(scores, vec![0.2, 0.9, 0.5]);
    }

    #[test]
    fn test_set_threshold_rejects_out_of_range() {
        let mut filter = RelevanceFilter::default();

        assert!(filter.set_threshold(f32::NAN).unwrap_err().is_configuration());
        assert!(filter.set_threshold(1.5).is_err());
        assert!(filter.set_threshold(-0.1).is_err());
        assert_eq!(filter.threshold(), 0.4);

        filter.set_threshold(0.75).unwrap();
        assert_eq!(filter.threshold(), 0.75);
    }

    #[test]
    fn test_empty_input() {
        let evidence = RelevanceFilter::default().filter(RetrievalResult::default());
        assert!(evidence.is_empty());
    }

    #[quickcheck]
    fn prop_filter_keeps_exactly_scores_above_threshold(raw: Vec<u16>, raw_threshold: u16) -> bool {
        let scores: Vec<f32> = raw.iter().map(|r| *r as f32 / u16::MAX as f32).collect();
        let threshold = raw_threshold as f32 / u16::MAX as f32;

        let evidence = RelevanceFilter::new(threshold).filter(result_with_scores(&scores));
        let kept: Vec<f32> = evidence.iter().map(|c| c.relevance_score).collect();
        let expected: Vec<f32> = scores.iter().copied().filter(|s| *s > threshold).collect();

        kept == expected && evidence.is_empty() == scores.iter().all(|s| *s <= threshold)
    }
}
