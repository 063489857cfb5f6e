//! Heading classification: score lines, keep those above the threshold.

use crate::model::{HeadingCandidate, HeadingLevel, Line};

use super::features::{FeatureExtractor, FeatureVector};

/// A trained model mapping a line's features to a heading probability.
///
/// Implementations must be thread-safe; one instance is shared across all
/// documents of a batch.
pub trait HeadingModel: Send + Sync {
    /// Probability in [0, 1] that the line is a heading.
    fn predict(&self, features: &FeatureVector) -> f32;
}

impl<F> HeadingModel for F
where
    F: Fn(&FeatureVector) -> f32 + Send + Sync,
{
    fn predict(&self, features: &FeatureVector) -> f32 {
        self(features)
    }
}

/// Score every line and return those at or above `threshold`, in order.
///
/// Candidates start at level H1; levels are assigned afterwards from the
/// font sizes of the accepted set.
pub fn classify(
    lines: &[Line],
    extractor: &FeatureExtractor<'_>,
    model: &dyn HeadingModel,
    threshold: f32,
) -> Vec<HeadingCandidate> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(order, line)| {
            let score = model.predict(&extractor.extract(line));
            let score = if score.is_nan() {
                0.0
            } else {
                score.clamp(0.0, 1.0)
            };
            (score >= threshold).then(|| HeadingCandidate {
                line: line.clone(),
                score,
                level: HeadingLevel::H1,
                order,
            })
        })
        .collect()
}
