//! Level assignment from the font sizes of accepted headings.

use crate::model::{HeadingCandidate, HeadingLevel};

/// Distinct font sizes, largest first.
///
/// Sizes are clustered in descending order; a size joins the current
/// cluster while it is within `tolerance` of the cluster's first (largest)
/// size.
pub fn size_buckets(sizes: impl IntoIterator<Item = f32>, tolerance: f32) -> Vec<f32> {
    let mut sorted: Vec<f32> = sizes.into_iter().filter(|s| s.is_finite()).collect();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let mut buckets: Vec<f32> = Vec::new();
    for size in sorted {
        match buckets.last() {
            Some(&head) if head - size <= tolerance => {}
            _ => buckets.push(size),
        }
    }
    buckets
}

/// Level of a font size given the document's size buckets.
///
/// The top three buckets are H1, H2 and H3. Any other size folds into the
/// nearest of them; an exact tie goes to the larger bucket.
pub fn level_for_size(size: f32, buckets: &[f32], tolerance: f32) -> HeadingLevel {
    let top = &buckets[..buckets.len().min(HeadingLevel::ALL.len())];
    if top.is_empty() {
        return HeadingLevel::H1;
    }

    if let Some(i) = top.iter().position(|&b| b - size <= tolerance && size <= b + tolerance) {
        return HeadingLevel::ALL[i];
    }

    let mut best = 0;
    for (i, &bucket) in top.iter().enumerate().skip(1) {
        if (bucket - size).abs() < (top[best] - size).abs() {
            best = i;
        }
    }
    HeadingLevel::ALL[best]
}

/// Assign levels to every candidate from the sizes of the whole set.
pub fn assign_levels(candidates: &mut [HeadingCandidate], tolerance: f32) {
    let buckets = size_buckets(candidates.iter().map(|c| c.line.font_size), tolerance);
    log::debug!("Heading size buckets: {:?}", buckets);

    for candidate in candidates.iter_mut() {
        candidate.level = level_for_size(candidate.line.font_size, &buckets, tolerance);
    }
}
