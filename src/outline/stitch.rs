//! Merge heading fragments that wrap onto several rendered lines.

use crate::model::HeadingCandidate;

use super::OutlineConfig;

/// Gap below which lines still count as adjacent when they overlap, as a
/// multiple of the font size.
const MAX_OVERLAP_RATIO: f32 = 0.5;

/// Merge runs of adjacent, identically styled candidates.
///
/// Candidates must be in document order. The merged candidate keeps the
/// first fragment's order, style and level, takes the highest score and
/// spans the union of the fragments' boxes.
pub fn stitch(candidates: Vec<HeadingCandidate>, config: &OutlineConfig) -> Vec<HeadingCandidate> {
    let before = candidates.len();
    let mut stitched: Vec<HeadingCandidate> = Vec::with_capacity(before);

    for candidate in candidates {
        match stitched.last_mut() {
            Some(head) if can_merge(head, &candidate, config) => merge_into(head, &candidate),
            _ => stitched.push(candidate),
        }
    }

    if stitched.len() != before {
        log::debug!("Stitched {} candidates into {}", before, stitched.len());
    }
    stitched
}

/// Whether `next` continues the heading `head`.
pub fn can_merge(head: &HeadingCandidate, next: &HeadingCandidate, config: &OutlineConfig) -> bool {
    let a = &head.line;
    let b = &next.line;

    if a.page != b.page || head.level != next.level {
        return false;
    }
    if !a.same_style(b, config.size_tolerance) {
        return false;
    }

    let gap = b.bbox.y0 - a.bbox.y1;
    if gap > config.stitch_gap_ratio * a.font_size || gap < -MAX_OVERLAP_RATIO * a.font_size {
        return false;
    }

    if a.text.ends_with(['.', '?', '!']) {
        return false;
    }

    let merged_len = a.text.chars().count() + 1 + b.text.chars().count();
    merged_len <= config.max_heading_chars
}

fn merge_into(head: &mut HeadingCandidate, next: &HeadingCandidate) {
    head.line.text.push(' ');
    head.line.text.push_str(&next.line.text);
    head.line.bbox = head.line.bbox.union(&next.line.bbox);
    head.score = head.score.max(next.score);
}
