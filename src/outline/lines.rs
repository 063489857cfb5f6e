//! Line model: raw reader output to normalized [`Line`] records.

use unicode_normalization::UnicodeNormalization;

use crate::model::{BBox, Line, RawDocument, RawPage};

use super::OutlineConfig;

/// Flatten a document into page-ordered, normalized lines.
pub fn build_lines(doc: &RawDocument, config: &OutlineConfig) -> Vec<Line> {
    let mut lines = Vec::with_capacity(doc.line_count());
    for page in &doc.pages {
        lines.extend(page_lines(page, config));
    }
    lines
}

/// Normalize one page.
///
/// Empty lines are dropped; the rest are ordered top to bottom, then left to
/// right.
pub fn page_lines(page: &RawPage, config: &OutlineConfig) -> Vec<Line> {
    let mut kept: Vec<Line> = page
        .lines
        .iter()
        .filter_map(|raw| {
            let text = normalize_text(&raw.text);
            if text.is_empty() {
                return None;
            }
            let bbox = BBox::new(raw.x0, raw.y0, raw.x1, raw.y1);
            Some(Line {
                text,
                page: page.index,
                font_size: raw.font_size,
                is_bold: raw.is_bold,
                font_family: font_family(&raw.font_name),
                is_centered: is_centered(&bbox, page.width, config.centered_tolerance),
                bbox,
                indentation: 0.0,
            })
        })
        .collect();

    let left_margin = kept
        .iter()
        .map(|line| line.bbox.x0)
        .fold(f32::INFINITY, f32::min);
    for line in &mut kept {
        line.indentation = line.bbox.x0 - left_margin;
    }

    kept.sort_by(|a, b| {
        a.bbox
            .y0
            .total_cmp(&b.bbox.y0)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });
    kept
}

/// NFKC-normalize (expanding ligatures) and collapse whitespace.
pub fn normalize_text(text: &str) -> String {
    let normalized: String = text.nfkc().collect();
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Font family from a base font name.
///
/// Strips a subset prefix (`ABCDEF+`) and truncates at the first `-` or `,`:
/// `"ABCDEF+Arial-BoldMT"` becomes `"Arial"`.
pub fn font_family(font_name: &str) -> String {
    let name = match font_name.split_once('+') {
        Some((prefix, rest))
            if prefix.len() == 6 && prefix.chars().all(|c| c.is_ascii_uppercase()) =>
        {
            rest
        }
        _ => font_name,
    };
    name.split(['-', ','])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn is_centered(bbox: &BBox, page_width: f32, tolerance: f32) -> bool {
    if page_width <= 0.0 {
        return false;
    }
    (bbox.mid_x() - page_width / 2.0).abs() <= tolerance * page_width
}
