//! Final assembly: title selection and outline entries.

use std::collections::HashSet;

use crate::model::{HeadingCandidate, HeadingLevel, Line, OutlineEntry, RawDocument, TocEntry};

use super::OutlineConfig;

/// Metadata titles that say nothing about the document.
const PLACEHOLDER_TITLES: [&str; 5] = ["untitled", "title", "document", "no title", "(anonymous)"];

/// File extensions that mark a metadata title as a leftover file name.
const FILE_NAME_SUFFIXES: [&str; 6] = [".doc", ".docx", ".pdf", ".indd", ".ppt", ".pptx"];

/// Pick the document title.
///
/// Metadata wins when it is meaningful. Otherwise the largest-font line in
/// the upper part of the first page that is not a heading, joined with any
/// directly following lines of the same size.
pub fn select_title(
    doc: &RawDocument,
    lines: &[Line],
    headings: &HashSet<usize>,
    config: &OutlineConfig,
) -> String {
    if let Some(title) = doc.title.as_deref().and_then(meaningful_metadata_title) {
        return title;
    }

    let Some(first_page) = doc.pages.first() else {
        return String::new();
    };
    let cutoff = first_page.height * config.title_top_fraction;

    let eligible = |i: usize, line: &Line| {
        line.page == first_page.index && line.bbox.y0 < cutoff && !headings.contains(&i)
    };

    let Some((start, largest)) = lines
        .iter()
        .enumerate()
        .filter(|(i, line)| eligible(*i, line))
        .fold(None::<(usize, &Line)>, |best, (i, line)| match best {
            Some((_, b)) if b.font_size >= line.font_size => best,
            _ => Some((i, line)),
        })
    else {
        return String::new();
    };

    let max_gap = config.stitch_gap_ratio * largest.font_size;
    let mut parts = vec![largest.text.as_str()];
    let mut bottom = largest.bbox.y1;
    for (i, line) in lines.iter().enumerate().skip(start + 1) {
        let same_size = (line.font_size - largest.font_size).abs() <= config.size_tolerance;
        let adjacent = line.bbox.y0 - bottom <= max_gap;
        if !same_size || !adjacent || !eligible(i, line) {
            break;
        }
        parts.push(line.text.as_str());
        bottom = line.bbox.y1;
    }
    parts.join(" ")
}

fn meaningful_metadata_title(title: &str) -> Option<String> {
    let trimmed = title.trim();
    let lower = trimmed.to_lowercase();
    if trimmed.is_empty()
        || PLACEHOLDER_TITLES.contains(&lower.as_str())
        || lower.starts_with("microsoft word - ")
        || FILE_NAME_SUFFIXES.iter().any(|s| lower.ends_with(s))
    {
        return None;
    }
    Some(trimmed.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Outline entries from a table of contents or bookmarks, verbatim.
pub fn outline_from_toc(entries: &[TocEntry]) -> Vec<OutlineEntry> {
    entries
        .iter()
        .map(|e| OutlineEntry::new(HeadingLevel::from_depth(e.level), e.title.clone(), e.page))
        .collect()
}

/// Outline entries from classified headings, in document order.
pub fn outline_from_candidates(candidates: &[HeadingCandidate]) -> Vec<OutlineEntry> {
    let mut ordered: Vec<&HeadingCandidate> = candidates.iter().collect();
    ordered.sort_by_key(|c| c.order);
    ordered
        .into_iter()
        .map(|c| OutlineEntry::new(c.level, c.line.text.clone(), c.line.page))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, RawPage};

    fn line(text: &str, page: u32, size: f32, y0: f32) -> Line {
        Line {
            text: text.into(),
            page,
            font_size: size,
            is_bold: false,
            font_family: "Arial".into(),
            bbox: BBox::new(72.0, y0, 400.0, y0 + size),
            is_centered: true,
            indentation: 0.0,
        }
    }

    fn doc(title: Option<&str>) -> RawDocument {
        RawDocument {
            title: title.map(String::from),
            pages: vec![RawPage::letter(0), RawPage::letter(1)],
            ..RawDocument::default()
        }
    }

    fn lines() -> Vec<Line> {
        vec![
            line("Quarterly", 0, 24.0, 100.0),
            line("Business Review", 0, 24.0, 128.0),
            line("Prepared by Finance", 0, 12.0, 170.0),
            line("Huge footer art", 0, 40.0, 700.0),
            line("Chapter One", 1, 30.0, 72.0),
        ]
    }

    #[test]
    fn test_metadata_title_wins() {
        let config = OutlineConfig::default();
        let title = select_title(&doc(Some("  Real   Title ")), &lines(), &HashSet::new(), &config);
        assert_eq!(title, "Real Title");
    }

    #[test]
    fn test_placeholder_metadata_ignored() {
        let config = OutlineConfig::default();
        for placeholder in ["Untitled", "Microsoft Word - draft.docx", "scan_0001.pdf", "   "] {
            let title = select_title(&doc(Some(placeholder)), &lines(), &HashSet::new(), &config);
            assert_eq!(title, "Quarterly Business Review", "{placeholder}");
        }
    }

    #[test]
    fn test_title_skips_headings_and_lower_half() {
        let config = OutlineConfig::default();
        let headings: HashSet<usize> = [0].into_iter().collect();
        let title = select_title(&doc(None), &lines(), &headings, &config);
        assert_eq!(title, "Business Review");
    }

    #[test]
    fn test_title_extension_requires_adjacent_line_in_top_region() {
        let config = OutlineConfig::default();

        let distant = vec![
            line("Quarterly", 0, 24.0, 100.0),
            line("Revenue by Region", 0, 24.0, 250.0),
        ];
        assert_eq!(select_title(&doc(None), &distant, &HashSet::new(), &config), "Quarterly");

        // Adjacent, but the second line starts below the top half of the page.
        let straddling = vec![
            line("Quarterly", 0, 24.0, 370.0),
            line("Appendix Tables", 0, 24.0, 398.0),
        ];
        assert_eq!(select_title(&doc(None), &straddling, &HashSet::new(), &config), "Quarterly");
    }

    #[test]
    fn test_title_empty_when_nothing_eligible() {
        let config = OutlineConfig::default();
        assert_eq!(select_title(&doc(None), &[], &HashSet::new(), &config), "");
        assert_eq!(select_title(&RawDocument::new(), &lines(), &HashSet::new(), &config), "");
    }

    #[test]
    fn test_outline_from_toc_round_trip() {
        let entries = vec![
            TocEntry::new(1, "Introduction", 1),
            TocEntry::new(2, "Background", 2),
            TocEntry::new(1, "Methods", 5),
        ];
        let outline = outline_from_toc(&entries);
        assert_eq!(
            outline,
            vec![
                OutlineEntry::new(HeadingLevel::H1, "Introduction", 1),
                OutlineEntry::new(HeadingLevel::H2, "Background", 2),
                OutlineEntry::new(HeadingLevel::H1, "Methods", 5),
            ]
        );
    }

    #[test]
    fn test_outline_from_candidates_in_document_order() {
        let make = |text: &str, order: usize| HeadingCandidate {
            line: line(text, order as u32, 14.0, 72.0),
            score: 0.9,
            level: HeadingLevel::H2,
            order,
        };
        let outline = outline_from_candidates(&[make("B", 5), make("A", 2)]);
        assert_eq!(outline[0].text, "A");
        assert_eq!(outline[0].page, 2);
        assert_eq!(outline[1].text, "B");
    }
}
