//! Golden-path sources: document bookmarks and printed tables of contents.

use std::ops::Range;

use crate::model::{Bookmark, Line, TocEntry};

use super::lines::normalize_text;
use super::patterns::Patterns;
use super::OutlineConfig;

/// Lines examined for a ToC keyword at the top of a page.
const KEYWORD_WINDOW: usize = 3;

/// Deepest level a ToC entry can take.
const MAX_LEVEL: u8 = 3;

/// Convert a bookmark tree into entries.
///
/// Returns an empty vector when fewer than `min_toc_entries` bookmarks
/// resolve to a page.
pub fn entries_from_bookmarks(bookmarks: &[Bookmark], config: &OutlineConfig) -> Vec<TocEntry> {
    let mut entries: Vec<TocEntry> = bookmarks
        .iter()
        .filter_map(|b| {
            let title = normalize_text(&b.title);
            let page = b.page?;
            (!title.is_empty())
                .then(|| TocEntry::new(b.depth.saturating_add(1).min(MAX_LEVEL), title, page))
        })
        .collect();

    if entries.len() < config.min_toc_entries {
        if !bookmarks.is_empty() {
            log::debug!(
                "Only {} of {} bookmarks usable; ignoring bookmarks",
                entries.len(),
                bookmarks.len()
            );
        }
        return Vec::new();
    }

    clamp_hierarchy(&mut entries);
    entries
}

/// A ToC line before levels and physical pages are resolved.
#[derive(Debug, Clone, PartialEq)]
struct RawEntry {
    title: String,
    printed_page: u32,
    indent: f32,
    numbering_depth: Option<u8>,
}

/// Locates and parses a printed table of contents.
pub struct TocParser<'a> {
    config: &'a OutlineConfig,
    patterns: &'a Patterns,
}

impl<'a> TocParser<'a> {
    pub fn new(config: &'a OutlineConfig, patterns: &'a Patterns) -> Self {
        Self { config, patterns }
    }

    /// Find and parse the document's table of contents.
    ///
    /// `lines` must be page-ordered; `page_labels` may be empty. Returns an
    /// empty vector when no usable table of contents exists.
    pub fn parse(&self, lines: &[Line], page_count: u32, page_labels: &[String]) -> Vec<TocEntry> {
        let pages = page_ranges(lines, page_count);

        let Some((toc_pages, raw)) = self.locate(lines, &pages) else {
            return Vec::new();
        };

        if raw.len() < self.config.min_toc_entries {
            log::debug!(
                "Table of contents on page {} has only {} entries; treating as ambiguous",
                toc_pages.start + 1,
                raw.len()
            );
            return Vec::new();
        }

        let levels = self.levels(&raw);
        let offset = self.page_offset(&raw, lines, &pages, &toc_pages);

        let mut entries: Vec<TocEntry> = raw
            .iter()
            .zip(levels)
            .map(|(entry, level)| {
                let page = resolve_page(entry.printed_page, page_labels, offset, page_count);
                TocEntry::new(level, entry.title.clone(), page)
            })
            .collect();
        clamp_hierarchy(&mut entries);

        log::debug!(
            "Parsed {} table of contents entries from pages {}-{} (offset {})",
            entries.len(),
            toc_pages.start + 1,
            toc_pages.end,
            offset
        );
        entries
    }

    /// Find the start page and collect entries from it and its continuations.
    fn locate(&self, lines: &[Line], pages: &[Range<usize>]) -> Option<(Range<u32>, Vec<RawEntry>)> {
        let scan = self
            .config
            .toc_max_scan_pages
            .min(pages.len() as u32 / 5 + 3)
            .min(pages.len() as u32);

        for start in 0..scan {
            let page_lines = &lines[pages[start as usize].clone()];
            if page_lines.is_empty() {
                continue;
            }

            let keyword_headed = self.has_keyword_heading(page_lines);
            let entries = self.page_entries(page_lines, keyword_headed);
            let density = entries.len() as f32 / page_lines.len() as f32;
            let dense = density >= self.config.toc_min_density
                && entries.len() >= self.config.min_toc_entries;

            if entries.is_empty() || !(keyword_headed || dense) {
                continue;
            }
            log::debug!(
                "Table of contents starts on page {} ({})",
                start + 1,
                if keyword_headed { "keyword" } else { "entry density" }
            );

            // Continuation pages accept only leader or whitespace-run entries.
            let mut collected = entries;
            let mut end = start + 1;
            let last = (start + self.config.toc_max_pages.max(1)).min(pages.len() as u32);
            while end < last {
                let next = self.page_entries(&lines[pages[end as usize].clone()], false);
                if next.is_empty() {
                    break;
                }
                collected.extend(next);
                end += 1;
            }
            return Some((start..end, collected));
        }
        None
    }

    fn has_keyword_heading(&self, page_lines: &[Line]) -> bool {
        page_lines.iter().take(KEYWORD_WINDOW).any(|line| {
            let text = line.text.trim().trim_end_matches(':').trim().to_lowercase();
            self.config
                .toc_keywords
                .iter()
                .any(|keyword| text == keyword.to_lowercase())
        })
    }

    fn page_entries(&self, page_lines: &[Line], loose: bool) -> Vec<RawEntry> {
        page_lines
            .iter()
            .filter_map(|line| self.parse_entry(line, loose))
            .collect()
    }

    /// Parse one ToC line.
    ///
    /// Dot leaders or a whitespace run before the page number always match;
    /// a single space is accepted on keyword-headed pages.
    fn parse_entry(&self, line: &Line, loose: bool) -> Option<RawEntry> {
        let text = line.text.trim();
        let caps = self
            .patterns
            .toc_dotted
            .captures(text)
            .or_else(|| self.patterns.toc_spaced.captures(text))
            .or_else(|| loose.then(|| self.patterns.toc_loose.captures(text)).flatten())?;

        let title = self
            .patterns
            .trailing_leaders
            .replace(&caps["title"], "")
            .trim()
            .to_string();
        if !title.chars().any(char::is_alphabetic) {
            return None;
        }
        let printed_page: u32 = caps["page"].parse().ok()?;

        Some(RawEntry {
            numbering_depth: self.patterns.numbering_depth(&title),
            title,
            printed_page,
            indent: line.bbox.x0,
        })
    }

    /// Level of each entry from its indentation cluster.
    ///
    /// With a single cluster, dotted numbering depth is used instead.
    fn levels(&self, raw: &[RawEntry]) -> Vec<u8> {
        let clusters = indent_clusters(
            raw.iter().map(|e| e.indent),
            self.config.indent_cluster_tolerance,
        );

        if clusters.len() <= 1 {
            if raw.iter().any(|e| e.numbering_depth.is_some()) {
                return raw
                    .iter()
                    .map(|e| e.numbering_depth.unwrap_or(1).clamp(1, MAX_LEVEL))
                    .collect();
            }
            return vec![1; raw.len()];
        }

        raw.iter()
            .map(|e| {
                let rank = clusters
                    .iter()
                    .rposition(|&start| e.indent >= start)
                    .unwrap_or(0);
                (rank as u8 + 1).min(MAX_LEVEL)
            })
            .collect()
    }

    /// Printed-to-physical page offset voted by checking entry titles
    /// against page content.
    fn page_offset(
        &self,
        raw: &[RawEntry],
        lines: &[Line],
        pages: &[Range<usize>],
        toc_pages: &Range<u32>,
    ) -> i32 {
        let probes: Vec<(String, u32)> = raw
            .iter()
            .take(self.config.offset_probe_entries)
            .map(|e| (match_key(&e.title), e.printed_page))
            .filter(|(key, _)| !key.is_empty())
            .collect();
        if probes.is_empty() {
            return 0;
        }
        let required = probes.len().min(2);
        let page_count = pages.len() as i64;

        let mut best: Option<(usize, i32)> = None;
        for offset in -(toc_pages.start as i32)..=self.config.max_page_offset {
            let hits = probes
                .iter()
                .filter(|(key, printed)| {
                    let physical = *printed as i64 - 1 + offset as i64;
                    if physical < 0 || physical >= page_count {
                        return false;
                    }
                    let physical = physical as u32;
                    if toc_pages.contains(&physical) {
                        return false;
                    }
                    lines[pages[physical as usize].clone()]
                        .iter()
                        .any(|line| match_key(&line.text).starts_with(key.as_str()))
                })
                .count();

            let better = match best {
                None => hits > 0,
                Some((best_hits, best_offset)) => {
                    hits > best_hits
                        || (hits == best_hits && offset.abs() < best_offset.abs())
                        || (hits == best_hits
                            && offset.abs() == best_offset.abs()
                            && offset > best_offset)
                }
            };
            if better {
                best = Some((hits, offset));
            }
        }

        match best {
            Some((hits, offset)) if hits >= required => {
                log::debug!("Page offset {} confirmed by {} of {} entries", offset, hits, probes.len());
                offset
            }
            _ => 0,
        }
    }
}

/// Start value of each indentation cluster, ascending.
fn indent_clusters(indents: impl IntoIterator<Item = f32>, tolerance: f32) -> Vec<f32> {
    let mut values: Vec<f32> = indents.into_iter().filter(|v| v.is_finite()).collect();
    values.sort_by(f32::total_cmp);

    let mut starts: Vec<f32> = Vec::new();
    for value in values {
        match starts.last() {
            Some(&start) if value - start <= tolerance => {}
            _ => starts.push(value),
        }
    }
    starts
}

/// Physical page for a printed page number.
///
/// A unique page-label match wins; otherwise the detected offset applies.
fn resolve_page(printed: u32, page_labels: &[String], offset: i32, page_count: u32) -> u32 {
    let label = printed.to_string();
    let mut matches = page_labels
        .iter()
        .enumerate()
        .filter(|(_, l)| l.trim() == label);
    if let (Some((index, _)), None) = (matches.next(), matches.next()) {
        return index as u32;
    }

    let physical = printed as i64 - 1 + offset as i64;
    physical.clamp(0, page_count.saturating_sub(1) as i64) as u32
}

/// Keep levels tree-consistent: no entry is more than one level deeper than
/// its predecessor, and the first entry is a root.
pub fn clamp_hierarchy(entries: &mut [TocEntry]) {
    let mut previous = 0u8;
    for entry in entries.iter_mut() {
        entry.level = entry.level.clamp(1, previous + 1);
        previous = entry.level;
    }
}

/// Comparison key: lowercase alphanumerics, single-spaced.
fn match_key(text: &str) -> String {
    let cleaned: String = normalize_text(text)
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Index range of each page's lines within the page-ordered `lines`.
fn page_ranges(lines: &[Line], page_count: u32) -> Vec<Range<usize>> {
    let count = lines
        .iter()
        .map(|l| l.page + 1)
        .max()
        .unwrap_or(0)
        .max(page_count) as usize;

    let mut ranges = vec![0..0; count];
    let mut start = 0;
    while start < lines.len() {
        let page = lines[start].page;
        let end = start + lines[start..].iter().take_while(|l| l.page == page).count();
        ranges[page as usize] = start..end;
        start = end;
    }
    ranges
}
