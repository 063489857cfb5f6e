//! Compiled text patterns shared across the outline stages.

use regex::Regex;

use crate::error::{Error, Result};

/// Regexes compiled once per extractor.
#[derive(Debug, Clone)]
pub struct Patterns {
    /// Leading section numbering: "1.", "1.1", "A.", "IV.", "2)"
    pub numbering: Regex,
    /// Dotted decimal numbering with capture: "1", "1.2", "1.2.3"
    pub decimal_numbering: Regex,
    /// ToC entry with a dot leader before the page number
    pub toc_dotted: Regex,
    /// ToC entry with a whitespace run before the page number
    pub toc_spaced: Regex,
    /// ToC entry with a single space before the page number
    pub toc_loose: Regex,
    /// Leader characters trailing a ToC title
    pub trailing_leaders: Regex,
    /// Pure numbers and roman numerals
    pub numeric_only: Regex,
    /// Running page footers: "Page 3", "3 of 10", "- 3 -"
    pub page_artifact: Regex,
    /// 4+ repeated separator punctuation
    pub punctuation_run: Regex,
}

impl Patterns {
    /// Compile every pattern.
    pub fn new() -> Result<Self> {
        Ok(Self {
            numbering: compile(
                r"^(?:\d{1,2}(?:\.\d{1,2})*\.?|\d{1,2}\)|[A-Z][.)]|[IVXLC]+[.)])(?:\s|$)",
            )?,
            decimal_numbering: compile(r"^(\d{1,2}(?:\.\d{1,2})*)\.?(?:\s|$)")?,
            toc_dotted: compile(r"^(?P<title>.*?\S)\s*(?:[.·•_…]\s*){2,}(?P<page>\d{1,4})$")?,
            toc_spaced: compile(r"^(?P<title>.*?\S)\s{2,}(?P<page>\d{1,4})$")?,
            toc_loose: compile(r"^(?P<title>.*?\S)\s(?P<page>\d{1,4})$")?,
            trailing_leaders: compile(r"[\s.·•_…]+$")?,
            numeric_only: compile(
                r"^(?:\d+(?:[.,:]\d+)*|(?i:M{0,3}(?:CM|CD|D?C{0,3})(?:XC|XL|L?X{0,3})(?:IX|IV|V?I{0,3})))[.)]?$",
            )?,
            page_artifact: compile(
                r"(?i)^(?:page\s+\d+(?:\s+(?:of|/)\s+\d+)?|\d+\s+(?:of|/)\s+\d+|[-–—]\s*\d+\s*[-–—])$",
            )?,
            punctuation_run: compile(r"(?:\.{4,}|-{4,}|_{4,}|={4,}|\*{4,}|~{4,}|#{4,})")?,
        })
    }

    /// Whether the text starts with a numbering pattern.
    pub fn starts_with_numbering(&self, text: &str) -> bool {
        self.numbering.is_match(text)
    }

    /// Depth of leading dotted decimal numbering ("1.2.3 Scope" is 3).
    pub fn numbering_depth(&self, text: &str) -> Option<u8> {
        let caps = self.decimal_numbering.captures(text)?;
        let depth = caps.get(1)?.as_str().split('.').count();
        Some(depth.min(u8::MAX as usize) as u8)
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Config(format!("invalid pattern {:?}: {}", pattern, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering() {
        let p = Patterns::new().unwrap();
        for text in ["1. Introduction", "1.1 Scope", "A. Appendix", "IV. Results", "2) Setup", "3"] {
            assert!(p.starts_with_numbering(text), "{}", text);
        }
        for text in ["Introduction", "2024 Annual Report", "1.5x faster", "Am I"] {
            assert!(!p.starts_with_numbering(text), "{}", text);
        }
    }

    #[test]
    fn test_numbering_depth() {
        let p = Patterns::new().unwrap();
        assert_eq!(p.numbering_depth("1 Introduction"), Some(1));
        assert_eq!(p.numbering_depth("2.1. Scope"), Some(2));
        assert_eq!(p.numbering_depth("2.1.4 Limits"), Some(3));
        assert_eq!(p.numbering_depth("Preface"), None);
    }

    #[test]
    fn test_toc_patterns() {
        let p = Patterns::new().unwrap();
        let caps = p.toc_dotted.captures("Introduction ........ 12").unwrap();
        assert_eq!(&caps["title"], "Introduction");
        assert_eq!(&caps["page"], "12");

        let caps = p.toc_spaced.captures("Background   4").unwrap();
        assert_eq!(&caps["title"], "Background");

        assert!(p.toc_dotted.captures("Background 4").is_none());
        assert!(p.toc_loose.captures("Background 4").is_some());
    }

    #[test]
    fn test_noise_patterns() {
        let p = Patterns::new().unwrap();
        assert!(p.numeric_only.is_match("42"));
        assert!(p.numeric_only.is_match("xiv"));
        assert!(p.numeric_only.is_match("IV."));
        assert!(!p.numeric_only.is_match("civil"));
        assert!(p.page_artifact.is_match("Page 3"));
        assert!(p.page_artifact.is_match("3 of 10"));
        assert!(p.page_artifact.is_match("- 3 -"));
        assert!(!p.page_artifact.is_match("Page Layout"));
        assert!(p.punctuation_run.is_match("Results ....."));
        assert!(!p.punctuation_run.is_match("Wait..."));
    }
}
