//! Precision filter over heading candidates.

use std::fmt;

use crate::model::HeadingCandidate;

use super::patterns::Patterns;
use super::OutlineConfig;

/// Why a candidate is not heading text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    LowAlphaRatio,
    TooShort,
    TooLong,
    TooManyWords,
    Numeric,
    PageArtifact,
    PunctuationRun,
    CodeFence,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::LowAlphaRatio => "too few letters",
            Rejection::TooShort => "too short",
            Rejection::TooLong => "too long",
            Rejection::TooManyWords => "too many words",
            Rejection::Numeric => "number only",
            Rejection::PageArtifact => "page footer",
            Rejection::PunctuationRun => "punctuation run",
            Rejection::CodeFence => "code fence",
        };
        f.write_str(reason)
    }
}

/// Checks candidate text against the configured limits.
pub struct SanityFilter<'a> {
    config: &'a OutlineConfig,
    patterns: &'a Patterns,
}

impl<'a> SanityFilter<'a> {
    pub fn new(config: &'a OutlineConfig, patterns: &'a Patterns) -> Self {
        Self { config, patterns }
    }

    /// First reason the text fails, if any.
    pub fn check(&self, text: &str) -> Option<Rejection> {
        let text = text.trim();
        let chars = text.chars().count();

        if chars < self.config.min_heading_chars {
            return Some(Rejection::TooShort);
        }
        if chars > self.config.max_heading_chars {
            return Some(Rejection::TooLong);
        }
        if text.contains("```") {
            return Some(Rejection::CodeFence);
        }
        if self.patterns.numeric_only.is_match(text) {
            return Some(Rejection::Numeric);
        }
        if self.patterns.page_artifact.is_match(text) {
            return Some(Rejection::PageArtifact);
        }
        if self.patterns.punctuation_run.is_match(text) {
            return Some(Rejection::PunctuationRun);
        }
        if text.split_whitespace().count() > self.config.max_heading_words {
            return Some(Rejection::TooManyWords);
        }

        let visible = text.chars().filter(|c| !c.is_whitespace()).count();
        let letters = text.chars().filter(|c| c.is_alphabetic()).count();
        if visible == 0 || (letters as f32) < self.config.min_alpha_ratio * visible as f32 {
            return Some(Rejection::LowAlphaRatio);
        }

        None
    }

    /// Drop failing candidates, keeping order.
    ///
    /// Fails open: when every candidate would be dropped, the input is
    /// returned unchanged.
    pub fn filter(&self, candidates: Vec<HeadingCandidate>) -> Vec<HeadingCandidate> {
        let keep: Vec<bool> = candidates
            .iter()
            .map(|c| match self.check(&c.line.text) {
                Some(reason) => {
                    log::debug!("Dropping heading {:?}: {}", c.line.text, reason);
                    false
                }
                None => true,
            })
            .collect();

        if !candidates.is_empty() && !keep.iter().any(|&k| k) {
            log::debug!(
                "Sanity filter would drop all {} candidates; keeping them",
                candidates.len()
            );
            return candidates;
        }

        candidates
            .into_iter()
            .zip(keep)
            .filter_map(|(c, k)| k.then_some(c))
            .collect()
    }
}
