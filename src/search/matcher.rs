use super::search_engine::SearchConfig;
use crate::error::{EditorError, Result};
use regex::{Regex, RegexBuilder};
use std::ops::Range;

/// Literal substring matcher. User text is always escaped, so it is never
/// interpreted as a pattern language.
#[derive(Debug, Clone)]
pub struct LiteralMatcher {
    regex: Regex,
    whole_word: bool,
}

impl LiteralMatcher {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let escaped = regex::escape(&config.pattern);
        let regex = RegexBuilder::new(&escaped)
            .case_insensitive(!config.case_sensitive)
            .build()
            .map_err(|e| EditorError::InvalidPattern(e.to_string()))?;

        Ok(Self {
            regex,
            whole_word: config.whole_word,
        })
    }

    /// First acceptable match starting at or after byte `start`
    pub fn find_from(&self, haystack: &str, start: usize) -> Option<Range<usize>> {
        let mut pos = start;
        while pos <= haystack.len() {
            let found = self.regex.find_at(haystack, pos)?;
            if !self.whole_word || is_whole_word(haystack, found.start(), found.end()) {
                return Some(found.range());
            }
            // Rejected candidates may overlap a valid one, so step a single char
            pos = found.start() + char_len_at(haystack, found.start());
        }
        None
    }

    /// Last acceptable match whose start lies strictly before byte `limit`
    pub fn find_last_before(&self, haystack: &str, limit: usize) -> Option<Range<usize>> {
        let mut last = None;
        let mut pos = 0;
        while let Some(range) = self.find_from(haystack, pos) {
            if range.start >= limit {
                break;
            }
            pos = range.start + char_len_at(haystack, range.start);
            last = Some(range);
        }
        last
    }

    /// Whether `range` is exactly one acceptable match inside `haystack`
    pub fn matches_exactly(&self, haystack: &str, range: Range<usize>) -> bool {
        if range.start > haystack.len() || !haystack.is_char_boundary(range.start) {
            return false;
        }
        self.find_from(haystack, range.start) == Some(range)
    }
}

pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_whole_word(haystack: &str, start: usize, end: usize) -> bool {
    let before_ok = haystack[..start]
        .chars()
        .next_back()
        .is_none_or(|c| !is_word_char(c));
    let after_ok = haystack[end..]
        .chars()
        .next()
        .is_none_or(|c| !is_word_char(c));
    before_ok && after_ok
}

fn char_len_at(haystack: &str, byte: usize) -> usize {
    haystack[byte..].chars().next().map_or(1, char::len_utf8)
}
