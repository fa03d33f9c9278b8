use super::matcher::LiteralMatcher;
use crate::document_model::TextModel;
use crate::error::Result;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Forward,
    Backward,
}

/// What to look for and how. An empty pattern disables searching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchConfig {
    pub pattern: String,
    pub case_sensitive: bool,
    pub whole_word: bool,
}

impl SearchConfig {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    pub fn whole_word(mut self, yes: bool) -> Self {
        self.whole_word = yes;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }
}

/// A match as a half-open character range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    pub start: usize,
    pub end: usize,
}

/// Result of a bulk replace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced {
    pub text: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceOutcome {
    pub replaced: bool,
    pub next: Option<SearchMatch>,
}

/// Cyclic find/replace over a `TextModel`.
///
/// The engine keeps a resume offset (the end of the last match). It is reset
/// to 0 whenever the document content is replaced wholesale.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    cursor: usize,
    epoch: Option<u64>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn find(
        &mut self,
        doc: &TextModel,
        config: &SearchConfig,
        direction: SearchDirection,
        from_offset: usize,
    ) -> Result<Option<SearchMatch>> {
        match direction {
            SearchDirection::Forward => self.find_next(doc, config),
            SearchDirection::Backward => self.find_previous(doc, config, from_offset),
        }
    }

    pub fn find_next(
        &mut self,
        doc: &TextModel,
        config: &SearchConfig,
    ) -> Result<Option<SearchMatch>> {
        if config.is_empty() {
            return Ok(None);
        }
        self.sync(doc);

        let matcher = LiteralMatcher::new(config)?;
        let text = doc.text();
        let from = doc.byte_index(self.cursor);

        let found = match matcher.find_from(text, from) {
            Some(range) => Some(range),
            None => {
                debug!(pattern = %config.pattern, "wrapping search to document start");
                matcher.find_from(text, 0)
            }
        };

        Ok(found.map(|range| {
            let found = SearchMatch {
                start: doc.char_offset(range.start),
                end: doc.char_offset(range.end),
            };
            self.cursor = found.end;
            found
        }))
    }

    /// Search backwards for the last match starting before `from_offset`,
    /// wrapping to the last match in the document.
    pub fn find_previous(
        &mut self,
        doc: &TextModel,
        config: &SearchConfig,
        from_offset: usize,
    ) -> Result<Option<SearchMatch>> {
        if config.is_empty() {
            return Ok(None);
        }
        self.sync(doc);

        let matcher = LiteralMatcher::new(config)?;
        let text = doc.text();
        let limit = doc.byte_index(from_offset.min(doc.len()));

        let found = match matcher.find_last_before(text, limit) {
            Some(range) => Some(range),
            None => {
                debug!(pattern = %config.pattern, "wrapping search to document end");
                matcher.find_last_before(text, text.len() + 1)
            }
        };

        Ok(found.map(|range| {
            let found = SearchMatch {
                start: doc.char_offset(range.start),
                end: doc.char_offset(range.end),
            };
            self.cursor = found.end;
            found
        }))
    }

    /// Replace every non-overlapping match left to right. The text is
    /// returned rather than applied so the caller decides how to commit it.
    pub fn replace_all(
        &mut self,
        doc: &TextModel,
        config: &SearchConfig,
        replacement: &str,
    ) -> Result<Replaced> {
        let text = doc.text();
        if config.is_empty() {
            return Ok(Replaced {
                text: text.to_string(),
                count: 0,
            });
        }

        let matcher = LiteralMatcher::new(config)?;
        let mut result = String::with_capacity(text.len());
        let mut count = 0;
        let mut copied = 0;

        while let Some(range) = matcher.find_from(text, copied) {
            result.push_str(&text[copied..range.start]);
            result.push_str(replacement);
            count += 1;
            copied = range.end;
        }
        result.push_str(&text[copied..]);

        self.cursor = 0;
        debug!(pattern = %config.pattern, count, "replace all");
        Ok(Replaced {
            text: result,
            count,
        })
    }

    /// Replace `selection` if it is exactly a match, then move on to the next one
    pub fn replace_current(
        &mut self,
        doc: &mut TextModel,
        config: &SearchConfig,
        selection: (usize, usize),
        replacement: &str,
    ) -> Result<ReplaceOutcome> {
        if config.is_empty() {
            return Ok(ReplaceOutcome {
                replaced: false,
                next: None,
            });
        }
        self.sync(doc);

        let (start, end) = selection;
        let mut replaced = false;
        if start < end && end <= doc.len() {
            let matcher = LiteralMatcher::new(config)?;
            let range = doc.byte_index(start)..doc.byte_index(end);
            if matcher.matches_exactly(doc.text(), range) {
                doc.replace_range(start, end, replacement)?;
                self.cursor = start + replacement.chars().count();
                replaced = true;
            }
        }

        let next = self.find_next(doc, config)?;
        Ok(ReplaceOutcome { replaced, next })
    }

    fn sync(&mut self, doc: &TextModel) {
        if self.epoch != Some(doc.epoch()) {
            self.epoch = Some(doc.epoch());
            self.cursor = 0;
        }
        self.cursor = self.cursor.min(doc.len());
    }
}
