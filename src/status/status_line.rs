use crate::document_model::TextModel;
use crate::error::Result;
use std::fmt;
use std::path::Path;

/// Cursor position and document statistics for the status bar. Derived on
/// demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub line: usize,
    pub column: usize,
    pub length: usize,
    pub word_count: usize,
    pub modified: bool,
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.modified { "Modified" } else { "Ready" };
        write!(
            f,
            " {} | Line: {}, Col: {} | Length: {} | Words: {}",
            state, self.line, self.column, self.length, self.word_count
        )
    }
}

pub struct StatusProjector;

impl StatusProjector {
    pub const FALLBACK: &'static str = " Ready";

    pub fn snapshot(doc: &TextModel, cursor: usize, modified: bool) -> Result<StatusSnapshot> {
        let position = doc.position(cursor)?;
        Ok(StatusSnapshot {
            line: position.line,
            column: position.column,
            length: doc.len(),
            word_count: doc.word_count(),
            modified,
        })
    }

    /// Status bar text; an out-of-range cursor degrades to plain " Ready"
    pub fn status_line(doc: &TextModel, cursor: usize, modified: bool) -> String {
        match Self::snapshot(doc, cursor, modified) {
            Ok(snapshot) => snapshot.to_string(),
            Err(_) => Self::FALLBACK.to_string(),
        }
    }

    pub fn with_message(status: &str, message: &str) -> String {
        format!("{status} ({message})")
    }

    pub fn title(file: Option<&Path>, modified: bool) -> String {
        let name = file
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "New Document".to_string());
        let marker = if modified { " *" } else { "" };
        format!("Text Editor - {name}{marker}")
    }
}

/// Full statistics report, as shown by the word count tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentStats {
    pub characters: usize,
    pub characters_no_spaces: usize,
    pub words: usize,
    pub lines: usize,
}

impl DocumentStats {
    pub fn from_model(doc: &TextModel) -> Self {
        Self {
            characters: doc.len(),
            characters_no_spaces: doc.text().chars().filter(|c| !c.is_whitespace()).count(),
            words: doc.word_count(),
            lines: doc.line_count(),
        }
    }
}

impl fmt::Display for DocumentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Characters: {}\nCharacters (no spaces): {}\nWords: {}\nLines: {}",
            self.characters, self.characters_no_spaces, self.words, self.lines
        )
    }
}
