use super::undo::{UndoAction, UndoManager};
use crate::error::{EditorError, Result};
use tracing::debug;

/// A 1-based line/column pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// The document text plus its edit history.
///
/// All offsets are character offsets (Unicode scalar values). Line
/// terminators are `\n`.
#[derive(Debug, Clone)]
pub struct TextModel {
    text: String,
    char_len: usize,
    /// Change-sequence counter, bumped on every mutation including undo/redo
    revision: u64,
    /// Bumped whenever the content is replaced wholesale
    epoch: u64,
    modified: bool,
    undo_manager: UndoManager,
}

impl TextModel {
    pub fn new() -> Self {
        Self::with_undo_levels(1000)
    }

    pub fn with_undo_levels(levels: usize) -> Self {
        Self {
            text: String::new(),
            char_len: 0,
            revision: 0,
            epoch: 0,
            modified: false,
            undo_manager: UndoManager::with_capacity(levels),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        let mut model = Self::new();
        model.load(text);
        model
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Replace the document with freshly loaded content. History is discarded.
    pub fn load(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.char_len = self.text.chars().count();
        self.undo_manager.clear();
        self.modified = false;
        self.revision += 1;
        self.epoch += 1;
        debug!(chars = self.char_len, epoch = self.epoch, "document loaded");
    }

    /// Replace all content as a single undoable edit
    pub fn set_text(&mut self, text: &str) {
        let old = self.text.clone();
        self.undo_manager.start_group(0);
        if !old.is_empty() {
            self.record(UndoAction::DeleteText {
                offset: 0,
                text: old,
            });
        }
        if !text.is_empty() {
            self.record(UndoAction::InsertText {
                offset: 0,
                text: text.to_string(),
            });
        }
        self.undo_manager.end_group(text.chars().count());
        self.epoch += 1;
    }

    pub fn insert(&mut self, offset: usize, text: &str) -> Result<()> {
        self.check_offset(offset)?;
        if text.is_empty() {
            return Ok(());
        }
        self.record(UndoAction::InsertText {
            offset,
            text: text.to_string(),
        });
        Ok(())
    }

    /// Remove `start..end`, returning the removed text
    pub fn delete(&mut self, start: usize, end: usize) -> Result<String> {
        let (start, end) = self.check_range(start, end)?;
        let removed = self.slice(start, end)?;
        if !removed.is_empty() {
            self.record(UndoAction::DeleteText {
                offset: start,
                text: removed.clone(),
            });
        }
        Ok(removed)
    }

    pub fn replace_range(&mut self, start: usize, end: usize, text: &str) -> Result<()> {
        let (start, end) = self.check_range(start, end)?;
        self.undo_manager.start_group(start);
        let removed = self.slice(start, end)?;
        if !removed.is_empty() {
            self.record(UndoAction::DeleteText {
                offset: start,
                text: removed,
            });
        }
        if !text.is_empty() {
            self.record(UndoAction::InsertText {
                offset: start,
                text: text.to_string(),
            });
        }
        self.undo_manager.end_group(start + text.chars().count());
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.undo_manager.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo_manager.can_redo()
    }

    /// Undo the last edit step, returning where the cursor belongs
    pub fn undo(&mut self) -> Option<usize> {
        let group = self.undo_manager.undo()?;
        group.apply_reverse_to_model(self);
        self.touch();
        Some(group.cursor_before.min(self.char_len))
    }

    pub fn redo(&mut self) -> Option<usize> {
        let group = self.undo_manager.redo()?;
        group.apply_to_model(self);
        self.touch();
        Some(group.cursor_after.min(self.char_len))
    }

    pub fn slice(&self, start: usize, end: usize) -> Result<String> {
        let (start, end) = self.check_range(start, end)?;
        let from = self.byte_index(start);
        let to = self.byte_index(end);
        Ok(self.text[from..to].to_string())
    }

    /// 1-based line containing `offset`
    pub fn line_of(&self, offset: usize) -> Result<usize> {
        self.check_offset(offset)?;
        let byte = self.byte_index(offset);
        Ok(self.text[..byte].matches('\n').count() + 1)
    }

    /// 1-based column of `offset` within its line
    pub fn column_of(&self, offset: usize) -> Result<usize> {
        self.check_offset(offset)?;
        let byte = self.byte_index(offset);
        let line_start = self.text[..byte].rfind('\n').map_or(0, |pos| pos + 1);
        Ok(self.text[line_start..byte].chars().count() + 1)
    }

    pub fn position(&self, offset: usize) -> Result<Position> {
        Ok(Position::new(self.line_of(offset)?, self.column_of(offset)?))
    }

    /// Offset of the first character of a 1-based line
    pub fn line_start(&self, line: usize) -> Result<usize> {
        if line == 0 || line > self.line_count() {
            return Err(EditorError::InvalidLineNumber(line));
        }
        if line == 1 {
            return Ok(0);
        }

        let mut seen = 0;
        for (offset, ch) in self.text.chars().enumerate() {
            if ch == '\n' {
                seen += 1;
                if seen == line - 1 {
                    return Ok(offset + 1);
                }
            }
        }
        Err(EditorError::InvalidLineNumber(line))
    }

    pub fn line_count(&self) -> usize {
        self.text.matches('\n').count() + 1
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    pub(crate) fn raw_insert(&mut self, offset: usize, text: &str) {
        let offset = offset.min(self.char_len);
        let byte = self.byte_index(offset);
        self.text.insert_str(byte, text);
        self.char_len += text.chars().count();
    }

    pub(crate) fn raw_delete(&mut self, start: usize, end: usize) {
        let end = end.min(self.char_len);
        let start = start.min(end);
        let from = self.byte_index(start);
        let to = self.byte_index(end);
        self.text.replace_range(from..to, "");
        self.char_len -= end - start;
    }

    fn record(&mut self, action: UndoAction) {
        action.apply_to_model(self);
        self.undo_manager.add_action(action);
        self.touch();
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.modified = true;
    }

    fn check_offset(&self, offset: usize) -> Result<()> {
        if offset > self.char_len {
            return Err(EditorError::OutOfRange {
                offset,
                len: self.char_len,
            });
        }
        Ok(())
    }

    fn check_range(&self, start: usize, end: usize) -> Result<(usize, usize)> {
        self.check_offset(start)?;
        self.check_offset(end)?;
        Ok((start.min(end), start.max(end)))
    }

    /// Byte index of a character offset; `offset` must already be in range
    pub(crate) fn byte_index(&self, offset: usize) -> usize {
        if offset >= self.char_len {
            return self.text.len();
        }
        self.text
            .char_indices()
            .nth(offset)
            .map_or(self.text.len(), |(byte, _)| byte)
    }

    /// Character offset of a byte index that lies on a char boundary
    pub(crate) fn char_offset(&self, byte: usize) -> usize {
        self.text[..byte.min(self.text.len())].chars().count()
    }
}

impl Default for TextModel {
    fn default() -> Self {
        Self::new()
    }
}
