use super::text_model::TextModel;
use tracing::trace;

/// A single recorded edit. Offsets are character offsets into the document
/// as it was when the edit was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum UndoAction {
    InsertText { offset: usize, text: String },
    DeleteText { offset: usize, text: String },
}

impl UndoAction {
    /// Apply this action to a model without recording it again
    pub fn apply_to_model(&self, model: &mut TextModel) {
        match self {
            UndoAction::InsertText { offset, text } => {
                model.raw_insert(*offset, text);
            }
            UndoAction::DeleteText { offset, text } => {
                let end = *offset + text.chars().count();
                model.raw_delete(*offset, end);
            }
        }
    }

    pub fn reverse(&self) -> UndoAction {
        match self {
            UndoAction::InsertText { offset, text } => UndoAction::DeleteText {
                offset: *offset,
                text: text.clone(),
            },
            UndoAction::DeleteText { offset, text } => UndoAction::InsertText {
                offset: *offset,
                text: text.clone(),
            },
        }
    }

    /// Cursor offset right after this action has been applied
    fn cursor_after(&self) -> usize {
        match self {
            UndoAction::InsertText { offset, text } => *offset + text.chars().count(),
            UndoAction::DeleteText { offset, .. } => *offset,
        }
    }

    fn cursor_before(&self) -> usize {
        match self {
            UndoAction::InsertText { offset, .. } => *offset,
            UndoAction::DeleteText { offset, text } => *offset + text.chars().count(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UndoGroup {
    pub actions: Vec<UndoAction>,
    pub cursor_before: usize,
    pub cursor_after: usize,
}

impl UndoGroup {
    pub fn new(cursor: usize) -> Self {
        Self {
            actions: Vec::new(),
            cursor_before: cursor,
            cursor_after: cursor,
        }
    }

    fn single(action: UndoAction) -> Self {
        Self {
            cursor_before: action.cursor_before(),
            cursor_after: action.cursor_after(),
            actions: vec![action],
        }
    }

    pub fn add_action(&mut self, action: UndoAction) {
        self.cursor_after = action.cursor_after();
        self.actions.push(action);
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Replay the group (redo)
    pub fn apply_to_model(&self, model: &mut TextModel) {
        for action in &self.actions {
            action.apply_to_model(model);
        }
    }

    /// Roll the group back (undo)
    pub fn apply_reverse_to_model(&self, model: &mut TextModel) {
        for action in self.actions.iter().rev() {
            action.reverse().apply_to_model(model);
        }
    }
}

#[derive(Debug, Clone)]
pub struct UndoManager {
    undo_stack: Vec<UndoGroup>,
    redo_stack: Vec<UndoGroup>,
    current_group: Option<UndoGroup>,
    max_undo_levels: usize,
}

impl UndoManager {
    pub fn new() -> Self {
        Self::with_capacity(1000)
    }

    pub fn with_capacity(max_undo_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            current_group: None,
            max_undo_levels: max_undo_levels.max(1),
        }
    }

    pub fn start_group(&mut self, cursor: usize) {
        if let Some(group) = self.current_group.take() {
            if !group.is_empty() {
                self.push_undo_group(group);
            }
        }
        self.current_group = Some(UndoGroup::new(cursor));
    }

    /// Record an action. Outside a group every action is its own undo step.
    pub fn add_action(&mut self, action: UndoAction) {
        // A fresh edit always invalidates the redo chain, even inside an open group
        self.redo_stack.clear();
        match self.current_group {
            Some(ref mut group) => group.add_action(action),
            None => self.push_undo_group(UndoGroup::single(action)),
        }
    }

    pub fn end_group(&mut self, cursor: usize) {
        if let Some(mut group) = self.current_group.take() {
            if !group.is_empty() {
                group.cursor_after = cursor;
                self.push_undo_group(group);
            }
        }
    }

    fn push_undo_group(&mut self, group: UndoGroup) {
        self.undo_stack.push(group);

        if self.undo_stack.len() > self.max_undo_levels {
            self.undo_stack.remove(0);
            trace!(limit = self.max_undo_levels, "dropped oldest undo group");
        }

        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
            || self
                .current_group
                .as_ref()
                .is_some_and(|group| !group.is_empty())
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo(&mut self) -> Option<UndoGroup> {
        if let Some(group) = self.current_group.take() {
            if !group.is_empty() {
                self.push_undo_group(group);
            }
        }

        let group = self.undo_stack.pop()?;
        self.redo_stack.push(group.clone());
        Some(group)
    }

    pub fn redo(&mut self) -> Option<UndoGroup> {
        let group = self.redo_stack.pop()?;
        self.undo_stack.push(group.clone());
        Some(group)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_group = None;
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new()
    }
}
