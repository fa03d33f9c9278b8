/// Document model subsystem - text storage, position mapping and edit history
///
/// `TextModel` owns the document content and every mutation goes through it so
/// the undo log, the change counter and the modified flag stay consistent.

pub mod text_model;
pub mod undo;

pub use text_model::{Position, TextModel};
pub use undo::{UndoAction, UndoGroup, UndoManager};
