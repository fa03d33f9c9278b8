use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    Save,
    Discard,
    Cancel,
}

/// Questions the session needs a user to answer. Front ends implement this
/// with whatever dialogs they have.
pub trait Prompter {
    /// "Save changes to <name>?"
    fn confirm_save_changes(&mut self, name: &str) -> SaveChoice;

    /// "File already exists. Overwrite?"
    fn confirm_overwrite(&mut self, path: &Path) -> bool;

    /// Target for saving an untitled document; `None` cancels
    fn choose_save_path(&mut self) -> Option<PathBuf>;
}
