use super::autosave::{AutoSave, SaveLatch};
use super::clipboard::{ClipboardAccess, SystemClipboard, sanitize_paste_text};
use super::prompter::{Prompter, SaveChoice};
use crate::config::RcConfig;
use crate::document_model::TextModel;
use crate::error::{EditorError, Result};
use crate::search::{ReplaceOutcome, SearchConfig, SearchDirection, SearchEngine, SearchMatch};
use crate::status::{DocumentStats, StatusProjector, StatusSnapshot};
use crate::storage::{RecentFiles, load_document, save_document};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const FLASH_DURATION: Duration = Duration::from_secs(3);
const DATE_TIME_FORMAT: &str = "%B %-d, %Y at %-I:%M:%S %p";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { path: PathBuf, bytes: usize },
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoSaveOutcome {
    Saved(PathBuf),
    NotDue,
    Skipped,
    Busy,
}

/// Everything one editor window holds: the document, where it lives on
/// disk, cursor and selection, find/replace state, the recent-files list and
/// the auto-save schedule.
pub struct Session {
    clipboard: Box<dyn ClipboardAccess>,
    model: TextModel,
    file: Option<PathBuf>,
    cursor: usize,
    selection: Option<(usize, usize)>,
    search: SearchEngine,
    search_config: SearchConfig,
    recent: RecentFiles,
    autosave: AutoSave,
    save_latch: SaveLatch,
    flash: Option<(String, Instant)>,
}

impl Session {
    pub fn new(config: &RcConfig, recent: RecentFiles) -> Self {
        Self::new_at(config, recent, Instant::now())
    }

    pub fn new_at(config: &RcConfig, recent: RecentFiles, now: Instant) -> Self {
        Self {
            clipboard: Box::new(SystemClipboard::new()),
            model: TextModel::with_undo_levels(config.undo_levels),
            file: None,
            cursor: 0,
            selection: None,
            search: SearchEngine::new(),
            search_config: SearchConfig::default()
                .case_sensitive(config.case_sensitive)
                .whole_word(config.whole_word),
            recent,
            autosave: AutoSave::new(config.autosave, config.autosave_interval(), now),
            save_latch: SaveLatch::new(),
            flash: None,
        }
    }

    pub fn with_clipboard(mut self, clipboard: impl ClipboardAccess + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    pub fn model(&self) -> &TextModel {
        &self.model
    }

    pub fn text(&self) -> &str {
        self.model.text()
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    pub fn is_modified(&self) -> bool {
        self.model.is_modified()
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.search_config
    }

    pub fn search_config_mut(&mut self) -> &mut SearchConfig {
        &mut self.search_config
    }

    pub fn recent_files(&self) -> &RecentFiles {
        &self.recent
    }

    pub fn clear_recent_files(&mut self) {
        self.recent.clear();
    }

    pub fn save_latch(&self) -> &SaveLatch {
        &self.save_latch
    }

    pub fn display_name(&self) -> String {
        self.file
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string())
    }

    // ---- cursor and editing ------------------------------------------------

    pub fn set_cursor(&mut self, offset: usize) -> Result<()> {
        if offset > self.model.len() {
            return Err(EditorError::OutOfRange {
                offset,
                len: self.model.len(),
            });
        }
        self.cursor = offset;
        self.selection = None;
        Ok(())
    }

    pub fn select(&mut self, start: usize, end: usize) -> Result<()> {
        let len = self.model.len();
        for offset in [start, end] {
            if offset > len {
                return Err(EditorError::OutOfRange { offset, len });
            }
        }
        let (start, end) = (start.min(end), start.max(end));
        self.selection = Some((start, end));
        self.cursor = end;
        Ok(())
    }

    /// Type `text` at the cursor, replacing the selection if there is one
    pub fn type_text(&mut self, text: &str) -> Result<()> {
        let start = match self.selection.take() {
            Some((start, end)) => {
                self.model.replace_range(start, end, text)?;
                start
            }
            None => {
                self.model.insert(self.cursor, text)?;
                self.cursor
            }
        };
        self.cursor = start + text.chars().count();
        Ok(())
    }

    pub fn delete_selection(&mut self) -> Result<Option<String>> {
        let Some((start, end)) = self.selection.take() else {
            return Ok(None);
        };
        let removed = self.model.delete(start, end)?;
        self.cursor = start;
        Ok(Some(removed))
    }

    pub fn select_all(&mut self) {
        let len = self.model.len();
        self.selection = Some((0, len));
        self.cursor = len;
    }

    /// Copy the selection to the clipboard, returning the number of
    /// characters copied or `None` without a selection
    pub fn copy(&mut self) -> Result<Option<usize>> {
        let Some((start, end)) = self.selection else {
            return Ok(None);
        };
        let text = self.model.slice(start, end)?;
        self.clipboard.set_text(&text)?;
        Ok(Some(end - start))
    }

    /// Copy the selection, then delete it as one undoable edit
    pub fn cut(&mut self) -> Result<Option<usize>> {
        let copied = self.copy()?;
        if copied.is_some() {
            self.delete_selection()?;
        }
        Ok(copied)
    }

    /// Type the clipboard text at the cursor, replacing any selection.
    /// Returns the number of characters pasted.
    pub fn paste(&mut self) -> Result<usize> {
        let text = sanitize_paste_text(&self.clipboard.get_text()?);
        if text.is_empty() {
            return Ok(0);
        }
        self.type_text(&text)?;
        Ok(text.chars().count())
    }

    /// Insert `now` at the cursor, e.g. "March 5, 2024 at 2:07:09 PM"
    pub fn insert_date_time(&mut self, now: NaiveDateTime) -> Result<String> {
        let stamp = format_date_time(&now);
        self.model.insert(self.cursor, &stamp)?;
        self.cursor += stamp.chars().count();
        self.selection = None;
        Ok(stamp)
    }

    pub fn undo(&mut self) -> bool {
        match self.model.undo() {
            Some(cursor) => {
                self.cursor = cursor;
                self.selection = None;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.model.redo() {
            Some(cursor) => {
                self.cursor = cursor;
                self.selection = None;
                true
            }
            None => false,
        }
    }

    /// Parse a 1-based line number and move the cursor to the start of that line
    pub fn go_to_line(&mut self, input: &str) -> Result<usize> {
        let line: usize = input
            .trim()
            .parse()
            .map_err(|_| EditorError::InvalidNumber(input.to_string()))?;
        let offset = self.model.line_start(line)?;
        self.set_cursor(offset)?;
        Ok(offset)
    }

    // ---- find / replace ----------------------------------------------------

    /// Search from the current selection and select the match. Backward
    /// searches start before the selection.
    pub fn find(&mut self, direction: SearchDirection) -> Result<Option<SearchMatch>> {
        let from = self.selection.map_or(self.cursor, |(start, _)| start);
        let found = self
            .search
            .find(&self.model, &self.search_config, direction, from)?;
        self.highlight(found);
        Ok(found)
    }

    pub fn find_next(&mut self) -> Result<Option<SearchMatch>> {
        self.find(SearchDirection::Forward)
    }

    pub fn find_previous(&mut self) -> Result<Option<SearchMatch>> {
        self.find(SearchDirection::Backward)
    }

    pub fn replace(&mut self, replacement: &str) -> Result<ReplaceOutcome> {
        let selection = self.selection.unwrap_or((self.cursor, self.cursor));
        let outcome = self.search.replace_current(
            &mut self.model,
            &self.search_config,
            selection,
            replacement,
        )?;
        if outcome.replaced {
            self.selection = None;
            self.cursor = selection.0 + replacement.chars().count();
        }
        self.highlight(outcome.next);
        Ok(outcome)
    }

    /// Replace every match; the rewrite is a single undoable edit
    pub fn replace_all(&mut self, replacement: &str) -> Result<usize> {
        let replaced = self
            .search
            .replace_all(&self.model, &self.search_config, replacement)?;
        if replaced.count > 0 {
            self.model.set_text(&replaced.text);
            self.cursor = self.cursor.min(self.model.len());
            self.selection = None;
        }
        info!(count = replaced.count, "replace all");
        Ok(replaced.count)
    }

    fn highlight(&mut self, found: Option<SearchMatch>) {
        if let Some(m) = found {
            self.selection = Some((m.start, m.end));
            self.cursor = m.end;
        }
    }

    // ---- status ------------------------------------------------------------

    pub fn status(&self) -> Result<StatusSnapshot> {
        StatusProjector::snapshot(&self.model, self.cursor, self.model.is_modified())
    }

    pub fn status_line(&self, now: Instant) -> String {
        let status =
            StatusProjector::status_line(&self.model, self.cursor, self.model.is_modified());
        match &self.flash {
            Some((message, until)) if now < *until => {
                StatusProjector::with_message(&status, message)
            }
            _ => status,
        }
    }

    pub fn flash(&mut self, message: impl Into<String>, now: Instant) {
        self.flash = Some((message.into(), now + FLASH_DURATION));
    }

    pub fn title(&self) -> String {
        StatusProjector::title(self.file.as_deref(), self.model.is_modified())
    }

    pub fn stats(&self) -> DocumentStats {
        DocumentStats::from_model(&self.model)
    }

    // ---- documents and files -----------------------------------------------

    /// Ask about unsaved changes. `true` means the caller may discard the document.
    pub fn confirm_discard(&mut self, prompter: &mut dyn Prompter) -> Result<bool> {
        if !self.model.is_modified() {
            return Ok(true);
        }

        match prompter.confirm_save_changes(&self.display_name()) {
            SaveChoice::Save => {
                self.save(prompter)?;
                Ok(!self.model.is_modified())
            }
            SaveChoice::Discard => Ok(true),
            SaveChoice::Cancel => Ok(false),
        }
    }

    pub fn new_document(&mut self, prompter: &mut dyn Prompter) -> Result<bool> {
        if !self.confirm_discard(prompter)? {
            return Ok(false);
        }
        self.replace_document(String::new(), None);
        Ok(true)
    }

    pub fn close(&mut self, prompter: &mut dyn Prompter) -> Result<bool> {
        self.new_document(prompter)
    }

    pub fn open(&mut self, path: impl AsRef<Path>, prompter: &mut dyn Prompter) -> Result<bool> {
        if !self.confirm_discard(prompter)? {
            return Ok(false);
        }
        let path = path.as_ref();
        let text = load_document(path)?;
        self.replace_document(text, Some(path.to_path_buf()));
        self.recent.add(path);
        Ok(true)
    }

    /// Open `path` at startup. A path that does not exist yet starts an empty
    /// document that the first save will create.
    pub fn open_initial(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            let text = load_document(path)?;
            self.replace_document(text, Some(path.to_path_buf()));
            self.recent.add(path);
        } else {
            info!(path = %path.display(), "new file");
            self.replace_document(String::new(), Some(path.to_path_buf()));
        }
        Ok(())
    }

    pub fn save(&mut self, prompter: &mut dyn Prompter) -> Result<SaveOutcome> {
        match self.file.clone() {
            Some(path) => {
                let bytes = self.write_to(&path)?;
                Ok(SaveOutcome::Saved { path, bytes })
            }
            None => match prompter.choose_save_path() {
                Some(path) => self.save_as(path, prompter),
                None => Ok(SaveOutcome::Cancelled),
            },
        }
    }

    pub fn save_as(
        &mut self,
        path: impl Into<PathBuf>,
        prompter: &mut dyn Prompter,
    ) -> Result<SaveOutcome> {
        let path = path.into();
        if path.exists() && !prompter.confirm_overwrite(&path) {
            return Ok(SaveOutcome::Cancelled);
        }
        let bytes = self.write_to(&path)?;
        self.recent.add(&path);
        self.file = Some(path.clone());
        Ok(SaveOutcome::Saved { path, bytes })
    }

    fn write_to(&mut self, path: &Path) -> Result<usize> {
        let _ticket = self
            .save_latch
            .try_acquire()
            .ok_or(EditorError::SaveInProgress)?;
        let bytes = save_document(path, self.model.text())?;
        self.model.mark_saved();
        Ok(bytes)
    }

    fn replace_document(&mut self, text: String, file: Option<PathBuf>) {
        self.model.load(text);
        self.file = file;
        self.cursor = 0;
        self.selection = None;
        self.search.reset();
        debug!(file = ?self.file, "document replaced");
    }

    // ---- auto-save ---------------------------------------------------------

    pub fn toggle_autosave(&mut self) -> bool {
        self.autosave.toggle()
    }

    pub fn time_until_autosave(&self, now: Instant) -> Duration {
        self.autosave.time_until_due(now)
    }

    /// Timer callback: save if due, enabled, modified and backed by a file
    pub fn autosave_tick(&mut self, now: Instant) -> Result<AutoSaveOutcome> {
        if !self.autosave.is_due(now) {
            return Ok(AutoSaveOutcome::NotDue);
        }
        self.autosave.rearm(now);

        if !self.autosave.is_enabled() || !self.model.is_modified() {
            return Ok(AutoSaveOutcome::Skipped);
        }
        let Some(path) = self.file.clone() else {
            return Ok(AutoSaveOutcome::Skipped);
        };

        match self.write_to(&path) {
            Ok(_) => {
                self.flash("Auto-saved", now);
                Ok(AutoSaveOutcome::Saved(path))
            }
            Err(EditorError::SaveInProgress) => {
                warn!("auto-save skipped, a save is already running");
                Ok(AutoSaveOutcome::Busy)
            }
            Err(e) => Err(e),
        }
    }
}

pub fn format_date_time(now: &NaiveDateTime) -> String {
    now.format(DATE_TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RcLoader;
    use crate::session::MemoryClipboard;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct ScriptedPrompter {
        save_choice: Option<SaveChoice>,
        overwrite: bool,
        save_path: Option<PathBuf>,
        asked_save_changes: Vec<String>,
    }

    impl Prompter for ScriptedPrompter {
        fn confirm_save_changes(&mut self, name: &str) -> SaveChoice {
            self.asked_save_changes.push(name.to_string());
            self.save_choice.unwrap_or(SaveChoice::Cancel)
        }

        fn confirm_overwrite(&mut self, _path: &Path) -> bool {
            self.overwrite
        }

        fn choose_save_path(&mut self) -> Option<PathBuf> {
            self.save_path.clone()
        }
    }

    fn session() -> Session {
        Session::new(&RcConfig::default(), RecentFiles::in_memory())
            .with_clipboard(MemoryClipboard::default())
    }

    #[test]
    fn test_typing_and_status() {
        let mut s = session();
        s.type_text("hello\nworld").unwrap();
        assert_eq!(s.cursor(), 11);
        assert!(s.is_modified());
        s.set_cursor(7).unwrap();
        let status = s.status().unwrap();
        assert_eq!((status.line, status.column), (2, 2));
        assert_eq!(
            s.status_line(Instant::now()),
            " Modified | Line: 2, Col: 2 | Length: 11 | Words: 2"
        );
    }

    #[test]
    fn test_set_cursor_out_of_range() {
        let mut s = session();
        s.type_text("abc").unwrap();
        assert!(matches!(
            s.set_cursor(4),
            Err(EditorError::OutOfRange { offset: 4, len: 3 })
        ));
        assert_eq!(s.cursor(), 3);
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut s = session();
        s.type_text("the cat sat").unwrap();
        s.select(4, 7).unwrap();
        s.type_text("dog").unwrap();
        assert_eq!(s.text(), "the dog sat");
        assert_eq!(s.cursor(), 7);
        assert_eq!(s.selection(), None);
    }

    #[test]
    fn test_undo_redo_restore_cursor() {
        let mut s = session();
        s.type_text("abc").unwrap();
        s.type_text("def").unwrap();
        assert!(s.undo());
        assert_eq!(s.text(), "abc");
        assert_eq!(s.cursor(), 3);
        assert!(s.redo());
        assert_eq!(s.text(), "abcdef");
        assert_eq!(s.cursor(), 6);
    }

    #[test]
    fn test_go_to_line() {
        let mut s = session();
        s.type_text("one\ntwo\nthree").unwrap();
        assert_eq!(s.go_to_line(" 2 ").unwrap(), 4);
        assert_eq!(s.cursor(), 4);
        assert!(matches!(
            s.go_to_line("abc"),
            Err(EditorError::InvalidNumber(_))
        ));
        assert!(matches!(
            s.go_to_line("9"),
            Err(EditorError::InvalidLineNumber(9))
        ));
        assert!(matches!(
            s.go_to_line("0"),
            Err(EditorError::InvalidLineNumber(0))
        ));
        assert_eq!(s.cursor(), 4);
    }

    #[test]
    fn test_find_selects_and_cycles() {
        let mut s = session();
        s.type_text("abc xyz ABC").unwrap();
        s.set_cursor(0).unwrap();
        s.search_config_mut().pattern = "abc".to_string();

        let first = s.find_next().unwrap().unwrap();
        assert_eq!((first.start, first.end), (0, 3));
        assert_eq!(s.selection(), Some((0, 3)));
        let second = s.find_next().unwrap().unwrap();
        assert_eq!((second.start, second.end), (8, 11));

        let back = s.find_previous().unwrap().unwrap();
        assert_eq!((back.start, back.end), (0, 3));
    }

    #[test]
    fn test_find_previous_whole_word() {
        let mut s = session();
        s.type_text("cat concat cat_x cat").unwrap();
        s.search_config_mut().pattern = "cat".to_string();
        s.search_config_mut().whole_word = true;

        let last = s.find_previous().unwrap().unwrap();
        assert_eq!((last.start, last.end), (17, 20));
        // "cat_x" and "concat" are skipped
        let first = s.find_previous().unwrap().unwrap();
        assert_eq!((first.start, first.end), (0, 3));
        let wrapped = s.find_previous().unwrap().unwrap();
        assert_eq!((wrapped.start, wrapped.end), (17, 20));
    }

    #[test]
    fn test_find_not_found_keeps_selection() {
        let mut s = session();
        s.type_text("abc").unwrap();
        s.search_config_mut().pattern = "zzz".to_string();
        assert_eq!(s.find_next().unwrap(), None);
        assert_eq!(s.selection(), None);
        assert_eq!(s.cursor(), 3);
    }

    #[test]
    fn test_replace_then_next() {
        let mut s = session();
        s.type_text("red red").unwrap();
        s.search_config_mut().pattern = "red".to_string();
        s.find_next().unwrap();

        let outcome = s.replace("blue").unwrap();
        assert!(outcome.replaced);
        assert_eq!(s.text(), "blue red");
        assert_eq!(s.selection(), Some((5, 8)));
    }

    #[test]
    fn test_replace_all_is_one_undo_step() {
        let mut s = session();
        s.type_text("aaa").unwrap();
        s.search_config_mut().pattern = "aa".to_string();
        assert_eq!(s.replace_all("a").unwrap(), 1);
        assert_eq!(s.text(), "aa");

        assert!(s.undo());
        assert_eq!(s.text(), "aaa");
    }

    #[test]
    fn test_replace_all_without_matches_leaves_document() {
        let mut s = session();
        s.type_text("abc").unwrap();
        let revision = s.model().revision();
        s.search_config_mut().pattern = "zzz".to_string();
        assert_eq!(s.replace_all("y").unwrap(), 0);
        assert_eq!(s.model().revision(), revision);
    }

    #[test]
    fn test_open_and_save_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.txt");
        fs::write(&path, "first\nsecond").unwrap();

        let mut s = session();
        let mut prompter = ScriptedPrompter::default();
        assert!(s.open(&path, &mut prompter).unwrap());
        assert_eq!(s.text(), "first\nsecond\n");
        assert!(!s.is_modified());
        assert_eq!(s.title(), "Text Editor - doc.txt");
        assert_eq!(s.recent_files().len(), 1);

        s.set_cursor(0).unwrap();
        s.type_text("> ").unwrap();
        assert_eq!(s.title(), "Text Editor - doc.txt *");

        let outcome = s.save(&mut prompter).unwrap();
        assert_eq!(
            outcome,
            SaveOutcome::Saved {
                path: path.clone(),
                bytes: 15
            }
        );
        assert!(!s.is_modified());
        assert_eq!(fs::read_to_string(&path).unwrap(), "> first\nsecond\n");
    }

    #[test]
    fn test_open_missing_file_keeps_document() {
        let dir = TempDir::new().unwrap();
        let mut s = session();
        s.type_text("keep me").unwrap();
        let mut prompter = ScriptedPrompter {
            save_choice: Some(SaveChoice::Discard),
            ..Default::default()
        };

        let result = s.open(dir.path().join("nope.txt"), &mut prompter);
        assert!(matches!(result, Err(EditorError::Io { .. })));
        assert_eq!(s.text(), "keep me");
        assert!(s.is_modified());
    }

    #[test]
    fn test_open_initial_missing_file_binds_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("later.txt");
        let mut s = session();
        s.open_initial(&path).unwrap();
        assert_eq!(s.text(), "");
        assert_eq!(s.file(), Some(path.as_path()));
        assert!(s.recent_files().is_empty());

        s.type_text("hi").unwrap();
        let mut prompter = ScriptedPrompter::default();
        s.save(&mut prompter).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hi");
    }

    #[test]
    fn test_new_document_cancelled() {
        let mut s = session();
        s.type_text("draft").unwrap();
        let mut prompter = ScriptedPrompter::default();
        assert!(!s.new_document(&mut prompter).unwrap());
        assert_eq!(s.text(), "draft");
        assert_eq!(prompter.asked_save_changes, vec!["Untitled".to_string()]);
    }

    #[test]
    fn test_new_document_discards_history() {
        let mut s = session();
        s.type_text("draft").unwrap();
        let mut prompter = ScriptedPrompter {
            save_choice: Some(SaveChoice::Discard),
            ..Default::default()
        };
        assert!(s.new_document(&mut prompter).unwrap());
        assert_eq!(s.text(), "");
        assert!(!s.is_modified());
        assert!(!s.undo());
        assert_eq!(s.title(), "Text Editor - New Document");
    }

    #[test]
    fn test_untitled_save_asks_for_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.txt");
        let mut s = session();
        s.type_text("content").unwrap();
        let mut prompter = ScriptedPrompter {
            save_choice: Some(SaveChoice::Save),
            save_path: Some(path.clone()),
            ..Default::default()
        };

        assert!(s.close(&mut prompter).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
        assert_eq!(s.text(), "");
    }

    #[test]
    fn test_untitled_save_cancelled_blocks_close() {
        let mut s = session();
        s.type_text("content").unwrap();
        let mut prompter = ScriptedPrompter {
            save_choice: Some(SaveChoice::Save),
            save_path: None,
            ..Default::default()
        };
        assert!(!s.close(&mut prompter).unwrap());
        assert_eq!(s.text(), "content");
    }

    #[test]
    fn test_save_as_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exists.txt");
        fs::write(&path, "original").unwrap();

        let mut s = session();
        s.type_text("new").unwrap();
        let mut prompter = ScriptedPrompter::default();
        assert_eq!(
            s.save_as(&path, &mut prompter).unwrap(),
            SaveOutcome::Cancelled
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
        assert!(s.file().is_none());

        prompter.overwrite = true;
        s.save_as(&path, &mut prompter).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(s.file(), Some(path.as_path()));
    }

    #[test]
    fn test_save_while_busy() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("busy.txt");
        let mut s = session();
        s.type_text("x").unwrap();

        let ticket = s.save_latch().try_acquire().unwrap();
        let mut prompter = ScriptedPrompter::default();
        assert!(matches!(
            s.save_as(&path, &mut prompter),
            Err(EditorError::SaveInProgress)
        ));
        assert!(s.is_modified());
        drop(ticket);
        assert!(s.save_as(&path, &mut prompter).is_ok());
    }

    #[test]
    fn test_autosave_tick() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("auto.txt");
        let start = Instant::now();
        let mut s = Session::new_at(&RcConfig::default(), RecentFiles::in_memory(), start);
        let mut prompter = ScriptedPrompter::default();

        s.type_text("v1").unwrap();
        let due = start + Duration::from_secs(30);
        // no backing file yet
        assert_eq!(s.autosave_tick(due).unwrap(), AutoSaveOutcome::Skipped);

        s.save_as(&path, &mut prompter).unwrap();
        s.type_text(" v2").unwrap();
        assert_eq!(
            s.autosave_tick(due + Duration::from_secs(1)).unwrap(),
            AutoSaveOutcome::NotDue
        );

        let next = due + Duration::from_secs(30);
        assert_eq!(
            s.autosave_tick(next).unwrap(),
            AutoSaveOutcome::Saved(path.clone())
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "v1 v2");
        assert!(!s.is_modified());
        assert!(s.status_line(next).ends_with(" (Auto-saved)"));
        assert!(!s.status_line(next + Duration::from_secs(4)).contains("Auto-saved"));
    }

    #[test]
    fn test_autosave_disabled_or_busy() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("auto.txt");
        let start = Instant::now();
        let mut s = Session::new_at(&RcConfig::default(), RecentFiles::in_memory(), start);
        let mut prompter = ScriptedPrompter::default();
        s.save_as(&path, &mut prompter).unwrap();
        s.type_text("changed").unwrap();

        let ticket = s.save_latch().try_acquire().unwrap();
        let due = start + Duration::from_secs(30);
        assert_eq!(s.autosave_tick(due).unwrap(), AutoSaveOutcome::Busy);
        drop(ticket);

        assert!(!s.toggle_autosave());
        let later = due + Duration::from_secs(30);
        assert_eq!(s.autosave_tick(later).unwrap(), AutoSaveOutcome::Skipped);
        assert!(s.is_modified());
    }

    #[test]
    fn test_select_all_copy_paste() {
        let mut s = session();
        s.type_text("abc").unwrap();
        assert_eq!(s.copy().unwrap(), None);

        s.select_all();
        assert_eq!(s.selection(), Some((0, 3)));
        assert_eq!(s.copy().unwrap(), Some(3));
        assert_eq!(s.text(), "abc");

        s.set_cursor(3).unwrap();
        assert_eq!(s.paste().unwrap(), 3);
        assert_eq!(s.text(), "abcabc");
        assert_eq!(s.cursor(), 6);
    }

    #[test]
    fn test_cut_and_paste_are_undoable() {
        let mut s = session();
        s.type_text("hello world").unwrap();
        s.select(5, 11).unwrap();
        assert_eq!(s.cut().unwrap(), Some(6));
        assert_eq!(s.text(), "hello");
        assert_eq!(s.cursor(), 5);

        s.set_cursor(0).unwrap();
        assert_eq!(s.paste().unwrap(), 6);
        assert_eq!(s.text(), " worldhello");

        assert!(s.undo());
        assert_eq!(s.text(), "hello");
        assert!(s.undo());
        assert_eq!(s.text(), "hello world");
    }

    #[test]
    fn test_paste_replaces_selection() {
        let mut s = session();
        s.type_text("one two").unwrap();
        s.select(0, 3).unwrap();
        s.copy().unwrap();
        s.select(4, 7).unwrap();
        s.paste().unwrap();
        assert_eq!(s.text(), "one one");
        assert!(s.undo());
        assert_eq!(s.text(), "one two");
    }

    #[test]
    fn test_paste_empty_clipboard() {
        let mut s = session();
        s.type_text("x").unwrap();
        let revision = s.model().revision();
        assert_eq!(s.paste().unwrap(), 0);
        assert_eq!(s.model().revision(), revision);
    }

    #[test]
    fn test_insert_date_time() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 9)
            .unwrap();
        assert_eq!(format_date_time(&now), "March 5, 2024 at 2:07:09 PM");

        let mut s = session();
        s.type_text("Date: ").unwrap();
        let stamp = s.insert_date_time(now).unwrap();
        assert_eq!(s.text(), format!("Date: {stamp}"));
        assert_eq!(s.cursor(), s.model().len());
        assert!(s.undo());
        assert_eq!(s.text(), "Date: ");
    }

    #[test]
    fn test_undo_levels_from_rc_file() {
        let dir = TempDir::new().unwrap();
        let rc = dir.path().join(".plainpadrc");
        fs::write(&rc, "set undolevels=2\n").unwrap();
        let config = RcLoader::load_from(&rc);
        assert_eq!(config.undo_levels, 2);

        let mut s = Session::new(&config, RecentFiles::in_memory());
        s.type_text("a").unwrap();
        s.type_text("b").unwrap();
        s.type_text("c").unwrap();
        assert!(s.undo());
        assert!(s.undo());
        assert!(!s.undo());
        assert_eq!(s.text(), "a");
    }

    #[test]
    fn test_search_options_from_config() {
        let config = RcConfig {
            case_sensitive: true,
            whole_word: true,
            ..RcConfig::default()
        };
        let s = Session::new(&config, RecentFiles::in_memory());
        assert!(s.search_config().case_sensitive);
        assert!(s.search_config().whole_word);
    }
}
