use crate::error::{EditorError, Result};
use arboard::Clipboard;

/// Text clipboard the session copies to and pastes from
pub trait ClipboardAccess {
    /// Current clipboard text; an empty clipboard yields an empty string
    fn get_text(&mut self) -> Result<String>;

    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The system clipboard. The handle is opened on first use so a session
/// without a display only fails when the clipboard is actually touched.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut Clipboard> {
        if self.handle.is_none() {
            self.handle = Some(Clipboard::new().map_err(clipboard_error)?);
        }
        self.handle
            .as_mut()
            .ok_or_else(|| EditorError::Clipboard("unavailable".to_string()))
    }
}

impl ClipboardAccess for SystemClipboard {
    fn get_text(&mut self) -> Result<String> {
        match self.handle()?.get_text() {
            Ok(text) => Ok(text),
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(clipboard_error(e)),
        }
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.handle()?.set_text(text).map_err(clipboard_error)
    }
}

fn clipboard_error(e: arboard::Error) -> EditorError {
    EditorError::Clipboard(e.to_string())
}

/// Clipboard kept inside the process
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: String,
}

impl ClipboardAccess for MemoryClipboard {
    fn get_text(&mut self) -> Result<String> {
        Ok(self.text.clone())
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.text = text.to_string();
        Ok(())
    }
}

/// Strip characters that should not land in a document: NUL and control
/// characters other than tab and newline. `\r\n` becomes `\n`.
pub fn sanitize_paste_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .chars()
        .filter(|c| *c == '\t' || *c == '\n' || !c.is_control())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_round_trip() {
        let mut clipboard = MemoryClipboard::default();
        assert_eq!(clipboard.get_text().unwrap(), "");
        clipboard.set_text("copied").unwrap();
        assert_eq!(clipboard.get_text().unwrap(), "copied");
    }

    #[test]
    fn test_sanitize_paste_text() {
        assert_eq!(sanitize_paste_text("a\r\nb\0c\td\x07"), "a\nbc\td");
        assert_eq!(sanitize_paste_text("héllo\n"), "héllo\n");
    }
}
