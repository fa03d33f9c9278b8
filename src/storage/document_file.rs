use crate::error::{EditorError, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Read a file as `\n`-terminated lines. Every line, including the last,
/// gets a trailing `\n`; `\r\n` terminators are normalised.
pub fn load_document(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|e| EditorError::io(path, e))?;

    let mut text = String::with_capacity(content.len() + 1);
    for line in content.lines() {
        text.push_str(line);
        text.push('\n');
    }

    info!(path = %path.display(), bytes = text.len(), "loaded document");
    Ok(text)
}

/// Write `text` verbatim, returning the number of bytes written
pub fn save_document(path: &Path, text: &str) -> Result<usize> {
    fs::write(path, text).map_err(|e| EditorError::io(path, e))?;
    info!(path = %path.display(), bytes = text.len(), "saved document");
    Ok(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_appends_newline_per_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "one\ntwo").unwrap();
        assert_eq!(load_document(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_load_normalises_crlf() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dos.txt");
        fs::write(&path, "one\r\ntwo\r\n").unwrap();
        assert_eq!(load_document(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_load_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "").unwrap();
        assert_eq!(load_document(&path).unwrap(), "");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");
        assert!(matches!(
            load_document(&path),
            Err(EditorError::Io { .. })
        ));
    }

    #[test]
    fn test_save_is_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        let bytes = save_document(&path, "no trailing newline").unwrap();
        assert_eq!(bytes, 19);
        assert_eq!(fs::read_to_string(&path).unwrap(), "no trailing newline");
    }
}
