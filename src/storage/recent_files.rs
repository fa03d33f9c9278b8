use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const MAX_RECENT_FILES: usize = 10;
const RECENT_FILE_NAME: &str = "recent.txt";

/// Most-recent-first list of opened/saved files, persisted one path per line.
#[derive(Debug, Clone, Default)]
pub struct RecentFiles {
    entries: VecDeque<PathBuf>,
    storage: Option<PathBuf>,
}

impl RecentFiles {
    /// A list that is never written to disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Default location: `<config_dir>/plainpad/recent.txt`
    pub fn default_storage() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("plainpad").join(RECENT_FILE_NAME))
    }

    /// Load the list from `storage`. Entries whose file no longer exists are
    /// dropped; a missing or unreadable list starts empty.
    pub fn load(storage: impl Into<PathBuf>) -> Self {
        let storage = storage.into();
        let mut recent = Self {
            entries: VecDeque::new(),
            storage: Some(storage.clone()),
        };

        match fs::read_to_string(&storage) {
            Ok(content) => {
                for line in content.lines() {
                    if recent.entries.len() >= MAX_RECENT_FILES {
                        break;
                    }
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let path = PathBuf::from(line);
                    if path.exists() && !recent.entries.contains(&path) {
                        recent.entries.push_back(path);
                    }
                }
                debug!(count = recent.entries.len(), "loaded recent files");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %storage.display(), error = %e, "could not read recent files");
            }
        }

        recent
    }

    pub fn entries(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move `path` to the front, trimming the list to its maximum size
    pub fn add(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return;
        }
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

        if let Some(pos) = self.entries.iter().position(|entry| entry == &path) {
            self.entries.remove(pos);
        }
        self.entries.push_front(path);
        self.entries.truncate(MAX_RECENT_FILES);
        self.persist();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    /// Persistence failures are logged and otherwise ignored
    fn persist(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        if let Err(e) = self.write_to(storage) {
            warn!(path = %storage.display(), error = %e, "could not save recent files");
        }
    }

    fn write_to(&self, storage: &Path) -> io::Result<()> {
        if let Some(parent) = storage.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut contents = String::new();
        for entry in &self.entries {
            contents.push_str(&entry.to_string_lossy());
            contents.push('\n');
        }
        fs::write(storage, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn test_add_moves_to_front_and_dedupes() {
        let dir = TempDir::new().unwrap();
        let a = touch(&dir, "a.txt");
        let b = touch(&dir, "b.txt");
        let mut recent = RecentFiles::in_memory();
        recent.add(&a);
        recent.add(&b);
        recent.add(&a);

        let entries: Vec<&Path> = recent.entries().collect();
        assert_eq!(entries, vec![a.as_path(), b.as_path()]);
    }

    #[test]
    fn test_capped_at_max() {
        let dir = TempDir::new().unwrap();
        let mut recent = RecentFiles::in_memory();
        for i in 0..(MAX_RECENT_FILES + 3) {
            recent.add(touch(&dir, &format!("{i}.txt")));
        }
        assert_eq!(recent.len(), MAX_RECENT_FILES);
        assert_eq!(
            recent.entries().next().unwrap(),
            dir.path().join(format!("{}.txt", MAX_RECENT_FILES + 2))
        );
    }

    #[test]
    fn test_round_trip_drops_missing() {
        let dir = TempDir::new().unwrap();
        let storage = dir.path().join("config").join("recent.txt");
        let kept = touch(&dir, "kept.txt");
        let gone = touch(&dir, "gone.txt");

        let mut recent = RecentFiles::load(&storage);
        assert!(recent.is_empty());
        recent.add(&kept);
        recent.add(&gone);
        fs::remove_file(&gone).unwrap();

        let reloaded = RecentFiles::load(&storage);
        let entries: Vec<&Path> = reloaded.entries().collect();
        assert_eq!(entries, vec![kept.as_path()]);
    }

    #[test]
    fn test_load_ignores_blank_and_duplicate_lines() {
        let dir = TempDir::new().unwrap();
        let a = touch(&dir, "a.txt");
        let storage = dir.path().join("recent.txt");
        fs::write(
            &storage,
            format!("{}\n\n{}\n", a.display(), a.display()),
        )
        .unwrap();

        let recent = RecentFiles::load(&storage);
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn test_clear_persists() {
        let dir = TempDir::new().unwrap();
        let storage = dir.path().join("recent.txt");
        let mut recent = RecentFiles::load(&storage);
        recent.add(touch(&dir, "a.txt"));
        recent.clear();

        assert!(RecentFiles::load(&storage).is_empty());
        assert_eq!(fs::read_to_string(&storage).unwrap(), "");
    }
}
