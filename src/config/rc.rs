use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub const RC_FILE_NAME: &str = ".plainpadrc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcConfig {
    pub autosave: bool,
    pub autosave_interval_secs: u64,
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub undo_levels: usize,
    pub remember_recent: bool,
}

impl Default for RcConfig {
    fn default() -> Self {
        Self {
            autosave: true,
            autosave_interval_secs: 30,
            case_sensitive: false,
            whole_word: false,
            undo_levels: 1000,
            remember_recent: true,
        }
    }
}

impl RcConfig {
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }
}

pub struct RcLoader;

impl RcLoader {
    /// Get the path to the RC file
    /// Looks for:
    /// 1. ./.plainpadrc
    /// 2. <config_dir>/plainpad/plainpadrc
    /// 3. ~/.plainpadrc
    pub fn get_rc_path() -> Option<PathBuf> {
        let current_rc = Path::new(RC_FILE_NAME);
        if current_rc.exists() {
            return Some(current_rc.to_path_buf());
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_rc = config_dir.join("plainpad").join("plainpadrc");
            if config_rc.exists() {
                return Some(config_rc);
            }
        }

        if let Ok(home) = env::var("HOME") {
            let home_rc = Path::new(&home).join(RC_FILE_NAME);
            if home_rc.exists() {
                return Some(home_rc);
            }
        }

        None
    }

    /// Load and parse the RC file, falling back to defaults
    pub fn load_config() -> RcConfig {
        match Self::get_rc_path() {
            Some(rc_path) => Self::load_from(&rc_path),
            None => RcConfig::default(),
        }
    }

    pub fn load_from(rc_path: &Path) -> RcConfig {
        let mut config = RcConfig::default();

        match fs::read_to_string(rc_path) {
            Ok(content) => {
                debug!(path = %rc_path.display(), "reading rc file");
                Self::parse_config_content(&content, &mut config);
            }
            Err(e) => {
                warn!(path = %rc_path.display(), error = %e, "could not read rc file");
            }
        }

        config
    }

    fn parse_config_content(content: &str, config: &mut RcConfig) {
        for line in content.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') || line.starts_with('"') {
                continue;
            }

            Self::parse_config_line(line, config);
        }
    }

    fn parse_config_line(line: &str, config: &mut RcConfig) {
        // Remove inline comments
        let line = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        }
        .trim();

        // Handle "set" commands (vim-style)
        if let Some(stripped) = line.strip_prefix("set ") {
            let setting = stripped.trim();

            match setting {
                "autosave" => config.autosave = true,
                "noautosave" => config.autosave = false,
                "ignorecase" | "ic" => config.case_sensitive = false,
                "noignorecase" | "noic" => config.case_sensitive = true,
                "wholeword" => config.whole_word = true,
                "nowholeword" => config.whole_word = false,
                "recentfiles" => config.remember_recent = true,
                "norecentfiles" => config.remember_recent = false,
                _ => {
                    if let Some((key, value)) = setting.split_once('=') {
                        Self::apply_value(key.trim(), value.trim(), config);
                    }
                }
            }
        }
        // Handle direct key-value pairs
        else if let Some((key, value)) = line.split_once('=') {
            Self::apply_value(key.trim(), value.trim(), config);
        }
    }

    fn apply_value(key: &str, value: &str, config: &mut RcConfig) {
        let flag = value == "true" || value == "1" || value == "yes";

        match key {
            "autosave" | "auto_save" => config.autosave = flag,
            "autosave_interval" | "autosaveinterval" => {
                if let Ok(secs) = value.parse::<u64>() {
                    if (1..=3600).contains(&secs) {
                        config.autosave_interval_secs = secs;
                    }
                }
            }
            "case_sensitive" | "matchcase" => config.case_sensitive = flag,
            "ignorecase" => config.case_sensitive = !flag,
            "whole_word" | "wholeword" => config.whole_word = flag,
            "undolevels" | "undo_levels" => {
                if let Ok(levels) = value.parse::<usize>() {
                    if (1..=100_000).contains(&levels) {
                        config.undo_levels = levels;
                    }
                }
            }
            "recentfiles" | "recent_files" => config.remember_recent = flag,
            _ => {} // Unknown setting, ignore
        }
    }

    /// Generate a sample RC file content
    pub fn generate_sample_rc() -> String {
        r#"# plainpad configuration file (.plainpadrc)
# Lines starting with # or " are comments

# Auto-save the current file every N seconds when it has unsaved changes
set autosave            # or set noautosave
set autosave_interval=30

# Find & Replace defaults
set ignorecase          # or set noignorecase for case-sensitive search
set nowholeword

# History
set undolevels=1000
set recentfiles         # remember recently opened files

# Alternative key=value syntax:
# autosave=true
# case_sensitive=false
# whole_word=false
"#
        .to_string()
    }
}
