use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    // Text entry
    Insert(String),

    // File commands
    Open(PathBuf),
    New,
    Save,
    SaveAs(PathBuf),
    Quit,
    ForceQuit,

    // Find & Replace
    Find(String),
    FindNext,
    FindPrevious,
    Replace(String),
    ReplaceAll(String),
    CaseSensitive(bool),
    WholeWord(bool),

    // Navigation
    GoToLine(String),
    Cursor(String),
    Select(String, String),
    DeleteSelection,

    // Clipboard and insertion
    SelectAll,
    Copy,
    Cut,
    Paste,
    InsertDateTime,

    // Undo/Redo commands
    Undo,
    Redo,

    // Information
    Print,
    Stats,
    Status,
    Recent,
    ClearRecent,
    ToggleAutoSave,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("Expected on or off, got {0:?}")]
    InvalidToggle(String),
}

impl ShellCommand {
    /// Lines starting with ':' are commands; anything else is text. A leading
    /// '\' escapes a literal ':'.
    pub fn parse(line: &str) -> Result<ShellCommand, CommandError> {
        if let Some(escaped) = line.strip_prefix('\\') {
            return Ok(ShellCommand::Insert(escaped.to_string()));
        }
        let Some(cmd) = line.strip_prefix(':') else {
            return Ok(ShellCommand::Insert(line.to_string()));
        };

        let (name, rest) = match cmd.split_once(' ') {
            Some((name, rest)) => (name, rest),
            None => (cmd, ""),
        };

        let command = match name.trim() {
            "open" | "e" => ShellCommand::Open(path_arg(rest, "file name")?),
            "new" | "enew" => ShellCommand::New,
            "w" | "write" if rest.trim().is_empty() => ShellCommand::Save,
            "w" | "write" | "saveas" => ShellCommand::SaveAs(path_arg(rest, "file name")?),
            "q" | "quit" => ShellCommand::Quit,
            "q!" | "quit!" => ShellCommand::ForceQuit,
            "find" | "f" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("search text"));
                }
                ShellCommand::Find(rest.to_string())
            }
            "next" | "n" => ShellCommand::FindNext,
            "prev" | "N" => ShellCommand::FindPrevious,
            "replace" => ShellCommand::Replace(rest.to_string()),
            "replaceall" => ShellCommand::ReplaceAll(rest.to_string()),
            "case" => ShellCommand::CaseSensitive(toggle_arg(rest)?),
            "word" => ShellCommand::WholeWord(toggle_arg(rest)?),
            "goto" | "g" => ShellCommand::GoToLine(rest.to_string()),
            "cursor" => ShellCommand::Cursor(rest.to_string()),
            "select" => match rest.split_once(' ') {
                Some((start, end)) => ShellCommand::Select(start.to_string(), end.to_string()),
                None => return Err(CommandError::MissingArgument("start and end offsets")),
            },
            "delete" | "d" => ShellCommand::DeleteSelection,
            "selectall" => ShellCommand::SelectAll,
            "copy" | "y" => ShellCommand::Copy,
            "cut" => ShellCommand::Cut,
            "paste" => ShellCommand::Paste,
            "date" => ShellCommand::InsertDateTime,
            "undo" | "u" => ShellCommand::Undo,
            "redo" => ShellCommand::Redo,
            "print" | "p" => ShellCommand::Print,
            "stats" | "wc" => ShellCommand::Stats,
            "status" => ShellCommand::Status,
            "recent" if rest.trim() == "clear" => ShellCommand::ClearRecent,
            "recent" => ShellCommand::Recent,
            "autosave" => ShellCommand::ToggleAutoSave,
            "help" | "h" => ShellCommand::Help,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn path_arg(rest: &str, what: &'static str) -> Result<PathBuf, CommandError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(CommandError::MissingArgument(what));
    }
    Ok(PathBuf::from(rest))
}

fn toggle_arg(rest: &str) -> Result<bool, CommandError> {
    match rest.trim() {
        "on" | "yes" | "true" | "1" => Ok(true),
        "off" | "no" | "false" | "0" => Ok(false),
        other => Err(CommandError::InvalidToggle(other.to_string())),
    }
}

pub const HELP_TEXT: &str = "\
Plain lines are inserted at the cursor. Commands:
  :open PATH      open a file            :new            new document
  :w [PATH]       save / save as         :q  :q!         quit / quit discarding changes
  :find TEXT      find next occurrence   :next  :prev    repeat search forward / backward
  :replace TEXT   replace current match  :replaceall TEXT replace every match
  :case on|off    case-sensitive search  :word on|off    whole-word search
  :goto N         go to line N           :cursor N       move cursor to offset N
  :select A B     select offsets A..B    :delete         delete the selection
  :selectall      select everything      :copy  :cut     copy / cut the selection
  :paste          paste the clipboard    :date           insert the date and time
  :undo  :redo    edit history           :print          show document with line numbers
  :stats          document statistics    :status         status line
  :recent [clear] recent files           :autosave       toggle auto-save
  \\TEXT           insert TEXT literally";
