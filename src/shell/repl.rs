use super::command::{HELP_TEXT, ShellCommand};
use crate::error::EditorError;
use crate::search::SearchDirection;
use crate::session::{AutoSaveOutcome, Prompter, SaveChoice, SaveOutcome, Session};
use chrono::Local;
use crossterm::execute;
use crossterm::style::{PrintStyledContent, Stylize};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Instant;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Line(String),
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Spawn a thread forwarding stdin lines. The session itself stays on the
/// caller's thread.
pub fn spawn_stdin_reader() -> Receiver<ShellEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(ShellEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    error!(error = %e, "stdin read failed");
                    break;
                }
            }
        }
        let _ = tx.send(ShellEvent::Eof);
    });
    rx
}

pub struct Shell<W: Write> {
    session: Session,
    events: Receiver<ShellEvent>,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(session: Session, events: Receiver<ShellEvent>, out: W) -> Self {
        Self {
            session,
            events,
            out,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_parts(self) -> (Session, W) {
        (self.session, self.out)
    }

    /// Process events until quit or end of input. Auto-save ticks fire while
    /// waiting for input.
    pub fn run(&mut self) -> io::Result<()> {
        let title = self.session.title();
        self.notice(&title)?;
        loop {
            let timeout = self.session.time_until_autosave(Instant::now());
            match self.events.recv_timeout(timeout) {
                Ok(ShellEvent::Line(line)) => {
                    if self.handle_line(&line)? == Flow::Quit {
                        break;
                    }
                }
                Ok(ShellEvent::Eof) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => self.tick(Instant::now())?,
            }
        }
        Ok(())
    }

    fn tick(&mut self, now: Instant) -> io::Result<()> {
        match self.session.autosave_tick(now) {
            Ok(AutoSaveOutcome::Saved(path)) => {
                debug!(path = %path.display(), "auto-saved");
                let status = self.session.status_line(now);
                self.status(&status)
            }
            Ok(_) => Ok(()),
            Err(e) => self.error(&format!("Auto-save failed: {e}")),
        }
    }

    fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        let command = match ShellCommand::parse(line) {
            Ok(command) => command,
            Err(e) => {
                self.error(&e.to_string())?;
                return Ok(Flow::Continue);
            }
        };
        debug!(?command, "shell command");

        match self.execute(command) {
            Ok(flow) => Ok(flow),
            Err(ShellFailure::Io(e)) => Err(e),
            Err(ShellFailure::Editor(e)) => {
                self.error(&e.to_string())?;
                Ok(Flow::Continue)
            }
        }
    }

    fn execute(&mut self, command: ShellCommand) -> Result<Flow, ShellFailure> {
        let now = Instant::now();
        match command {
            ShellCommand::Insert(text) => {
                self.session.type_text(&format!("{text}\n"))?;
            }
            ShellCommand::Open(path) => {
                if self.with_prompter(|s, p| s.open(&path, p))? {
                    let title = self.session.title();
                    self.notice(&title)?;
                }
            }
            ShellCommand::New => {
                if self.with_prompter(|s, p| s.new_document(p))? {
                    let title = self.session.title();
                    self.notice(&title)?;
                }
            }
            ShellCommand::Save => {
                let outcome = self.with_prompter(|s, p| s.save(p))?;
                self.report_save(outcome)?;
            }
            ShellCommand::SaveAs(path) => {
                let outcome = self.with_prompter(|s, p| s.save_as(path, p))?;
                self.report_save(outcome)?;
            }
            ShellCommand::Quit => {
                if self.with_prompter(|s, p| s.confirm_discard(p))? {
                    return Ok(Flow::Quit);
                }
            }
            ShellCommand::ForceQuit => return Ok(Flow::Quit),
            ShellCommand::Find(text) => {
                self.session.search_config_mut().pattern = text;
                let found = self.session.find_next()?;
                self.report_match(found.map(|m| (m.start, m.end)))?;
            }
            ShellCommand::FindNext => {
                let found = self.session.find(SearchDirection::Forward)?;
                self.report_match(found.map(|m| (m.start, m.end)))?;
            }
            ShellCommand::FindPrevious => {
                let found = self.session.find(SearchDirection::Backward)?;
                self.report_match(found.map(|m| (m.start, m.end)))?;
            }
            ShellCommand::Replace(replacement) => {
                let outcome = self.session.replace(&replacement)?;
                self.report_match(outcome.next.map(|m| (m.start, m.end)))?;
            }
            ShellCommand::ReplaceAll(replacement) => {
                if !self.session.search_config().is_empty() {
                    let count = self.session.replace_all(&replacement)?;
                    self.notice(&format!("Replaced {count} occurrences"))?;
                }
            }
            ShellCommand::CaseSensitive(on) => {
                self.session.search_config_mut().case_sensitive = on;
            }
            ShellCommand::WholeWord(on) => {
                self.session.search_config_mut().whole_word = on;
            }
            ShellCommand::GoToLine(input) => {
                self.session.go_to_line(&input)?;
                let status = self.session.status_line(now);
                self.status(&status)?;
            }
            ShellCommand::Cursor(input) => {
                self.session.set_cursor(parse_offset(&input)?)?;
            }
            ShellCommand::Select(start, end) => {
                self.session.select(parse_offset(&start)?, parse_offset(&end)?)?;
            }
            ShellCommand::DeleteSelection => {
                if self.session.delete_selection()?.is_none() {
                    self.notice("Nothing selected")?;
                }
            }
            ShellCommand::SelectAll => self.session.select_all(),
            ShellCommand::Copy => match self.session.copy()? {
                Some(count) => self.notice(&format!("{count} characters copied"))?,
                None => self.notice("Nothing selected")?,
            },
            ShellCommand::Cut => match self.session.cut()? {
                Some(count) => self.notice(&format!("{count} characters cut"))?,
                None => self.notice("Nothing selected")?,
            },
            ShellCommand::Paste => match self.session.paste()? {
                0 => self.notice("Nothing to paste")?,
                count => self.notice(&format!("{count} characters pasted"))?,
            },
            ShellCommand::InsertDateTime => {
                self.session.insert_date_time(Local::now().naive_local())?;
            }
            ShellCommand::Undo => {
                if !self.session.undo() {
                    self.notice("Nothing to undo")?;
                }
            }
            ShellCommand::Redo => {
                if !self.session.redo() {
                    self.notice("Nothing to redo")?;
                }
            }
            ShellCommand::Print => self.print_document()?,
            ShellCommand::Stats => {
                let stats = self.session.stats().to_string();
                writeln!(self.out, "{stats}")?;
            }
            ShellCommand::Status => {
                let status = self.session.status_line(now);
                self.status(&status)?;
            }
            ShellCommand::Recent => {
                if self.session.recent_files().is_empty() {
                    self.notice("(No recent files)")?;
                }
                let entries: Vec<String> = self
                    .session
                    .recent_files()
                    .entries()
                    .map(|p| p.display().to_string())
                    .collect();
                for (i, entry) in entries.iter().enumerate() {
                    writeln!(self.out, "{:>2}. {entry}", i + 1)?;
                }
            }
            ShellCommand::ClearRecent => self.session.clear_recent_files(),
            ShellCommand::ToggleAutoSave => {
                let state = if self.session.toggle_autosave() {
                    "on"
                } else {
                    "off"
                };
                self.notice(&format!("Auto-save {state}"))?;
            }
            ShellCommand::Help => writeln!(self.out, "{HELP_TEXT}")?,
        }
        Ok(Flow::Continue)
    }

    /// Run a session call that may need to ask the user something
    fn with_prompter<T>(
        &mut self,
        f: impl FnOnce(&mut Session, &mut dyn Prompter) -> Result<T, EditorError>,
    ) -> Result<T, EditorError> {
        let mut prompter = LinePrompter {
            events: &self.events,
            out: &mut self.out,
        };
        f(&mut self.session, &mut prompter)
    }

    fn report_save(&mut self, outcome: SaveOutcome) -> io::Result<()> {
        match outcome {
            SaveOutcome::Saved { path, bytes } => {
                self.notice(&format!("\"{}\" {bytes}B written", path.display()))
            }
            SaveOutcome::Cancelled => self.notice("Save cancelled"),
        }
    }

    fn report_match(&mut self, found: Option<(usize, usize)>) -> io::Result<()> {
        match found {
            Some((start, end)) => {
                let position = self.session.model().position(start).ok();
                let text = self.session.model().slice(start, end).unwrap_or_default();
                match position {
                    Some(p) => self.notice(&format!(
                        "Found \"{text}\" at line {}, col {}",
                        p.line, p.column
                    )),
                    None => self.notice(&format!("Found \"{text}\"")),
                }
            }
            None => self.notice("Text not found"),
        }
    }

    fn print_document(&mut self) -> io::Result<()> {
        let line_count = self.session.model().line_count();
        let width = line_count.to_string().len();
        let text = self.session.text().to_string();
        for (i, line) in text.split('\n').enumerate() {
            let number = format!("{:>width$}", i + 1);
            execute!(self.out, PrintStyledContent(number.dark_grey()))?;
            writeln!(self.out, " {line}")?;
        }
        Ok(())
    }

    fn status(&mut self, status: &str) -> io::Result<()> {
        execute!(self.out, PrintStyledContent(status.reverse()))?;
        writeln!(self.out)
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        execute!(self.out, PrintStyledContent(message.yellow()))?;
        writeln!(self.out)
    }

    fn error(&mut self, message: &str) -> io::Result<()> {
        execute!(self.out, PrintStyledContent(message.red()))?;
        writeln!(self.out)
    }
}

fn parse_offset(input: &str) -> Result<usize, EditorError> {
    input
        .trim()
        .parse()
        .map_err(|_| EditorError::InvalidNumber(input.to_string()))
}

enum ShellFailure {
    Io(io::Error),
    Editor(EditorError),
}

impl From<io::Error> for ShellFailure {
    fn from(e: io::Error) -> Self {
        ShellFailure::Io(e)
    }
}

impl From<EditorError> for ShellFailure {
    fn from(e: EditorError) -> Self {
        ShellFailure::Editor(e)
    }
}

/// Answers session questions by reading the next input line
struct LinePrompter<'a, W: Write> {
    events: &'a Receiver<ShellEvent>,
    out: &'a mut W,
}

impl<W: Write> LinePrompter<'_, W> {
    fn show(&mut self, question: &str) {
        let shown = execute!(self.out, PrintStyledContent(question.bold()))
            .and_then(|_| writeln!(self.out));
        if let Err(e) = shown {
            warn!(error = %e, "could not show prompt");
        }
    }

    fn ask(&mut self, question: &str) -> Option<String> {
        self.show(question);
        match self.events.recv() {
            Ok(ShellEvent::Line(line)) => Some(line.trim().to_lowercase()),
            _ => None,
        }
    }
}

impl<W: Write> Prompter for LinePrompter<'_, W> {
    fn confirm_save_changes(&mut self, name: &str) -> SaveChoice {
        match self.ask(&format!("Save changes to {name}? [y]es/[n]o/[c]ancel")) {
            Some(answer) if answer == "y" || answer == "yes" => SaveChoice::Save,
            Some(answer) if answer == "n" || answer == "no" => SaveChoice::Discard,
            _ => SaveChoice::Cancel,
        }
    }

    fn confirm_overwrite(&mut self, path: &Path) -> bool {
        let question = format!("File {} already exists. Overwrite? [y/n]", path.display());
        matches!(self.ask(&question).as_deref(), Some("y" | "yes"))
    }

    fn choose_save_path(&mut self) -> Option<PathBuf> {
        self.show("Save as (empty cancels):");
        match self.events.recv() {
            Ok(ShellEvent::Line(line)) if !line.trim().is_empty() => {
                Some(PathBuf::from(line.trim()))
            }
            _ => None,
        }
    }
}
