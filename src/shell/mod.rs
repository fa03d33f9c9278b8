/// Shell subsystem - a line-oriented front end for a `Session`
///
/// Plain input lines are typed into the document and `:`-prefixed lines are
/// commands. Input arrives on a channel so the loop can wake up for auto-save
/// while the user is idle.

pub mod command;
pub mod repl;

pub use command::{CommandError, HELP_TEXT, ShellCommand};
pub use repl::{Shell, ShellEvent, spawn_stdin_reader};
