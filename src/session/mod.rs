/// Session subsystem - the state of one open editor
///
/// A `Session` owns the document, file binding, cursor, search state, recent
/// files, clipboard and auto-save schedule. Front ends drive it and answer its questions
/// through a `Prompter`.

pub mod autosave;
pub mod clipboard;
pub mod prompter;
#[allow(clippy::module_inception)]
pub mod session;

pub use autosave::{AutoSave, SaveLatch, SaveTicket};
pub use clipboard::{ClipboardAccess, MemoryClipboard, SystemClipboard};
pub use prompter::{Prompter, SaveChoice};
pub use session::{AutoSaveOutcome, SaveOutcome, Session, format_date_time};
