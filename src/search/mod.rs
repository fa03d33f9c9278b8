/// Search subsystem - literal find/replace with wraparound
///
/// Patterns are plain text. Case sensitivity and whole-word matching are the
/// only options; the pattern is never handed to a pattern language unescaped.

pub mod matcher;
pub mod search_engine;

pub use matcher::{LiteralMatcher, is_word_char};
pub use search_engine::{
    ReplaceOutcome, Replaced, SearchConfig, SearchDirection, SearchEngine, SearchMatch,
};
