pub mod config;
pub mod document_model;
pub mod error;
pub mod search;
pub mod session;
pub mod shell;
pub mod status;
pub mod storage;

pub use error::{EditorError, Result};
