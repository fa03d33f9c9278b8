/// Storage subsystem - document files on disk and the recent-files list

pub mod document_file;
pub mod recent_files;

pub use document_file::{load_document, save_document};
pub use recent_files::{MAX_RECENT_FILES, RecentFiles};
