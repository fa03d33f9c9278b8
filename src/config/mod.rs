/// Configuration subsystem - editor settings and preferences
///
/// This module handles loading configuration from .plainpadrc files, providing
/// the auto-save, search and history defaults for a session.

pub mod rc;

// Re-export public interface
pub use rc::{RC_FILE_NAME, RcConfig, RcLoader};
