/// Status subsystem - cursor position and document statistics for display

pub mod status_line;

pub use status_line::{DocumentStats, StatusProjector, StatusSnapshot};
