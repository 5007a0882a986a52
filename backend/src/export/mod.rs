//! Transcript export
//!
//! Renders a user's conversation into a downloadable document.

pub mod docx;
mod parts;

pub use docx::{download_filename, TranscriptExporter, DOCX_MIME};
