//! Subtitle document model, writers, and the SRT parser.
//!
//! # Components
//!
//! - **types**: Core data structures (SubtitleDocument, SubtitleEntry, ExportFormat)
//! - **times**: Millisecond conversions and [`TimeSpec`]
//! - **parsers**: SRT parsing
//! - **writers**: Format-specific writers and export dispatch
//!
//! # Usage
//!
//! ```ignore
//! use subsmith_core::subtitles::{export, ExportFormat, ExportOptions, SubtitleDocument};
//!
//! let bytes = export(&doc, ExportFormat::Srt, &ExportOptions::default())?;
//! ```

mod error;
pub mod parsers;
mod times;
mod types;
pub mod writers;

use std::fs;
use std::path::Path;

// Re-export core types
pub use times::{frames_to_ms, ms_to_frames, ms_to_str, parts_to_ms, TimeSpec};
pub use types::{
    Boundary, ExportFormat, ExportOptions, SubtitleDocument, SubtitleEntry,
};

// Re-export errors
pub use error::{EditError, ExportError, ParseError, SubtitleError};

// Re-export parsers
pub use parsers::{parse_srt, parse_srt_time};

// Re-export writers
pub use writers::{
    available_export_formats, format_ass_time, format_srt_time, format_vtt_time, write_ass,
    write_content, write_microdvd, write_srt, write_ssa, write_vtt,
};

/// Serialize a document to a byte stream in the specified format.
pub fn export(
    doc: &SubtitleDocument,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<Vec<u8>, ExportError> {
    write_content(doc, format, options).map(String::into_bytes)
}

/// Serialize a document to a file in the specified format.
pub fn export_to_file(
    doc: &SubtitleDocument,
    path: impl AsRef<Path>,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<(), SubtitleError> {
    let path = path.as_ref();
    let content = write_content(doc, format, options)?;
    fs::write(path, content).map_err(|e| SubtitleError::write(path, e))?;
    tracing::debug!(path = %path.display(), %format, entries = doc.len(), "exported subtitles");
    Ok(())
}
