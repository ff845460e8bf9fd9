//! Subtitle error types.

use std::path::PathBuf;

use crate::subtitles::types::ExportFormat;

/// Errors that can occur when writing a subtitle document to disk.
#[derive(Debug, thiserror::Error)]
pub enum SubtitleError {
    /// Failed to write subtitle file.
    #[error("Failed to write file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Export error.
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl SubtitleError {
    /// Create a write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteError {
            path: path.into(),
            source,
        }
    }
}

/// Errors that can occur when editing a subtitle document.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// Entry index outside the document.
    #[error("Entry index {index} is out of range (document has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Invalid or conflicting operation arguments.
    #[error("Invalid argument for {operation}: {message}")]
    InvalidArgument {
        operation: &'static str,
        message: String,
    },
}

impl EditError {
    /// Create an out-of-range error.
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(operation: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            operation,
            message: message.into(),
        }
    }
}

/// Errors that can occur when exporting a subtitle document.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Format tag not recognized.
    #[error("Unsupported subtitle format: '{0}'")]
    UnsupportedFormat(String),

    /// A format-mandatory option was not supplied.
    #[error("Format '{format}' requires the '{option}' export option")]
    MissingOption {
        format: ExportFormat,
        option: &'static str,
    },

    /// An export option has an unusable value.
    #[error("Invalid export option {option}={value} for format '{format}'")]
    InvalidOption {
        format: ExportFormat,
        option: &'static str,
        value: String,
    },
}

impl ExportError {
    /// Create a missing-option error.
    pub fn missing_option(format: ExportFormat, option: &'static str) -> Self {
        Self::MissingOption { format, option }
    }

    /// Create an invalid-option error.
    pub fn invalid_option(
        format: ExportFormat,
        option: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidOption {
            format,
            option,
            value: value.into(),
        }
    }
}

/// Errors that can occur during subtitle parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Invalid or malformed time format.
    #[error("Invalid time format at line {line}: '{value}'")]
    InvalidTime { line: usize, value: String },

    /// Invalid entry timing constraints.
    #[error("Invalid entry at line {line}: {message}")]
    InvalidEntry { line: usize, message: String },

    /// Generic parse error.
    #[error("Parse error at line {line}: {message}")]
    Generic { line: usize, message: String },
}

impl ParseError {
    /// Create a generic parse error.
    pub fn at_line(line: usize, message: impl Into<String>) -> Self {
        Self::Generic {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid time error.
    pub fn invalid_time(line: usize, value: impl Into<String>) -> Self {
        Self::InvalidTime {
            line,
            value: value.into(),
        }
    }

    /// Create an invalid entry error.
    pub fn invalid_entry(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidEntry {
            line,
            message: message.into(),
        }
    }
}
