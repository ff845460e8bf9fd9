//! Subsmith core - speech-to-text subtitling backend
//!
//! This crate contains all business logic with zero UI dependencies:
//! the model registry, the memoized transcription pipeline, and the
//! editable subtitle document with its export formats. It can be used
//! by a GUI application or a CLI tool.
//!
//! The usual flow:
//!
//! ```no_run
//! use subsmith_core::cache::TranscriptionCache;
//! use subsmith_core::config::RawConfig;
//! use subsmith_core::registry::ModelRegistry;
//! use subsmith_core::session::Session;
//! use subsmith_core::subtitles::{ExportFormat, ExportOptions};
//!
//! # fn run() -> Result<(), subsmith_core::Error> {
//! let registry = ModelRegistry::with_builtin_models();
//! let cache = TranscriptionCache::new();
//!
//! let doc = cache.transcribe(
//!     &registry,
//!     "episode.wav".as_ref(),
//!     "ggerganov/whisper.cpp",
//!     &RawConfig::new(),
//! )?;
//!
//! let mut session = Session::with_document(doc.as_ref().clone());
//! session.edit_text(0, "Corrected line")?;
//! session.export_to_file("episode.srt", ExportFormat::Srt, &ExportOptions::default())?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod engines;
pub mod logging;
pub mod registry;
pub mod session;
pub mod subtitles;
pub mod tools;
pub mod translate;

/// Any error the pipeline can produce.
///
/// Composite operations (the cache, the session) cross module
/// boundaries; this enum carries the per-module errors through them
/// unchanged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Model(#[from] registry::ModelError),

    #[error(transparent)]
    Transcribe(#[from] engines::TranscribeError),

    #[error(transparent)]
    Translate(#[from] translate::TranslateError),

    #[error(transparent)]
    Edit(#[from] subtitles::EditError),

    #[error(transparent)]
    Export(#[from] subtitles::ExportError),

    #[error(transparent)]
    Parse(#[from] subtitles::ParseError),

    #[error(transparent)]
    Subtitle(#[from] subtitles::SubtitleError),
}

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }

    #[test]
    fn error_preserves_inner_message() {
        let err = Error::from(registry::ModelError::unknown("x/y"));
        assert_eq!(err.to_string(), "Unknown model: 'x/y'");
    }
}
