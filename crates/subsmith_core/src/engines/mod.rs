//! Speech-to-text engines.
//!
//! Engines implement [`SpeechModel`] and are produced by registry
//! factories from a resolved config. The bundled engines are
//! feature-gated so the crate builds without native or network
//! dependencies:
//!
//! - `whisper-cpp`: local whisper.cpp inference via `whisper-rs`
//! - `openai-api`: the OpenAI transcription API

#[cfg(feature = "whisper-cpp")]
mod audio;
#[cfg(feature = "openai-api")]
pub mod openai_api;
#[cfg(feature = "whisper-cpp")]
pub mod whisper_cpp;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::subtitles::SubtitleDocument;

/// An interchangeable speech-recognition backend.
///
/// Implementations are stateless per call: `transcribe` may be invoked
/// repeatedly and from multiple threads.
pub trait SpeechModel: Send + Sync {
    /// Transcribe a media file into a subtitle document.
    fn transcribe(&self, media: &Path) -> Result<SubtitleDocument, TranscribeError>;
}

impl fmt::Debug for dyn SpeechModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn SpeechModel")
    }
}

/// Errors produced by an engine during inference.
///
/// These are never cached; a later call with the same inputs retries
/// the engine.
#[derive(Debug, thiserror::Error)]
pub enum TranscribeError {
    /// Failed to open or decode the media file.
    #[error("Failed to read media '{path}': {message}")]
    MediaRead { path: PathBuf, message: String },

    /// The media file is readable but not in a form the engine accepts.
    #[error("Unsupported audio in '{path}': {message}")]
    UnsupportedAudio { path: PathBuf, message: String },

    /// The engine itself failed.
    #[error("Engine failure: {message}")]
    Engine { message: String },

    /// A remote API call failed.
    #[error("API request failed: {message}")]
    Api { message: String },
}

impl TranscribeError {
    /// Create a media-read error.
    pub fn media_read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MediaRead {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported-audio error.
    pub fn unsupported_audio(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::UnsupportedAudio {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an engine-failure error.
    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine {
            message: message.into(),
        }
    }

    /// Create an API-failure error.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }
}
