//! Text translation for subtitle documents.
//!
//! Translation backends implement [`TranslationModel`] and are listed
//! in a [`TranslationRegistry`]; instantiation is memoized by the cache
//! layer so repeated requests share one backend instance.

#[cfg(feature = "google-translate")]
pub mod google;

use std::fmt;
use std::sync::Arc;

use crate::subtitles::SubtitleDocument;

/// Wildcard source language: the backend detects the language itself.
pub const AUTO_SOURCE: &str = "auto";

/// Errors from translation lookup, construction, and requests.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// No translation backend registered under the identifier.
    #[error("Unknown translation model: '{0}'")]
    Unknown(String),

    /// The backend failed to initialize.
    #[error("Failed to construct translation model '{identifier}': {message}")]
    Construction { identifier: String, message: String },

    /// The language is not in the backend's supported set.
    #[error("Language '{language}' is not supported by '{identifier}'")]
    UnsupportedLanguage { identifier: String, language: String },

    /// A translation request failed.
    #[error("Translation request failed: {message}")]
    Request { message: String },
}

impl TranslateError {
    /// Create an unknown-model error.
    pub fn unknown(identifier: impl Into<String>) -> Self {
        Self::Unknown(identifier.into())
    }

    /// Create a construction error.
    pub fn construction(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Construction {
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported-language error.
    pub fn unsupported_language(
        identifier: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self::UnsupportedLanguage {
            identifier: identifier.into(),
            language: language.into(),
        }
    }

    /// Create a request-failure error.
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }
}

/// An interchangeable translation backend.
pub trait TranslationModel: Send + Sync {
    /// The identifier this backend is registered under.
    fn identifier(&self) -> &str;

    /// Concrete language codes the backend accepts, as source or target.
    ///
    /// [`AUTO_SOURCE`] is accepted as a source by every backend and is
    /// not part of this list.
    fn languages(&self) -> Vec<&str>;

    /// Translate one piece of text.
    fn translate(&self, text: &str, source: &str, target: &str)
        -> Result<String, TranslateError>;
}

impl fmt::Debug for dyn TranslationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn TranslationModel")
    }
}

/// Factory producing a shareable translation backend.
pub type TranslationFactory =
    Box<dyn Fn() -> Result<Arc<dyn TranslationModel>, TranslateError> + Send + Sync>;

/// Registry of translation backends, enumerable in registration order.
#[derive(Default)]
pub struct TranslationRegistry {
    models: Vec<(String, TranslationFactory)>,
}

impl TranslationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the backends compiled into this build.
    pub fn with_builtin_models() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();
        #[cfg(feature = "google-translate")]
        registry.register(google::IDENTIFIER, || {
            Ok(Arc::new(google::GoogleTranslate::new()) as Arc<dyn TranslationModel>)
        });
        registry
    }

    /// Register a backend.
    ///
    /// # Panics
    /// Panics if the identifier is already registered.
    pub fn register(
        &mut self,
        identifier: impl Into<String>,
        factory: impl Fn() -> Result<Arc<dyn TranslationModel>, TranslateError> + Send + Sync + 'static,
    ) {
        let identifier = identifier.into();
        assert!(
            !self.models.iter().any(|(id, _)| *id == identifier),
            "translation model '{identifier}' registered twice"
        );
        tracing::debug!(identifier = %identifier, "registered translation model");
        self.models.push((identifier, Box::new(factory)));
    }

    /// Identifiers in registration order.
    pub fn list_models(&self) -> Vec<&str> {
        self.models.iter().map(|(id, _)| id.as_str()).collect()
    }

    /// Instantiate a backend by identifier.
    ///
    /// Callers normally go through the translation model cache instead
    /// of constructing a fresh backend per request.
    pub fn create(&self, identifier: &str) -> Result<Arc<dyn TranslationModel>, TranslateError> {
        let (_, factory) = self
            .models
            .iter()
            .find(|(id, _)| id == identifier)
            .ok_or_else(|| TranslateError::unknown(identifier))?;
        tracing::info!(identifier, "instantiating translation model");
        factory()
    }
}

/// Translate every entry of a document.
///
/// Returns a new document with the same entry count and timings; the
/// input is left untouched so callers can keep it for rollback.
pub fn translate_document(
    model: &dyn TranslationModel,
    doc: &SubtitleDocument,
    source: &str,
    target: &str,
) -> Result<SubtitleDocument, TranslateError> {
    let languages = model.languages();
    if source != AUTO_SOURCE && !languages.contains(&source) {
        return Err(TranslateError::unsupported_language(model.identifier(), source));
    }
    if target == AUTO_SOURCE || !languages.contains(&target) {
        return Err(TranslateError::unsupported_language(model.identifier(), target));
    }

    tracing::info!(
        model = model.identifier(),
        source,
        target,
        entries = doc.len(),
        "translating document"
    );

    let mut translated = SubtitleDocument::new();
    for entry in doc {
        let text = model.translate(&entry.text, source, target)?;
        translated.push(entry.with_text(text));
    }
    Ok(translated)
}
