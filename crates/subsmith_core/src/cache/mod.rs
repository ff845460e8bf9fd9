//! Memoization for expensive pipeline products.
//!
//! Transcription runs minutes, so finished documents are cached for the
//! lifetime of the cache object under a key combining the media path,
//! the model identifier, and the resolved config fingerprint. Failures
//! pass through uncached; a later identical request retries the engine.
//! Translation backends get the same treatment per identifier.

mod memo;

pub use memo::KeyedOnce;

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{RawConfig, ResolvedConfig};
use crate::registry::ModelRegistry;
use crate::subtitles::SubtitleDocument;
use crate::translate::{TranslateError, TranslationModel, TranslationRegistry};
use crate::Error;

/// Identity of one transcription product.
///
/// Structurally equal configs fingerprint identically regardless of how
/// their raw maps were ordered, so two sessions asking for the same
/// work share one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    media: PathBuf,
    model: String,
    config: String,
}

impl CacheKey {
    pub fn new(media: impl Into<PathBuf>, model: impl Into<String>, config: &ResolvedConfig) -> Self {
        Self {
            media: media.into(),
            model: model.into(),
            config: config.fingerprint(),
        }
    }

    pub fn media(&self) -> &Path {
        &self.media
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Hex fingerprint of the resolved config.
    pub fn config_fingerprint(&self) -> &str {
        &self.config
    }
}

/// Memoizes finished transcriptions.
///
/// Pure memoization: no TTL, no eviction. One instance typically lives
/// as long as the process serving requests.
#[derive(Default)]
pub struct TranscriptionCache {
    documents: KeyedOnce<CacheKey, Arc<SubtitleDocument>>,
}

impl TranscriptionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The cached document for this exact request, if present.
    pub fn cached(
        &self,
        media: &Path,
        identifier: &str,
        config: &ResolvedConfig,
    ) -> Option<Arc<SubtitleDocument>> {
        self.documents.peek(&CacheKey::new(media, identifier, config))
    }

    /// Transcribe `media` with the named model, reusing a cached result
    /// when one exists.
    ///
    /// The raw config is coerced before the cache is consulted, so a
    /// config error never creates or disturbs an entry. On a miss the
    /// model is instantiated and run outside the cache lock; concurrent
    /// identical requests block until the first finishes rather than
    /// running the engine twice.
    pub fn transcribe(
        &self,
        registry: &ModelRegistry,
        media: &Path,
        identifier: &str,
        raw: &RawConfig,
    ) -> Result<Arc<SubtitleDocument>, Error> {
        let config = registry.resolve_config(identifier, raw)?;
        self.transcribe_resolved(registry, media, identifier, &config)
    }

    /// [`transcribe`](Self::transcribe) with an already-resolved config.
    pub fn transcribe_resolved(
        &self,
        registry: &ModelRegistry,
        media: &Path,
        identifier: &str,
        config: &ResolvedConfig,
    ) -> Result<Arc<SubtitleDocument>, Error> {
        let key = CacheKey::new(media, identifier, config);
        let computed = Cell::new(false);

        let doc = self.documents.get_or_try_init(key, || {
            computed.set(true);
            tracing::info!(
                model = identifier,
                media = %media.display(),
                "cache miss, running transcription"
            );
            let model = registry.instantiate_resolved(identifier, config)?;
            let doc = model.transcribe(media)?;
            Ok::<_, Error>(Arc::new(doc))
        })?;

        if !computed.get() {
            tracing::debug!(
                model = identifier,
                media = %media.display(),
                "transcription cache hit"
            );
        }
        Ok(doc)
    }
}

/// Memoizes translation-backend construction per identifier.
///
/// Repeated requests for the same backend share one instance, so any
/// session state the backend carries (HTTP connection pools, loaded
/// weights) is paid for once.
#[derive(Default)]
pub struct TranslationModelCache {
    models: KeyedOnce<String, Arc<dyn TranslationModel>>,
}

impl TranslationModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The backend registered under `identifier`, constructing it on
    /// first use.
    pub fn get(
        &self,
        registry: &TranslationRegistry,
        identifier: &str,
    ) -> Result<Arc<dyn TranslationModel>, TranslateError> {
        self.models
            .get_or_try_init(identifier.to_owned(), || registry.create(identifier))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::config::{ConfigSchema, RawValue};
    use crate::engines::{SpeechModel, TranscribeError};
    use crate::registry::{ModelDescriptor, ModelError};
    use crate::subtitles::SubtitleEntry;

    struct CannedModel {
        runs: Arc<AtomicUsize>,
        fail_first: bool,
    }

    impl SpeechModel for CannedModel {
        fn transcribe(&self, _media: &Path) -> Result<SubtitleDocument, TranscribeError> {
            let run = self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && run == 0 {
                return Err(TranscribeError::engine("transient failure"));
            }
            let mut doc = SubtitleDocument::new();
            doc.push(SubtitleEntry::new(0, 1_000, "canned").unwrap());
            Ok(doc)
        }
    }

    fn canned_registry(runs: Arc<AtomicUsize>, fail_first: bool) -> ModelRegistry {
        let schema = ConfigSchema::builder()
            .choice("model_type", "", &["tiny", "base"], Some("base"))
            .integer("beam", "", Some(5))
            .build();
        let mut registry = ModelRegistry::new();
        registry.register(ModelDescriptor::new("test/canned", "", "", schema, move |_| {
            Ok(Box::new(CannedModel {
                runs: Arc::clone(&runs),
                fail_first,
            }) as Box<dyn SpeechModel>)
        }));
        registry
    }

    #[test]
    fn test_repeat_request_hits_cache() {
        let runs = Arc::new(AtomicUsize::new(0));
        let registry = canned_registry(Arc::clone(&runs), false);
        let cache = TranscriptionCache::new();
        let media = Path::new("episode.wav");

        let first = cache
            .transcribe(&registry, media, "test/canned", &RawConfig::new())
            .unwrap();
        let second = cache
            .transcribe(&registry, media, "test/canned", &RawConfig::new())
            .unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_equivalent_configs_share_an_entry() {
        let runs = Arc::new(AtomicUsize::new(0));
        let registry = canned_registry(Arc::clone(&runs), false);
        let cache = TranscriptionCache::new();
        let media = Path::new("episode.wav");

        // explicit values equal to the defaults resolve to the same config
        let mut raw = RawConfig::new();
        raw.insert("beam".into(), RawValue::Integer(5));
        raw.insert("model_type".into(), RawValue::Text("base".into()));

        cache.transcribe(&registry, media, "test/canned", &RawConfig::new()).unwrap();
        cache.transcribe(&registry, media, "test/canned", &raw).unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_distinct_configs_do_not_share() {
        let runs = Arc::new(AtomicUsize::new(0));
        let registry = canned_registry(Arc::clone(&runs), false);
        let cache = TranscriptionCache::new();
        let media = Path::new("episode.wav");

        let mut raw = RawConfig::new();
        raw.insert("model_type".into(), RawValue::Text("tiny".into()));

        cache.transcribe(&registry, media, "test/canned", &RawConfig::new()).unwrap();
        cache.transcribe(&registry, media, "test/canned", &raw).unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_config_error_leaves_cache_untouched() {
        let runs = Arc::new(AtomicUsize::new(0));
        let registry = canned_registry(Arc::clone(&runs), false);
        let cache = TranscriptionCache::new();
        let media = Path::new("episode.wav");

        let mut raw = RawConfig::new();
        raw.insert("model_type".into(), RawValue::Text("giant".into()));
        let err = cache
            .transcribe(&registry, media, "test/canned", &raw)
            .unwrap_err();

        assert!(matches!(err, Error::Model(ModelError::Config(_))));
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(cache.is_empty());

        // the same key still works once the config is valid
        cache.transcribe(&registry, media, "test/canned", &RawConfig::new()).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failure_is_retried_not_cached() {
        let runs = Arc::new(AtomicUsize::new(0));
        let registry = canned_registry(Arc::clone(&runs), true);
        let cache = TranscriptionCache::new();
        let media = Path::new("episode.wav");

        let err = cache
            .transcribe(&registry, media, "test/canned", &RawConfig::new())
            .unwrap_err();
        assert!(matches!(err, Error::Transcribe(_)));
        assert!(cache.is_empty());

        // the retry reaches the engine again and succeeds
        let doc = cache
            .transcribe(&registry, media, "test/canned", &RawConfig::new())
            .unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unknown_model_fails_before_cache() {
        let cache = TranscriptionCache::new();
        let registry = ModelRegistry::new();

        let err = cache
            .transcribe(&registry, Path::new("x.wav"), "nope", &RawConfig::new())
            .unwrap_err();
        assert!(matches!(err, Error::Model(ModelError::Unknown(_))));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_translation_backend_constructed_once() {
        use crate::translate::TranslationModel;

        struct Noop;
        impl TranslationModel for Noop {
            fn identifier(&self) -> &str {
                "test/noop"
            }
            fn languages(&self) -> Vec<&str> {
                vec!["en"]
            }
            fn translate(&self, text: &str, _: &str, _: &str) -> Result<String, TranslateError> {
                Ok(text.to_owned())
            }
        }

        let constructions = Arc::new(AtomicUsize::new(0));
        let mut registry = TranslationRegistry::new();
        {
            let constructions = Arc::clone(&constructions);
            registry.register("test/noop", move || {
                constructions.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(Noop) as Arc<dyn TranslationModel>)
            });
        }

        let cache = TranslationModelCache::new();
        let first = cache.get(&registry, "test/noop").unwrap();
        let second = cache.get(&registry, "test/noop").unwrap();

        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_translation_unknown_identifier() {
        let cache = TranslationModelCache::new();
        let registry = TranslationRegistry::new();
        let err = cache.get(&registry, "nope").unwrap_err();
        assert!(matches!(err, TranslateError::Unknown(_)));
    }
}
