//! End-to-end pipeline: registry -> cache -> session -> export.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use subsmith_core::cache::TranscriptionCache;
use subsmith_core::config::{ConfigSchema, RawConfig, RawValue};
use subsmith_core::engines::{SpeechModel, TranscribeError};
use subsmith_core::registry::{ModelDescriptor, ModelRegistry};
use subsmith_core::session::Session;
use subsmith_core::subtitles::{
    parse_srt, ExportFormat, ExportOptions, SubtitleDocument, SubtitleEntry,
};
use subsmith_core::translate::{AUTO_SOURCE, TranslateError, TranslationModel};

struct ScriptedModel {
    runs: Arc<AtomicUsize>,
}

impl SpeechModel for ScriptedModel {
    fn transcribe(&self, _media: &Path) -> Result<SubtitleDocument, TranscribeError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let mut doc = SubtitleDocument::new();
        doc.push(SubtitleEntry::new(0, 2_500, "First line.").unwrap());
        doc.push(SubtitleEntry::new(3_000, 5_750, "Second line.").unwrap());
        Ok(doc)
    }
}

struct Reverser;

impl TranslationModel for Reverser {
    fn identifier(&self) -> &str {
        "test/reverser"
    }

    fn languages(&self) -> Vec<&str> {
        vec!["en", "xx"]
    }

    fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String, TranslateError> {
        Ok(text.chars().rev().collect())
    }
}

fn scripted_registry(runs: Arc<AtomicUsize>) -> ModelRegistry {
    let schema = ConfigSchema::builder()
        .choice("model_type", "model size", &["tiny", "base"], Some("base"))
        .integer("n_threads", "decoder threads", Some(4))
        .build();

    let mut registry = ModelRegistry::new();
    registry.register(ModelDescriptor::new(
        "test/scripted",
        "deterministic fixture engine",
        "",
        schema,
        move |_| {
            Ok(Box::new(ScriptedModel {
                runs: Arc::clone(&runs),
            }) as Box<dyn SpeechModel>)
        },
    ));
    registry
}

#[test]
fn transcribe_edit_translate_export_round_trip() {
    let runs = Arc::new(AtomicUsize::new(0));
    let registry = scripted_registry(Arc::clone(&runs));
    let cache = TranscriptionCache::new();
    let media = Path::new("fixtures/episode.wav");

    let doc = cache
        .transcribe(&registry, media, "test/scripted", &RawConfig::new())
        .expect("transcription should succeed");

    let mut session = Session::with_document(doc.as_ref().clone());
    session.edit_text(0, "Corrected line.").unwrap();

    session
        .apply_translation(&Reverser, AUTO_SOURCE, "xx")
        .unwrap();
    assert_eq!(session.document().get(0).unwrap().text, ".enil detcerroC");

    session.rollback().unwrap();
    assert_eq!(session.document().get(0).unwrap().text, "Corrected line.");

    let bytes = session
        .export(ExportFormat::Srt, &ExportOptions::default())
        .unwrap();
    let reparsed = parse_srt(&String::from_utf8(bytes).unwrap()).unwrap();

    assert_eq!(reparsed.len(), session.document().len());
    for (exported, live) in reparsed.iter().zip(session.document().iter()) {
        assert_eq!(exported.start_ms(), live.start_ms());
        assert_eq!(exported.end_ms(), live.end_ms());
        assert_eq!(exported.text, live.text);
    }
}

#[test]
fn equivalent_requests_share_one_engine_run() {
    let runs = Arc::new(AtomicUsize::new(0));
    let registry = scripted_registry(Arc::clone(&runs));
    let cache = TranscriptionCache::new();
    let media = Path::new("fixtures/episode.wav");

    // defaults spelled out explicitly resolve to the same cache key
    let mut explicit = RawConfig::new();
    explicit.insert("model_type".into(), RawValue::Text("base".into()));
    explicit.insert("n_threads".into(), RawValue::Integer(4));

    let first = cache
        .transcribe(&registry, media, "test/scripted", &RawConfig::new())
        .unwrap();
    let second = cache
        .transcribe(&registry, media, "test/scripted", &explicit)
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    // a different config is new work
    let mut tiny = RawConfig::new();
    tiny.insert("model_type".into(), RawValue::Text("tiny".into()));
    cache
        .transcribe(&registry, media, "test/scripted", &tiny)
        .unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[test]
fn exported_file_lands_on_disk() {
    let runs = Arc::new(AtomicUsize::new(0));
    let registry = scripted_registry(runs);
    let cache = TranscriptionCache::new();

    let doc = cache
        .transcribe(
            &registry,
            Path::new("fixtures/episode.wav"),
            "test/scripted",
            &RawConfig::new(),
        )
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("episode.vtt");
    let session = Session::with_document(doc.as_ref().clone());
    session
        .export_to_file(&target, ExportFormat::WebVtt, &ExportOptions::default())
        .unwrap();

    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.starts_with("WEBVTT\n"));
    assert!(written.contains("First line."));
}
