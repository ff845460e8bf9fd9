//! Local transcription through whisper.cpp.
//!
//! Loads a ggml model file once at construction and reuses the context
//! across transcriptions; decoding state is created per call, so one
//! instance can serve requests sequentially without reloading weights.

use std::path::Path;

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::config::{ConfigSchema, ResolvedConfig};
use crate::registry::{ModelDescriptor, ModelError};
use crate::subtitles::{SubtitleDocument, SubtitleEntry};

use super::audio::read_wav_samples;
use super::{SpeechModel, TranscribeError};

const IDENTIFIER: &str = "ggerganov/whisper.cpp";

/// Registry entry for the whisper.cpp engine.
pub fn descriptor() -> ModelDescriptor {
    let schema = ConfigSchema::builder()
        .text(
            "model_path",
            "Path to a ggml model file, e.g. ggml-base.en.bin",
            None,
        )
        .text(
            "language",
            "Spoken language code ('en', 'fr', ...); unset lets the engine decide",
            None,
        )
        .boolean(
            "translate",
            "Translate the recognized speech to English",
            Some(false),
        )
        .integer("n_threads", "Decoder thread count", Some(4))
        .real(
            "sampling_temperature",
            "Greedy sampling temperature",
            Some(0.0),
        )
        .build();

    ModelDescriptor::new(
        IDENTIFIER,
        "High-performance C/C++ port of OpenAI's Whisper, running fully offline",
        "https://github.com/ggerganov/whisper.cpp",
        schema,
        |config| Ok(Box::new(WhisperCpp::from_config(config)?) as Box<dyn SpeechModel>),
    )
}

/// Speech model backed by a loaded whisper.cpp context.
pub struct WhisperCpp {
    context: WhisperContext,
    language: Option<String>,
    translate: bool,
    n_threads: i32,
    temperature: f32,
}

impl WhisperCpp {
    /// Load the model named by `model_path` in the config.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, ModelError> {
        let model_path = config
            .get_str("model_path")
            .ok_or_else(|| ModelError::construction(IDENTIFIER, "model_path is not set"))?;

        tracing::info!(model_path, "loading whisper.cpp model");
        let context =
            WhisperContext::new_with_params(model_path, WhisperContextParameters::default())
                .map_err(|e| {
                    ModelError::construction(IDENTIFIER, format!("{model_path}: {e}"))
                })?;

        Ok(Self {
            context,
            language: config.get_str("language").map(str::to_owned),
            translate: config.get_bool("translate").unwrap_or(false),
            n_threads: config.get_i64("n_threads").unwrap_or(4) as i32,
            temperature: config.get_f64("sampling_temperature").unwrap_or(0.0) as f32,
        })
    }

    fn decode_params(&self) -> FullParams<'_, '_> {
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(self.language.as_deref());
        params.set_translate(self.translate);
        params.set_n_threads(self.n_threads);
        params.set_temperature(self.temperature);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params
    }
}

impl SpeechModel for WhisperCpp {
    fn transcribe(&self, media: &Path) -> Result<SubtitleDocument, TranscribeError> {
        let samples = read_wav_samples(media)?;

        let mut state = self
            .context
            .create_state()
            .map_err(|e| TranscribeError::engine(format!("create_state: {e}")))?;

        tracing::debug!(media = %media.display(), samples = samples.len(), "running whisper.cpp");
        state
            .full(self.decode_params(), &samples)
            .map_err(|e| TranscribeError::engine(format!("full: {e}")))?;

        let segment_count = state
            .full_n_segments()
            .map_err(|e| TranscribeError::engine(format!("full_n_segments: {e}")))?;

        let mut doc = SubtitleDocument::new();
        for i in 0..segment_count {
            // whisper.cpp reports timestamps in centiseconds
            let start_ms = state
                .full_get_segment_t0(i)
                .map_err(|e| TranscribeError::engine(format!("segment {i} start: {e}")))?
                * 10;
            let end_ms = state
                .full_get_segment_t1(i)
                .map_err(|e| TranscribeError::engine(format!("segment {i} end: {e}")))?
                * 10;
            let text = state
                .full_get_segment_text(i)
                .map_err(|e| TranscribeError::engine(format!("segment {i} text: {e}")))?;

            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            let entry = SubtitleEntry::new(start_ms, end_ms.max(start_ms), text)
                .map_err(|e| TranscribeError::engine(format!("segment {i}: {e}")))?;
            doc.push(entry);
        }

        tracing::info!(media = %media.display(), entries = doc.len(), "transcription finished");
        Ok(doc)
    }
}
