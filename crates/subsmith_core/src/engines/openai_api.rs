//! Transcription through the hosted OpenAI audio API.
//!
//! Uploads the media file as multipart form data and maps the
//! `verbose_json` segment list back into a subtitle document. The API
//! key comes from the `OPENAI_API_KEY` environment variable and is
//! checked at construction, not at request time.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::{ConfigSchema, ResolvedConfig};
use crate::registry::{ModelDescriptor, ModelError};
use crate::subtitles::{SubtitleDocument, SubtitleEntry};

use super::{SpeechModel, TranscribeError};

const IDENTIFIER: &str = "API/openai/whisper";
const ENDPOINT: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Registry entry for the OpenAI audio API engine.
pub fn descriptor() -> ModelDescriptor {
    let schema = ConfigSchema::builder()
        .choice(
            "model_type",
            "Hosted model name",
            &["whisper-1"],
            Some("whisper-1"),
        )
        .text(
            "language",
            "Spoken language code ('en', 'fr', ...); unset lets the API decide",
            None,
        )
        .real("temperature", "Sampling temperature between 0 and 1", Some(0.0))
        .text(
            "prompt",
            "Optional text to guide the model's style or continue a previous segment",
            None,
        )
        .build();

    ModelDescriptor::new(
        IDENTIFIER,
        "OpenAI's hosted Whisper endpoint; requires OPENAI_API_KEY",
        "https://platform.openai.com/docs/guides/speech-to-text",
        schema,
        |config| Ok(Box::new(OpenAiWhisper::from_config(config)?) as Box<dyn SpeechModel>),
    )
}

/// Map a media file extension to the MIME type sent with the upload.
///
/// The API uses the part's filename and MIME type to pick a decoder, so
/// sending m4a audio labelled as wav fails server-side.
fn mime_for_extension(ext: &str) -> &'static str {
    match ext {
        "mp3" => "audio/mpeg",
        "m4a" | "mp4" => "audio/mp4",
        "ogg" => "audio/ogg",
        "webm" => "audio/webm",
        "flac" => "audio/flac",
        "wav" => "audio/wav",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Deserialize)]
struct ApiSegment {
    start: f64,
    end: f64,
    text: String,
}

#[derive(Debug, Deserialize)]
struct VerboseTranscription {
    #[serde(default)]
    segments: Vec<ApiSegment>,
}

/// Speech model calling the hosted transcription endpoint.
pub struct OpenAiWhisper {
    client: reqwest::blocking::Client,
    api_key: String,
    model_type: String,
    language: Option<String>,
    temperature: f64,
    prompt: Option<String>,
}

impl OpenAiWhisper {
    /// Build a client from the config and the `OPENAI_API_KEY` variable.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, ModelError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ModelError::construction(IDENTIFIER, "OPENAI_API_KEY is not set"))?;

        Ok(Self {
            client: reqwest::blocking::Client::new(),
            api_key,
            model_type: config
                .get_str("model_type")
                .unwrap_or("whisper-1")
                .to_owned(),
            language: config.get_str("language").map(str::to_owned),
            temperature: config.get_f64("temperature").unwrap_or(0.0),
            prompt: config.get_str("prompt").map(str::to_owned),
        })
    }

    fn upload_form(&self, media: &Path) -> Result<reqwest::blocking::multipart::Form, TranscribeError> {
        let bytes = fs::read(media).map_err(|e| TranscribeError::media_read(media, e.to_string()))?;

        let file_name = media
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_owned());
        let mime = media
            .extension()
            .map(|e| mime_for_extension(&e.to_string_lossy().to_lowercase()))
            .unwrap_or("application/octet-stream");

        let part = reqwest::blocking::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| TranscribeError::api(format!("build upload part: {e}")))?;

        let mut form = reqwest::blocking::multipart::Form::new()
            .part("file", part)
            .text("model", self.model_type.clone())
            .text("response_format", "verbose_json")
            .text("temperature", self.temperature.to_string());
        if let Some(language) = &self.language {
            form = form.text("language", language.clone());
        }
        if let Some(prompt) = &self.prompt {
            form = form.text("prompt", prompt.clone());
        }
        Ok(form)
    }
}

impl SpeechModel for OpenAiWhisper {
    fn transcribe(&self, media: &Path) -> Result<SubtitleDocument, TranscribeError> {
        let form = self.upload_form(media)?;

        tracing::info!(media = %media.display(), model = %self.model_type, "uploading to transcription API");
        let response = self
            .client
            .post(ENDPOINT)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .map_err(|e| TranscribeError::api(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(TranscribeError::api(format!("HTTP {status}: {body}")));
        }

        let transcription: VerboseTranscription = response
            .json()
            .map_err(|e| TranscribeError::api(format!("parse response: {e}")))?;

        let mut doc = SubtitleDocument::new();
        for (i, segment) in transcription.segments.iter().enumerate() {
            let text = segment.text.trim();
            if text.is_empty() {
                continue;
            }
            let start_ms = (segment.start * 1000.0).round() as i64;
            let end_ms = (segment.end * 1000.0).round() as i64;
            let entry = SubtitleEntry::new(start_ms.max(0), end_ms.max(start_ms.max(0)), text)
                .map_err(|e| TranscribeError::api(format!("segment {i}: {e}")))?;
            doc.push(entry);
        }

        tracing::info!(media = %media.display(), entries = doc.len(), "transcription finished");
        Ok(doc)
    }
}
