//! Translation through the public Google Translate endpoint.
//!
//! Uses the unauthenticated `translate_a/single` endpoint, which
//! answers with nested JSON arrays rather than an object; the first
//! element holds the translated chunks.

use serde_json::Value;

use super::{TranslateError, TranslationModel};

pub const IDENTIFIER: &str = "google/translate";

const ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Language codes offered in selection UIs.
///
/// The endpoint accepts more, but these cover the supported pairs well
/// enough; extend the list rather than bypassing the check.
const LANGUAGES: &[&str] = &[
    "en", "ja", "zh-CN", "fr", "de", "es", "it", "ko", "pt", "ru",
];

/// Collect the translated text out of the endpoint's array-of-arrays
/// response shape.
fn collect_translation(value: &Value) -> String {
    let mut out = String::new();
    for chunk in value.get(0).and_then(Value::as_array).into_iter().flatten() {
        if let Some(piece) = chunk.get(0).and_then(Value::as_str) {
            out.push_str(piece);
        }
    }
    out
}

/// Backend calling the public Google Translate endpoint.
pub struct GoogleTranslate {
    client: reqwest::blocking::Client,
}

impl GoogleTranslate {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for GoogleTranslate {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationModel for GoogleTranslate {
    fn identifier(&self) -> &str {
        IDENTIFIER
    }

    fn languages(&self) -> Vec<&str> {
        LANGUAGES.to_vec()
    }

    fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslateError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let response = self
            .client
            .get(ENDPOINT)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .map_err(|e| TranslateError::request(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(TranslateError::request(format!("HTTP {status}: {body}")));
        }

        let value: Value = response
            .json()
            .map_err(|e| TranslateError::request(format!("parse response: {e}")))?;
        Ok(collect_translation(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_and_languages() {
        let model = GoogleTranslate::new();
        assert_eq!(model.identifier(), "google/translate");
        let languages = model.languages();
        assert!(languages.contains(&"en"));
        assert!(languages.contains(&"ja"));
        assert!(languages.contains(&"zh-CN"));
    }

    #[test]
    fn test_collect_translation_joins_chunks() {
        let body = serde_json::json!([
            [
                ["Hallo, ", "Hello, ", null, null, 10],
                ["Welt!", "world!", null, null, 10]
            ],
            null,
            "en"
        ]);
        assert_eq!(collect_translation(&body), "Hallo, Welt!");
    }

    #[test]
    fn test_collect_translation_empty_body() {
        assert_eq!(collect_translation(&serde_json::json!([])), "");
        assert_eq!(collect_translation(&serde_json::json!(null)), "");
    }
}
