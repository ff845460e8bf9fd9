//! Writers for the small line-per-entry formats (TMP, MPL2) and the JSON
//! document dump.

use crate::subtitles::types::SubtitleDocument;

/// Write a document to TMP format: `H:MM:SS:text`, start time only.
pub fn write_tmp(doc: &SubtitleDocument) -> String {
    let mut output = String::new();

    for entry in doc.iter() {
        let secs = (entry.start_ms().max(0) as u64) / 1000;
        let s = secs % 60;
        let m = (secs / 60) % 60;
        let h = secs / 3600;
        let text = entry.text.replace('\n', "|");
        output.push_str(&format!("{}:{:02}:{:02}:{}\n", h, m, s, text));
    }

    output
}

/// Write a document to MPL2 format: `[start][end]text` in deciseconds.
pub fn write_mpl2(doc: &SubtitleDocument) -> String {
    let mut output = String::new();

    for entry in doc.iter() {
        let start = entry.start_ms().max(0) / 100;
        let end = entry.end_ms().max(0) / 100;
        let text = entry.text.replace('\n', "|");
        output.push_str(&format!("[{}][{}]{}\n", start, end, text));
    }

    output
}

/// Write a document as pretty-printed JSON.
pub fn write_json(doc: &SubtitleDocument) -> String {
    serde_json::to_string_pretty(doc).unwrap_or_default()
}
