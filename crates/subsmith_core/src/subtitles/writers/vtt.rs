//! WebVTT subtitle writer.
//!
//! Same cue structure as SRT, with a `WEBVTT` header, a period as the
//! milliseconds separator, and no index lines.

use crate::subtitles::types::SubtitleDocument;

/// Write a document to a WebVTT format string.
pub fn write_vtt(doc: &SubtitleDocument) -> String {
    let mut output = String::from("WEBVTT\n");

    for entry in doc.iter() {
        output.push('\n');

        let start = format_vtt_time(entry.start_ms());
        let end = format_vtt_time(entry.end_ms());
        output.push_str(&format!("{} --> {}\n", start, end));

        output.push_str(&entry.text);
        output.push('\n');
    }

    output
}

/// Format milliseconds as a WebVTT timestamp (HH:MM:SS.mmm).
pub fn format_vtt_time(ms: i64) -> String {
    let ms = ms.max(0) as u64;

    let millis = ms % 1000;
    let total_secs = ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, millis)
}
