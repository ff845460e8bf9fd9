//! SRT subtitle writer.
//!
//! Writes a [`SubtitleDocument`] to SubRip format: 1-based index, timing
//! line `HH:MM:SS,mmm --> HH:MM:SS,mmm`, text, blank-line separator.

use crate::subtitles::types::SubtitleDocument;

/// Write a document to an SRT format string.
pub fn write_srt(doc: &SubtitleDocument) -> String {
    let mut output = String::new();

    for (i, entry) in doc.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        // Index (1-based)
        output.push_str(&format!("{}\n", i + 1));

        // Timing line
        let start = format_srt_time(entry.start_ms());
        let end = format_srt_time(entry.end_ms());
        output.push_str(&format!("{} --> {}\n", start, end));

        output.push_str(&entry.text);
        output.push('\n');
    }

    output
}

/// Format milliseconds as an SRT timestamp (HH:MM:SS,mmm).
pub fn format_srt_time(ms: i64) -> String {
    let ms = ms.max(0) as u64;

    let millis = ms % 1000;
    let total_secs = ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, millis)
}
