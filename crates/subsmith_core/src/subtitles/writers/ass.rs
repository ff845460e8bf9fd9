//! SubStation Alpha subtitle writers.
//!
//! Writes ASS (v4.00+) and SSA (v4.00) scripts with a single default
//! style. Times are truncated to centisecond precision at write time.

use crate::subtitles::types::SubtitleDocument;

const ASS_STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, \
    OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, \
    BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

const ASS_DEFAULT_STYLE: &str = "Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,\
    &H00000000,0,0,0,0,100,100,0,0,1,2,2,2,10,10,10,1";

const SSA_STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, \
    TertiaryColour, BackColour, Bold, Italic, BorderStyle, Outline, Shadow, Alignment, MarginL, \
    MarginR, MarginV, AlphaLevel, Encoding";

const SSA_DEFAULT_STYLE: &str =
    "Style: Default,Arial,20,16777215,65535,0,0,0,0,1,2,2,2,10,10,10,0,1";

/// Write a document to an ASS (v4.00+) format string.
pub fn write_ass(doc: &SubtitleDocument) -> String {
    let mut output = String::new();

    output.push_str("[Script Info]\n");
    output.push_str("ScriptType: v4.00+\n");
    output.push_str("WrapStyle: 0\n");
    output.push_str("ScaledBorderAndShadow: yes\n");
    output.push('\n');

    output.push_str("[V4+ Styles]\n");
    output.push_str(ASS_STYLE_FORMAT);
    output.push('\n');
    output.push_str(ASS_DEFAULT_STYLE);
    output.push_str("\n\n");

    output.push_str("[Events]\n");
    output.push_str("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n");
    for entry in doc.iter() {
        output.push_str(&format!(
            "Dialogue: 0,{},{},Default,,0,0,0,,{}\n",
            format_ass_time(entry.start_ms()),
            format_ass_time(entry.end_ms()),
            escape_text(&entry.text),
        ));
    }

    output
}

/// Write a document to an SSA (v4.00) format string.
pub fn write_ssa(doc: &SubtitleDocument) -> String {
    let mut output = String::new();

    output.push_str("[Script Info]\n");
    output.push_str("ScriptType: v4.00\n");
    output.push('\n');

    output.push_str("[V4 Styles]\n");
    output.push_str(SSA_STYLE_FORMAT);
    output.push('\n');
    output.push_str(SSA_DEFAULT_STYLE);
    output.push_str("\n\n");

    output.push_str("[Events]\n");
    output.push_str("Format: Marked, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n");
    for entry in doc.iter() {
        output.push_str(&format!(
            "Dialogue: Marked=0,{},{},Default,,0,0,0,,{}\n",
            format_ass_time(entry.start_ms()),
            format_ass_time(entry.end_ms()),
            escape_text(&entry.text),
        ));
    }

    output
}

/// Format milliseconds as a SubStation timestamp (H:MM:SS.cc).
///
/// Centiseconds are truncated, not rounded.
pub fn format_ass_time(ms: i64) -> String {
    let cs = (ms.max(0) as u64) / 10;

    let centis = cs % 100;
    let total_secs = cs / 100;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    format!("{}:{:02}:{:02}.{:02}", hours, mins, secs, centis)
}

/// Escape entry text for an event line.
///
/// Event lines are newline-terminated, so hard line breaks become `\N`.
fn escape_text(text: &str) -> String {
    text.replace('\n', "\\N")
}
