//! MicroDVD subtitle writer.
//!
//! MicroDVD (.sub) indexes time in frames, so a frame rate is mandatory.
//! The first line is the conventional `{1}{1}fps` declaration.

use crate::subtitles::times::ms_to_frames;
use crate::subtitles::types::SubtitleDocument;

/// Write a document to a MicroDVD format string at the given frame rate.
pub fn write_microdvd(doc: &SubtitleDocument, fps: f64) -> String {
    let mut output = format!("{{1}}{{1}}{}\n", format_fps(fps));

    for entry in doc.iter() {
        let start = ms_to_frames(entry.start_ms(), fps);
        let end = ms_to_frames(entry.end_ms(), fps);
        let text = entry.text.replace('\n', "|");
        output.push_str(&format!("{{{}}}{{{}}}{}\n", start, end, text));
    }

    output
}

/// Format an fps value without a trailing `.0` for whole rates.
fn format_fps(fps: f64) -> String {
    if fps.fract() == 0.0 {
        format!("{}", fps as i64)
    } else {
        format!("{}", fps)
    }
}
