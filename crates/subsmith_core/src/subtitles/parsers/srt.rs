//! SRT subtitle parser.
//!
//! Parses SubRip (.srt) content. Index numbers are ignored during
//! parsing and regenerated on write; blocks without a timing line are
//! skipped.

use crate::subtitles::error::ParseError;
use crate::subtitles::types::{SubtitleDocument, SubtitleEntry};

/// Parse SRT content into a document.
pub fn parse_srt(content: &str) -> Result<SubtitleDocument, ParseError> {
    let mut doc = SubtitleDocument::new();

    // Normalize line endings and split into blocks
    let content = content.replace("\r\n", "\n").replace('\r', "\n");
    let blocks: Vec<&str> = content.split("\n\n").collect();

    let mut line_offset = 0;

    for block in blocks {
        let trimmed = block.trim();
        if trimmed.is_empty() {
            line_offset += block.lines().count() + 1;
            continue;
        }

        let lines: Vec<&str> = trimmed.lines().collect();

        // Find the timing line (may or may not have an index before it)
        let Some((timing_idx, timing_line)) = find_timing_line(&lines) else {
            line_offset += lines.len() + 1;
            continue;
        };
        let timing_line_num = line_offset + timing_idx + 1;

        let (start_ms, end_ms) = parse_srt_timing(timing_line)
            .ok_or_else(|| ParseError::invalid_time(timing_line_num, timing_line))?;

        // Text is everything after the timing line
        let text = lines[timing_idx + 1..].join("\n");

        if !text.is_empty() {
            let entry = SubtitleEntry::new(start_ms, end_ms, text)
                .map_err(|e| ParseError::invalid_entry(timing_line_num, e.to_string()))?;
            doc.push(entry);
        }

        line_offset += lines.len() + 1;
    }

    Ok(doc)
}

/// Find the timing line in a block of lines.
fn find_timing_line<'a>(lines: &[&'a str]) -> Option<(usize, &'a str)> {
    lines
        .iter()
        .enumerate()
        .find(|(_, line)| line.contains(" --> "))
        .map(|(i, line)| (i, *line))
}

/// Parse an SRT timing line: `HH:MM:SS,mmm --> HH:MM:SS,mmm`.
fn parse_srt_timing(line: &str) -> Option<(i64, i64)> {
    let parts: Vec<&str> = line.split(" --> ").collect();
    if parts.len() != 2 {
        return None;
    }

    let start = parse_srt_time(parts[0].trim())?;
    let end = parse_srt_time(parts[1].trim())?;

    Some((start, end))
}

/// Parse an SRT timestamp: `HH:MM:SS,mmm` or `HH:MM:SS.mmm`.
///
/// Returns time in milliseconds.
pub fn parse_srt_time(s: &str) -> Option<i64> {
    let s = s.trim().replace(',', ".");

    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 3 {
        return None;
    }

    let hours: i64 = parts[0].parse().ok()?;
    let minutes: i64 = parts[1].parse().ok()?;

    // Seconds with milliseconds
    let sec_parts: Vec<&str> = parts[2].split('.').collect();
    let seconds: i64 = sec_parts[0].parse().ok()?;

    let milliseconds: i64 = if sec_parts.len() > 1 {
        let ms_str = sec_parts[1];
        let ms_val: f64 = ms_str.parse().ok()?;
        // Normalize based on number of digits
        let normalized = match ms_str.len() {
            1 => ms_val * 100.0,
            2 => ms_val * 10.0,
            3 => ms_val,
            _ => ms_val / 10f64.powi(ms_str.len() as i32 - 3),
        };
        normalized.round() as i64
    } else {
        0
    };

    Some(hours * 3_600_000 + minutes * 60_000 + seconds * 1000 + milliseconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_srt_time() {
        assert_eq!(parse_srt_time("00:00:00,000").unwrap(), 0);
        assert_eq!(parse_srt_time("00:00:01,000").unwrap(), 1000);
        assert_eq!(parse_srt_time("00:00:01,500").unwrap(), 1500);
        assert_eq!(parse_srt_time("00:01:00,000").unwrap(), 60_000);
        assert_eq!(parse_srt_time("01:00:00,000").unwrap(), 3_600_000);

        // Period instead of comma
        assert_eq!(parse_srt_time("00:00:01.500").unwrap(), 1500);

        // Short millisecond fields
        assert_eq!(parse_srt_time("00:00:01,5").unwrap(), 1500);
        assert_eq!(parse_srt_time("00:00:01,50").unwrap(), 1500);
    }

    #[test]
    fn test_parse_basic_srt() {
        let content = r#"1
00:00:01,000 --> 00:00:04,000
Hello, world!

2
00:00:05,000 --> 00:00:08,000
This is a test.
With multiple lines.

3
00:00:09,000 --> 00:00:12,000
Final subtitle.
"#;

        let doc = parse_srt(content).unwrap();

        assert_eq!(doc.len(), 3);
        assert_eq!(doc.entries()[0].start_ms(), 1000);
        assert_eq!(doc.entries()[0].end_ms(), 4000);
        assert_eq!(doc.entries()[0].text, "Hello, world!");
        assert_eq!(doc.entries()[1].text, "This is a test.\nWith multiple lines.");
        assert_eq!(doc.entries()[2].start_ms(), 9000);
    }

    #[test]
    fn test_parse_srt_without_index() {
        let content = r#"
00:00:01,000 --> 00:00:04,000
Hello, world!

00:00:05,000 --> 00:00:08,000
Another line.
"#;

        let doc = parse_srt(content).unwrap();
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_parse_malformed_timing_fails() {
        let content = "1\n00:00:xx,000 --> 00:00:04,000\nBad timing\n";
        let err = parse_srt(content).unwrap_err();
        assert!(matches!(err, ParseError::InvalidTime { .. }));
    }

    #[test]
    fn test_parse_reversed_times_fails() {
        let content = "1\n00:00:08,000 --> 00:00:04,000\nBackwards\n";
        let err = parse_srt(content).unwrap_err();
        assert!(matches!(err, ParseError::InvalidEntry { .. }));
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let content = "1\r\n00:00:01,000 --> 00:00:02,000\r\nWindows\r\n";
        let doc = parse_srt(content).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.entries()[0].text, "Windows");
    }
}
