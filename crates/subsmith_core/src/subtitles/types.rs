//! Core subtitle types.
//!
//! All timing values are stored as `i64` milliseconds. Rounding to
//! centiseconds (ASS) or frames (MicroDVD) happens only at write time.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::subtitles::error::{EditError, ExportError};
use crate::subtitles::times::TimeSpec;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// SubRip (.srt)
    Srt,
    /// WebVTT (.vtt)
    WebVtt,
    /// Advanced SubStation Alpha (.ass)
    Ass,
    /// SubStation Alpha v4.00 (.ssa)
    Ssa,
    /// MicroDVD (.sub), frame-indexed, requires fps
    MicroDvd,
    /// JSON dump of the document
    Json,
    /// MPL2 (.mpl2), decisecond-indexed
    Mpl2,
    /// TMP (.tmp), second-indexed
    Tmp,
}

impl ExportFormat {
    /// All formats, in the order they are advertised to callers.
    pub const ALL: [ExportFormat; 8] = [
        Self::Srt,
        Self::WebVtt,
        Self::Ass,
        Self::Ssa,
        Self::MicroDvd,
        Self::Json,
        Self::Mpl2,
        Self::Tmp,
    ];

    /// Resolve a format tag such as `".srt"` or `"srt"`.
    pub fn from_tag(tag: &str) -> Result<Self, ExportError> {
        let normalized = tag.trim().trim_start_matches('.').to_lowercase();
        match normalized.as_str() {
            "srt" => Ok(Self::Srt),
            "vtt" => Ok(Self::WebVtt),
            "ass" => Ok(Self::Ass),
            "ssa" => Ok(Self::Ssa),
            "sub" => Ok(Self::MicroDvd),
            "json" => Ok(Self::Json),
            "mpl2" => Ok(Self::Mpl2),
            "tmp" => Ok(Self::Tmp),
            _ => Err(ExportError::UnsupportedFormat(tag.to_string())),
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::from_tag(ext).ok()
    }

    /// The format tag, dot included.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Srt => ".srt",
            Self::WebVtt => ".vtt",
            Self::Ass => ".ass",
            Self::Ssa => ".ssa",
            Self::MicroDvd => ".sub",
            Self::Json => ".json",
            Self::Mpl2 => ".mpl2",
            Self::Tmp => ".tmp",
        }
    }

    /// The typical file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        &self.tag()[1..]
    }

    /// Whether this format indexes time in frames and needs an fps value.
    pub fn requires_fps(&self) -> bool {
        matches!(self, Self::MicroDvd)
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Options for exporting a subtitle document.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Frame rate, mandatory for frame-indexed formats.
    pub fps: Option<f64>,
}

impl ExportOptions {
    /// Options with a frame rate set.
    pub fn with_fps(fps: f64) -> Self {
        Self { fps: Some(fps) }
    }
}

/// One boundary of a subtitle entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// The entry's start time.
    Start,
    /// The entry's end time.
    End,
}

/// A single timed text entry.
///
/// Timings are non-negative and ordered (`start <= end`); every operation
/// that touches them preserves both properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleEntry {
    start_ms: i64,
    end_ms: i64,
    /// Text content, may be empty.
    pub text: String,
}

impl SubtitleEntry {
    /// Create a new entry.
    ///
    /// Fails when a timing is negative or `start_ms > end_ms`.
    pub fn new(start_ms: i64, end_ms: i64, text: impl Into<String>) -> Result<Self, EditError> {
        if start_ms < 0 || end_ms < 0 {
            return Err(EditError::invalid_argument(
                "entry",
                format!("negative time ({start_ms}ms, {end_ms}ms)"),
            ));
        }
        if start_ms > end_ms {
            return Err(EditError::invalid_argument(
                "entry",
                format!("start {start_ms}ms is after end {end_ms}ms"),
            ));
        }
        Ok(Self {
            start_ms,
            end_ms,
            text: text.into(),
        })
    }

    /// Start time in milliseconds.
    pub fn start_ms(&self) -> i64 {
        self.start_ms
    }

    /// End time in milliseconds.
    pub fn end_ms(&self) -> i64 {
        self.end_ms
    }

    /// Duration in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    /// Copy of this entry with the same timing and different text.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            start_ms: self.start_ms,
            end_ms: self.end_ms,
            text: text.into(),
        }
    }

    /// Shift this entry by an offset, clamping at zero.
    fn shift_ms(&mut self, delta_ms: i64) {
        self.start_ms = (self.start_ms + delta_ms).max(0);
        self.end_ms = (self.end_ms + delta_ms).max(0);
    }
}

/// An ordered sequence of timed text entries.
///
/// Insertion order is kept as-is; temporal ordering is not enforced and
/// entries may overlap. A document is owned by one session at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleDocument {
    entries: Vec<SubtitleEntry>,
}

impl SubtitleDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from entries, keeping their order.
    pub fn from_entries(entries: Vec<SubtitleEntry>) -> Self {
        Self { entries }
    }

    /// Append an entry.
    pub fn push(&mut self, entry: SubtitleEntry) {
        self.entries.push(entry);
    }

    /// All entries, in document order.
    pub fn entries(&self) -> &[SubtitleEntry] {
        &self.entries
    }

    /// The entry at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&SubtitleEntry> {
        self.entries.get(index)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, SubtitleEntry> {
        self.entries.iter()
    }

    /// Total duration in milliseconds (largest end time).
    pub fn duration_ms(&self) -> i64 {
        self.entries.iter().map(|e| e.end_ms).max().unwrap_or(0)
    }

    /// Replace the text of the entry at `index`. Timings are untouched.
    pub fn edit_text(&mut self, index: usize, new_text: impl Into<String>) -> Result<(), EditError> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or_else(|| EditError::out_of_range(index, len))?;
        entry.text = new_text.into();
        Ok(())
    }

    /// Shift every entry by a signed time amount.
    ///
    /// Times are clamped at zero; a positive shift followed by the same
    /// negative shift restores the original timings.
    pub fn shift(&mut self, delta: &TimeSpec) -> Result<(), EditError> {
        let delta_ms = delta.to_ms("shift")?;
        self.shift_ms(delta_ms);
        Ok(())
    }

    /// Shift every entry by signed milliseconds, clamping at zero.
    pub fn shift_ms(&mut self, delta_ms: i64) {
        for entry in &mut self.entries {
            entry.shift_ms(delta_ms);
        }
    }

    /// Assign an absolute time to one boundary of one entry.
    ///
    /// The other boundary and all other entries are untouched. Fails when
    /// the time is negative or would put the entry's start after its end.
    pub fn set_time(
        &mut self,
        index: usize,
        boundary: Boundary,
        time: &TimeSpec,
    ) -> Result<(), EditError> {
        let ms = time.to_ms("set_time")?;
        if ms < 0 {
            return Err(EditError::invalid_argument(
                "set_time",
                format!("absolute time cannot be negative, got {ms}ms"),
            ));
        }

        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or_else(|| EditError::out_of_range(index, len))?;

        match boundary {
            Boundary::Start => {
                if ms > entry.end_ms {
                    return Err(EditError::invalid_argument(
                        "set_time",
                        format!("start {ms}ms would be after end {}ms", entry.end_ms),
                    ));
                }
                entry.start_ms = ms;
            }
            Boundary::End => {
                if ms < entry.start_ms {
                    return Err(EditError::invalid_argument(
                        "set_time",
                        format!("end {ms}ms would be before start {}ms", entry.start_ms),
                    ));
                }
                entry.end_ms = ms;
            }
        }
        Ok(())
    }

    /// Merge another document into this one, ordering entries by start
    /// time. Entries with equal start times keep their relative order.
    pub fn merge(&mut self, other: SubtitleDocument) {
        self.entries.extend(other.entries);
        self.sort_by_time();
    }

    /// Sort entries by start time (stable).
    pub fn sort_by_time(&mut self) {
        self.entries.sort_by_key(|e| e.start_ms);
    }
}

impl<'a> IntoIterator for &'a SubtitleDocument {
    type Item = &'a SubtitleEntry;
    type IntoIter = std::slice::Iter<'a, SubtitleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(entries: &[(i64, i64, &str)]) -> SubtitleDocument {
        SubtitleDocument::from_entries(
            entries
                .iter()
                .map(|&(s, e, t)| SubtitleEntry::new(s, e, t).unwrap())
                .collect(),
        )
    }

    #[test]
    fn test_format_from_tag() {
        assert_eq!(ExportFormat::from_tag(".srt").unwrap(), ExportFormat::Srt);
        assert_eq!(ExportFormat::from_tag("srt").unwrap(), ExportFormat::Srt);
        assert_eq!(ExportFormat::from_tag(".SUB").unwrap(), ExportFormat::MicroDvd);
        assert!(ExportFormat::from_tag(".docx").is_err());
    }

    #[test]
    fn test_format_from_extension() {
        use std::path::Path;
        assert_eq!(
            ExportFormat::from_extension(Path::new("out.vtt")),
            Some(ExportFormat::WebVtt)
        );
        assert_eq!(ExportFormat::from_extension(Path::new("out")), None);
    }

    #[test]
    fn test_requires_fps() {
        assert!(ExportFormat::MicroDvd.requires_fps());
        assert!(!ExportFormat::Srt.requires_fps());
    }

    #[test]
    fn test_entry_rejects_invalid_times() {
        assert!(SubtitleEntry::new(-1, 100, "a").is_err());
        assert!(SubtitleEntry::new(200, 100, "a").is_err());
        assert!(SubtitleEntry::new(100, 100, "a").is_ok());
    }

    #[test]
    fn test_edit_text() {
        let mut d = doc(&[(0, 1000, "one"), (1000, 2000, "two")]);
        d.edit_text(1, "changed").unwrap();
        assert_eq!(d.entries()[1].text, "changed");
        assert_eq!(d.entries()[0].text, "one");

        let err = d.edit_text(2, "nope").unwrap_err();
        assert!(matches!(err, EditError::IndexOutOfRange { index: 2, len: 2 }));
    }

    #[test]
    fn test_shift_round_trip() {
        let original = doc(&[(10, 500, "a"), (1500, 3000, "b")]);
        let mut d = original.clone();
        d.shift(&TimeSpec::from_parts(1.0, 0.0, 0.0, 0.0)).unwrap();
        assert_eq!(d.entries()[0].start_ms(), 3_600_010);
        d.shift(&TimeSpec::from_parts(-1.0, 0.0, 0.0, 0.0)).unwrap();
        assert_eq!(d, original);
    }

    #[test]
    fn test_shift_clamps_at_zero() {
        let mut d = doc(&[(100, 600, "a")]);
        d.shift_ms(-300);
        assert_eq!(d.entries()[0].start_ms(), 0);
        assert_eq!(d.entries()[0].end_ms(), 300);
    }

    #[test]
    fn test_shift_by_frames() {
        let mut d = doc(&[(0, 1000, "a")]);
        d.shift(&TimeSpec::from_frames(25, 25.0)).unwrap();
        assert_eq!(d.entries()[0].start_ms(), 1000);
        assert_eq!(d.entries()[0].end_ms(), 2000);
    }

    #[test]
    fn test_shift_frames_without_fps_rejected() {
        let mut d = doc(&[(0, 1000, "a")]);
        let spec = TimeSpec {
            frames: Some(10),
            ..Default::default()
        };
        assert!(d.shift(&spec).is_err());
        // document untouched
        assert_eq!(d.entries()[0].start_ms(), 0);
    }

    #[test]
    fn test_set_time_single_boundary() {
        let mut d = doc(&[(0, 1000, "a"), (2000, 3000, "b")]);
        d.set_time(1, Boundary::Start, &TimeSpec::from_parts(0.0, 0.0, 2.5, 0.0))
            .unwrap();
        assert_eq!(d.entries()[1].start_ms(), 2500);
        assert_eq!(d.entries()[1].end_ms(), 3000);
        assert_eq!(d.entries()[0].start_ms(), 0);
        assert_eq!(d.entries()[0].end_ms(), 1000);
    }

    #[test]
    fn test_set_time_rejects_crossed_boundaries() {
        let mut d = doc(&[(1000, 2000, "a")]);
        let err = d
            .set_time(0, Boundary::Start, &TimeSpec::from_parts(0.0, 0.0, 5.0, 0.0))
            .unwrap_err();
        assert!(err.to_string().contains("after end"));

        let err = d
            .set_time(0, Boundary::End, &TimeSpec::from_parts(0.0, 0.0, 0.5, 0.0))
            .unwrap_err();
        assert!(err.to_string().contains("before start"));

        // document untouched on failure
        assert_eq!(d.entries()[0].start_ms(), 1000);
        assert_eq!(d.entries()[0].end_ms(), 2000);
    }

    #[test]
    fn test_set_time_rejects_negative() {
        let mut d = doc(&[(1000, 2000, "a")]);
        let err = d
            .set_time(0, Boundary::Start, &TimeSpec::from_parts(0.0, 0.0, -3.0, 0.0))
            .unwrap_err();
        assert!(err.to_string().contains("cannot be negative"));
    }

    #[test]
    fn test_set_time_out_of_range() {
        let mut d = doc(&[(0, 1000, "a")]);
        let err = d
            .set_time(3, Boundary::End, &TimeSpec::from_parts(0.0, 0.0, 2.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, EditError::IndexOutOfRange { index: 3, len: 1 }));
    }

    #[test]
    fn test_merge_orders_by_start_time() {
        let mut a = doc(&[(0, 1000, "a1"), (5000, 6000, "a2")]);
        let b = doc(&[(2000, 3000, "b1"), (5000, 5500, "b2")]);
        a.merge(b);

        let texts: Vec<&str> = a.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["a1", "b1", "a2", "b2"]);
    }

    #[test]
    fn test_duration_ms() {
        assert_eq!(SubtitleDocument::new().duration_ms(), 0);
        let d = doc(&[(0, 4000, "a"), (1000, 2000, "b")]);
        assert_eq!(d.duration_ms(), 4000);
    }
}
