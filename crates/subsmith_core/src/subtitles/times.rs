//! Time values and conversions.
//!
//! All timing values are stored as `i64` milliseconds. Conversions from
//! clock parts or frame counts round to the nearest millisecond; rounding
//! to coarser precision (centiseconds for ASS, frames for MicroDVD)
//! happens only at write time.

use crate::subtitles::error::EditError;

/// A time amount expressed either as clock parts or as a frame count.
///
/// Clock parts may be fractional and negative (a delta for [`shift`]);
/// `frames` and `fps` must be supplied together and take precedence over
/// the clock parts when present.
///
/// [`shift`]: crate::subtitles::SubtitleDocument::shift
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeSpec {
    /// Hours, may be fractional and negative.
    pub hours: f64,
    /// Minutes, may be fractional and negative.
    pub minutes: f64,
    /// Seconds, may be fractional and negative.
    pub seconds: f64,
    /// Milliseconds, may be fractional and negative.
    pub milliseconds: f64,
    /// Frame count; requires `fps`.
    pub frames: Option<i64>,
    /// Frame rate; requires `frames`, must be positive.
    pub fps: Option<f64>,
}

impl TimeSpec {
    /// Create a spec from clock parts.
    pub fn from_parts(hours: f64, minutes: f64, seconds: f64, milliseconds: f64) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            milliseconds,
            ..Default::default()
        }
    }

    /// Create a spec from a frame count at a frame rate.
    pub fn from_frames(frames: i64, fps: f64) -> Self {
        Self {
            frames: Some(frames),
            fps: Some(fps),
            ..Default::default()
        }
    }

    /// Resolve to signed milliseconds.
    ///
    /// `operation` names the calling operation in error messages. Fails
    /// when exactly one of `frames`/`fps` is supplied, or when `fps` is
    /// not positive. When both are supplied they define the amount and
    /// the clock parts are ignored.
    pub fn to_ms(&self, operation: &'static str) -> Result<i64, EditError> {
        match (self.frames, self.fps) {
            (None, None) => Ok(parts_to_ms(
                self.hours,
                self.minutes,
                self.seconds,
                self.milliseconds,
            )),
            (Some(frames), Some(fps)) => {
                if fps <= 0.0 {
                    return Err(EditError::invalid_argument(
                        operation,
                        format!("fps must be positive, got {fps}"),
                    ));
                }
                Ok(frames_to_ms(frames, fps))
            }
            (Some(_), None) => Err(EditError::invalid_argument(
                operation,
                "frames was supplied without fps",
            )),
            (None, Some(_)) => Err(EditError::invalid_argument(
                operation,
                "fps was supplied without frames",
            )),
        }
    }
}

/// Convert clock parts to milliseconds, rounding to the nearest integer.
pub fn parts_to_ms(hours: f64, minutes: f64, seconds: f64, milliseconds: f64) -> i64 {
    (hours * 3_600_000.0 + minutes * 60_000.0 + seconds * 1000.0 + milliseconds).round() as i64
}

/// Convert a frame count to milliseconds at the given frame rate.
pub fn frames_to_ms(frames: i64, fps: f64) -> i64 {
    (frames as f64 * (1000.0 / fps)).round() as i64
}

/// Convert milliseconds to a frame number at the given frame rate.
pub fn ms_to_frames(ms: i64, fps: f64) -> i64 {
    (ms as f64 * (fps / 1000.0)).round() as i64
}

/// Format milliseconds as `H:MM:SS` or, with `fractions`, `H:MM:SS.mmm`.
pub fn ms_to_str(ms: i64, fractions: bool) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let ms = ms.unsigned_abs();

    let millis = ms % 1000;
    let total_secs = ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    if fractions {
        format!("{sign}{hours}:{mins:02}:{secs:02}.{millis:03}")
    } else {
        format!("{sign}{hours}:{mins:02}:{secs:02}")
    }
}
