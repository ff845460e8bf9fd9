//! Subtitle writers for the supported export formats.
//!
//! Each writer is a pure function that takes a document and returns a
//! formatted string; option validation happens in [`write_content`].

mod ass;
mod microdvd;
mod plain;
mod srt;
mod vtt;

pub use ass::{format_ass_time, write_ass, write_ssa};
pub use microdvd::write_microdvd;
pub use plain::{write_json, write_mpl2, write_tmp};
pub use srt::{format_srt_time, write_srt};
pub use vtt::{format_vtt_time, write_vtt};

use crate::subtitles::error::ExportError;
use crate::subtitles::types::{ExportFormat, ExportOptions, SubtitleDocument};

/// Write a document to a string in the specified format.
///
/// Fails when a format-mandatory option is missing or unusable; the
/// document itself is never invalid input.
pub fn write_content(
    doc: &SubtitleDocument,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Srt => Ok(write_srt(doc)),
        ExportFormat::WebVtt => Ok(write_vtt(doc)),
        ExportFormat::Ass => Ok(write_ass(doc)),
        ExportFormat::Ssa => Ok(write_ssa(doc)),
        ExportFormat::MicroDvd => {
            let fps = options
                .fps
                .ok_or_else(|| ExportError::missing_option(format, "fps"))?;
            if fps <= 0.0 {
                return Err(ExportError::invalid_option(format, "fps", fps.to_string()));
            }
            Ok(write_microdvd(doc, fps))
        }
        ExportFormat::Json => Ok(write_json(doc)),
        ExportFormat::Mpl2 => Ok(write_mpl2(doc)),
        ExportFormat::Tmp => Ok(write_tmp(doc)),
    }
}

/// Ordered list of supported format tags, for selection UIs.
pub fn available_export_formats() -> Vec<&'static str> {
    ExportFormat::ALL.iter().map(|f| f.tag()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtitles::types::SubtitleEntry;

    fn sample() -> SubtitleDocument {
        let mut doc = SubtitleDocument::new();
        doc.push(SubtitleEntry::new(0, 1000, "Hi").unwrap());
        doc
    }

    #[test]
    fn test_dispatch_covers_all_formats() {
        let doc = sample();
        let options = ExportOptions::with_fps(25.0);
        for format in ExportFormat::ALL {
            let output = write_content(&doc, format, &options).unwrap();
            assert!(!output.is_empty(), "no output for {format}");
        }
    }

    #[test]
    fn test_microdvd_requires_fps() {
        let err = write_content(&sample(), ExportFormat::MicroDvd, &ExportOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ExportError::MissingOption {
                format: ExportFormat::MicroDvd,
                option: "fps"
            }
        ));
    }

    #[test]
    fn test_microdvd_rejects_non_positive_fps() {
        let err = write_content(
            &sample(),
            ExportFormat::MicroDvd,
            &ExportOptions::with_fps(0.0),
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::InvalidOption { .. }));
    }

    #[test]
    fn test_fps_ignored_for_time_indexed_formats() {
        let with = write_content(&sample(), ExportFormat::Srt, &ExportOptions::with_fps(25.0));
        let without = write_content(&sample(), ExportFormat::Srt, &ExportOptions::default());
        assert_eq!(with.unwrap(), without.unwrap());
    }

    #[test]
    fn test_available_export_formats_order() {
        let tags = available_export_formats();
        assert_eq!(
            tags,
            vec![".srt", ".vtt", ".ass", ".ssa", ".sub", ".json", ".mpl2", ".tmp"]
        );
    }
}
