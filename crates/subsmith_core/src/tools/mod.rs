//! Post-processing tools.
//!
//! Tools are the small document transforms offered after transcription.
//! Each is described by the same schema machinery as the models, so a
//! UI can render tool forms and model forms with one code path; the
//! appliers then turn a resolved config into the typed operation.

use crate::config::{ConfigSchema, ResolvedConfig};
use crate::subtitles::{Boundary, EditError, SubtitleDocument, TimeSpec};

pub const SET_TIME: &str = "set time";
pub const SHIFT: &str = "shift";
pub const TRANSLATE: &str = "translate";

/// Target languages offered by the translate tool.
pub const TRANSLATE_TARGETS: &[&str] = &["ja", "zh-CN", "en"];

const PART_DESCRIPTIONS: [(&str, &str); 4] = [
    ("h", "hours: Integer or float values, may be positive or negative"),
    ("m", "minutes: Integer or float values, may be positive or negative"),
    ("s", "seconds: Integer or float values, may be positive or negative"),
    ("ms", "milliseconds: Integer or float values, may be positive or negative"),
];

/// A post-processing tool: identity, description, and config schema.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    identifier: &'static str,
    description: &'static str,
    schema: ConfigSchema,
}

impl ToolDescriptor {
    pub fn identifier(&self) -> &str {
        self.identifier
    }

    pub fn description(&self) -> &str {
        self.description
    }

    pub fn config_schema(&self) -> &ConfigSchema {
        &self.schema
    }
}

fn clock_parts(mut builder: crate::config::ConfigSchemaBuilder) -> crate::config::ConfigSchemaBuilder {
    for (name, description) in PART_DESCRIPTIONS {
        builder = builder.real(name, description, Some(0.0));
    }
    builder
}

/// Tool identifiers in presentation order.
pub fn list_tools() -> Vec<&'static str> {
    vec![SET_TIME, SHIFT, TRANSLATE]
}

/// Describe a tool, or `None` for an unknown identifier.
pub fn describe_tool(identifier: &str) -> Option<ToolDescriptor> {
    match identifier {
        SET_TIME => Some(ToolDescriptor {
            identifier: SET_TIME,
            description: "Set time to a subtitle",
            schema: clock_parts(ConfigSchema::builder()).build(),
        }),
        SHIFT => Some(ToolDescriptor {
            identifier: SHIFT,
            description: "Shift all subtitles by constant time amount",
            schema: clock_parts(ConfigSchema::builder())
                .integer(
                    "frames",
                    "When specified, must be an integer number of frames",
                    None,
                )
                .real("fps", "When specified, must be a positive number.", None)
                .build(),
        }),
        TRANSLATE => Some(ToolDescriptor {
            identifier: TRANSLATE,
            description: "Translate subtitles to another language",
            schema: ConfigSchema::builder()
                .choice(
                    "target_language",
                    "Language to translate the subtitles into",
                    TRANSLATE_TARGETS,
                    Some("ja"),
                )
                .build(),
        }),
        _ => None,
    }
}

/// Build the time offset a clock-part config describes.
fn time_spec_from(config: &ResolvedConfig) -> TimeSpec {
    TimeSpec {
        hours: config.get_f64("h").unwrap_or(0.0),
        minutes: config.get_f64("m").unwrap_or(0.0),
        seconds: config.get_f64("s").unwrap_or(0.0),
        milliseconds: config.get_f64("ms").unwrap_or(0.0),
        frames: config.get_i64("frames"),
        fps: config.get_f64("fps"),
    }
}

/// Apply the shift tool to a document.
pub fn apply_shift(doc: &mut SubtitleDocument, config: &ResolvedConfig) -> Result<(), EditError> {
    doc.shift(&time_spec_from(config))
}

/// Apply the set-time tool to one boundary of one entry.
pub fn apply_set_time(
    doc: &mut SubtitleDocument,
    index: usize,
    boundary: Boundary,
    config: &ResolvedConfig,
) -> Result<(), EditError> {
    doc.set_time(index, boundary, &time_spec_from(config))
}

/// The target language a translate-tool config names.
pub fn translate_target(config: &ResolvedConfig) -> Option<&str> {
    config.get_str("target_language")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, RawConfig, RawValue};
    use crate::subtitles::SubtitleEntry;

    fn doc() -> SubtitleDocument {
        let mut doc = SubtitleDocument::new();
        doc.push(SubtitleEntry::new(1_000, 2_000, "one").unwrap());
        doc.push(SubtitleEntry::new(3_000, 4_000, "two").unwrap());
        doc
    }

    fn tool_config(identifier: &str, raw: &RawConfig) -> ResolvedConfig {
        let descriptor = describe_tool(identifier).unwrap();
        resolve(descriptor.config_schema(), raw).unwrap()
    }

    #[test]
    fn test_tool_listing_order() {
        assert_eq!(list_tools(), vec!["set time", "shift", "translate"]);
        assert!(describe_tool("resync").is_none());
    }

    #[test]
    fn test_set_time_schema_fields() {
        let descriptor = describe_tool(SET_TIME).unwrap();
        for name in ["h", "m", "s", "ms"] {
            assert!(descriptor.config_schema().get(name).is_some(), "missing {name}");
        }
        assert!(descriptor.config_schema().get("frames").is_none());
    }

    #[test]
    fn test_shift_by_seconds() {
        let mut doc = doc();
        let mut raw = RawConfig::new();
        raw.insert("s".into(), RawValue::Real(2.0));

        apply_shift(&mut doc, &tool_config(SHIFT, &raw)).unwrap();

        assert_eq!(doc.get(0).unwrap().start_ms(), 3_000);
        assert_eq!(doc.get(1).unwrap().end_ms(), 6_000);
    }

    #[test]
    fn test_shift_defaults_are_a_no_op() {
        let mut doc = doc();
        apply_shift(&mut doc, &tool_config(SHIFT, &RawConfig::new())).unwrap();
        assert_eq!(doc.get(0).unwrap().start_ms(), 1_000);
    }

    #[test]
    fn test_shift_by_frames() {
        let mut doc = doc();
        let mut raw = RawConfig::new();
        raw.insert("frames".into(), RawValue::Integer(25));
        raw.insert("fps".into(), RawValue::Real(25.0));

        apply_shift(&mut doc, &tool_config(SHIFT, &raw)).unwrap();

        assert_eq!(doc.get(0).unwrap().start_ms(), 2_000);
    }

    #[test]
    fn test_shift_frames_without_fps_is_rejected() {
        let mut doc = doc();
        let mut raw = RawConfig::new();
        raw.insert("frames".into(), RawValue::Integer(25));

        let err = apply_shift(&mut doc, &tool_config(SHIFT, &raw)).unwrap_err();
        assert!(matches!(err, EditError::InvalidArgument { .. }));
        // document untouched on error
        assert_eq!(doc.get(0).unwrap().start_ms(), 1_000);
    }

    #[test]
    fn test_set_time_moves_one_boundary() {
        let mut doc = doc();
        let mut raw = RawConfig::new();
        raw.insert("s".into(), RawValue::Real(1.5));

        apply_set_time(&mut doc, 0, Boundary::Start, &tool_config(SET_TIME, &raw)).unwrap();

        assert_eq!(doc.get(0).unwrap().start_ms(), 1_500);
        assert_eq!(doc.get(0).unwrap().end_ms(), 2_000);
        assert_eq!(doc.get(1).unwrap().start_ms(), 3_000);
    }

    #[test]
    fn test_set_time_out_of_range() {
        let mut doc = doc();
        let err = apply_set_time(
            &mut doc,
            9,
            Boundary::Start,
            &tool_config(SET_TIME, &RawConfig::new()),
        )
        .unwrap_err();
        assert!(matches!(err, EditError::IndexOutOfRange { .. }));
    }

    #[test]
    fn test_translate_tool_defaults_to_japanese() {
        let config = tool_config(TRANSLATE, &RawConfig::new());
        assert_eq!(translate_target(&config), Some("ja"));
    }

    #[test]
    fn test_translate_tool_rejects_unknown_target() {
        let descriptor = describe_tool(TRANSLATE).unwrap();
        let mut raw = RawConfig::new();
        raw.insert("target_language".into(), RawValue::Text("tlh".into()));
        assert!(resolve(descriptor.config_schema(), &raw).is_err());
    }
}
