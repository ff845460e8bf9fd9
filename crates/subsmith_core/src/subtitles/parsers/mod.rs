//! Subtitle parsers.
//!
//! Only SRT is parsed; the other supported formats are write-only.

mod srt;

pub use srt::{parse_srt, parse_srt_time};
