//! WAV decoding for local engines.
//!
//! whisper.cpp consumes 16 kHz mono f32 samples; audio decoding beyond
//! that is delegated to whatever produced the file.

use std::path::Path;

use crate::engines::TranscribeError;

/// Read a 16 kHz mono WAV file into f32 samples in [-1, 1].
///
/// Accepts PCM int16 and float32 sample formats.
pub fn read_wav_samples(path: &Path) -> Result<Vec<f32>, TranscribeError> {
    let mut reader =
        hound::WavReader::open(path).map_err(|e| TranscribeError::media_read(path, e.to_string()))?;
    let spec = reader.spec();

    if spec.channels != 1 {
        return Err(TranscribeError::unsupported_audio(
            path,
            format!("expected 1 channel, found {}", spec.channels),
        ));
    }

    if spec.sample_rate != 16_000 {
        return Err(TranscribeError::unsupported_audio(
            path,
            format!("expected 16000 Hz sample rate, found {} Hz", spec.sample_rate),
        ));
    }

    match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|sample| sample.map(|s| s as f32 / i16::MAX as f32))
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|e| TranscribeError::media_read(path, e.to_string())),
        (hound::SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|e| TranscribeError::media_read(path, e.to_string())),
        (format, bits) => Err(TranscribeError::unsupported_audio(
            path,
            format!("unsupported sample format {format:?} with {bits} bits per sample"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_reads_16k_mono_int16() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.wav");
        write_wav(&path, 16_000, 1, &[0, i16::MAX, i16::MIN / 2]);

        let samples = read_wav_samples(&path).unwrap();
        assert_eq!(samples.len(), 3);
        assert!((samples[0] - 0.0).abs() < 1e-6);
        assert!((samples[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_wrong_sample_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rate.wav");
        write_wav(&path, 44_100, 1, &[0]);

        let err = read_wav_samples(&path).unwrap_err();
        assert!(matches!(err, TranscribeError::UnsupportedAudio { .. }));
        assert!(err.to_string().contains("44100"));
    }

    #[test]
    fn test_rejects_stereo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_wav(&path, 16_000, 2, &[0, 0]);

        let err = read_wav_samples(&path).unwrap_err();
        assert!(matches!(err, TranscribeError::UnsupportedAudio { .. }));
    }

    #[test]
    fn test_missing_file_is_media_read_error() {
        let err = read_wav_samples(Path::new("/no/such/file.wav")).unwrap_err();
        assert!(matches!(err, TranscribeError::MediaRead { .. }));
    }
}
