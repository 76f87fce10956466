// Integration tests for audio normalization
//
// These verify that arbitrary supported inputs come out as 16 kHz mono
// 16-bit WAV, the format the speech backend expects.

use std::io::Cursor;

use anyhow::Result;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use scribe_bot::audio::{HttpTranscoder, TARGET_SAMPLE_RATE};
use scribe_bot::error::PipelineError;

/// Build an in-memory WAV container holding a 440 Hz sine tone.
fn sine_wav(sample_rate: u32, channels: u16, seconds: f32) -> Vec<u8> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        let frames = (sample_rate as f32 * seconds) as u32;
        for i in 0..frames {
            let value =
                (i as f32 * 2.0 * std::f32::consts::PI * 440.0 / sample_rate as f32).sin();
            let sample = (value * 0.5 * i16::MAX as f32) as i16;
            for _ in 0..channels {
                writer.write_sample(sample).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    cursor.into_inner()
}

#[test]
fn stereo_44k_normalizes_to_mono_16k() -> Result<()> {
    let normalized = HttpTranscoder::normalize(sine_wav(44_100, 2, 0.5))?;

    assert_eq!(normalized.sample_rate, TARGET_SAMPLE_RATE);
    assert_eq!(normalized.channels, 1);
    assert_eq!(normalized.bits_per_sample, 16);

    let reader = WavReader::new(Cursor::new(normalized.bytes))?;
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 16_000);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, SampleFormat::Int);
    assert!(reader.duration() > 0, "normalized audio should not be empty");

    Ok(())
}

#[test]
fn mono_8k_upsamples_to_16k() -> Result<()> {
    let normalized = HttpTranscoder::normalize(sine_wav(8_000, 1, 0.5))?;

    let reader = WavReader::new(Cursor::new(normalized.bytes))?;
    assert_eq!(reader.spec().sample_rate, 16_000);
    assert_eq!(reader.spec().channels, 1);

    // Roughly double the frames after the 2x upsample; the resampler
    // trims a little latency at the edges
    let input_frames = 4_000i64;
    let output_frames = reader.duration() as i64;
    assert!(
        (output_frames - input_frames * 2).abs() < 4096,
        "unexpected output length {}",
        output_frames
    );

    Ok(())
}

#[test]
fn already_normalized_input_keeps_its_sample_count() -> Result<()> {
    let normalized = HttpTranscoder::normalize(sine_wav(16_000, 1, 0.5))?;

    let reader = WavReader::new(Cursor::new(normalized.bytes))?;
    assert_eq!(reader.spec().sample_rate, 16_000);
    // No resampling, no downmix: frame count is preserved exactly
    assert_eq!(reader.duration(), 8_000);

    Ok(())
}

#[test]
fn garbage_bytes_fail_with_decode_error() {
    let result = HttpTranscoder::normalize(vec![0u8; 64]);

    match result {
        Err(PipelineError::Decode(_)) => {}
        other => panic!("expected a decode error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn empty_payload_fails_with_decode_error() {
    let result = HttpTranscoder::normalize(Vec::new());

    assert!(matches!(result, Err(PipelineError::Decode(_))));
}
