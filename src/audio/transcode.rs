use std::io::Cursor;

use async_trait::async_trait;
use hound::{SampleFormat, WavSpec, WavWriter};
use rubato::{FftFixedIn, Resampler};
use tracing::debug;

use super::decode::decode;
use crate::error::PipelineError;

/// Target format expected by the speech backend.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;
pub const TARGET_CHANNELS: u16 = 1;
pub const TARGET_BITS_PER_SAMPLE: u16 = 16;

/// Canonical PCM WAV, fully materialized and ready for upload.
#[derive(Debug, Clone)]
pub struct NormalizedAudio {
    /// Complete RIFF/WAV byte stream
    pub bytes: Vec<u8>,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

/// Voice transcoder seam between the dispatcher and the audio stack.
#[async_trait]
pub trait VoiceTranscoder: Send + Sync {
    /// Retrieve a remote voice attachment and normalize it for recognition.
    async fn transcode(&self, url: &str) -> Result<NormalizedAudio, PipelineError>;
}

/// Fetches attachments over HTTP and normalizes them to 16 kHz mono WAV.
pub struct HttpTranscoder {
    http: reqwest::Client,
}

impl HttpTranscoder {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Download the full attachment payload into memory. The container must
    /// be buffered before decoding; there is no partial decode.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, PipelineError> {
        debug!("Fetching attachment from {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::Fetch(e.to_string()))?
            .error_for_status()
            .map_err(|e| PipelineError::Fetch(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PipelineError::Fetch(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    /// Normalize a buffered audio container to the recognizer's input
    /// format: single channel, 16-bit samples, 16 kHz, WAV container.
    pub fn normalize(bytes: Vec<u8>) -> Result<NormalizedAudio, PipelineError> {
        let decoded = decode(bytes)?;

        debug!(
            "Decoded audio: {}Hz, {} channels, {} samples",
            decoded.sample_rate,
            decoded.channels,
            decoded.samples.len()
        );

        let mono = downmix_to_mono(&decoded.samples, decoded.channels);

        let resampled = if decoded.sample_rate == TARGET_SAMPLE_RATE {
            mono
        } else {
            resample(&mono, decoded.sample_rate, TARGET_SAMPLE_RATE)?
        };

        let pcm: Vec<i16> = resampled
            .iter()
            .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
            .collect();

        let bytes = encode_wav(&pcm)?;

        Ok(NormalizedAudio {
            bytes,
            sample_rate: TARGET_SAMPLE_RATE,
            channels: TARGET_CHANNELS,
            bits_per_sample: TARGET_BITS_PER_SAMPLE,
        })
    }
}

impl Default for HttpTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VoiceTranscoder for HttpTranscoder {
    async fn transcode(&self, url: &str) -> Result<NormalizedAudio, PipelineError> {
        let payload = self.fetch(url).await?;
        Self::normalize(payload)
    }
}

/// Average interleaved frames down to a single channel.
fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    let channels = channels as usize;
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Resample mono f32 PCM between arbitrary rates.
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, PipelineError> {
    const CHUNK_SIZE: usize = 1024;

    let mut resampler =
        FftFixedIn::<f32>::new(from_rate as usize, to_rate as usize, CHUNK_SIZE, 1, 1)
            .map_err(|e| PipelineError::Decode(format!("resampler init failed: {}", e)))?;

    let estimated = samples.len() * to_rate as usize / from_rate as usize;
    let mut output = Vec::with_capacity(estimated);

    let mut chunks = samples.chunks_exact(CHUNK_SIZE);
    for chunk in &mut chunks {
        let resampled = resampler
            .process(&[chunk], None)
            .map_err(|e| PipelineError::Decode(format!("resampling failed: {}", e)))?;
        if let Some(channel) = resampled.into_iter().next() {
            output.extend(channel);
        }
    }

    let remainder = chunks.remainder();
    if !remainder.is_empty() {
        let resampled = resampler
            .process_partial(Some(&[remainder]), None)
            .map_err(|e| PipelineError::Decode(format!("resampling failed: {}", e)))?;
        if let Some(channel) = resampled.into_iter().next() {
            output.extend(channel);
        }
    }

    Ok(output)
}

/// Encode 16-bit mono samples as an in-memory WAV byte stream.
fn encode_wav(samples: &[i16]) -> Result<Vec<u8>, PipelineError> {
    let spec = WavSpec {
        channels: TARGET_CHANNELS,
        sample_rate: TARGET_SAMPLE_RATE,
        bits_per_sample: TARGET_BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)
            .map_err(|e| PipelineError::Decode(format!("WAV encoding failed: {}", e)))?;

        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| PipelineError::Decode(format!("WAV encoding failed: {}", e)))?;
        }

        writer
            .finalize()
            .map_err(|e| PipelineError::Decode(format!("WAV encoding failed: {}", e)))?;
    }

    Ok(cursor.into_inner())
}
