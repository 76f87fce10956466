use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::recognizer::{RecognitionResult, SpeechRecognizer};
use super::storage::ObjectStore;
use crate::audio::NormalizedAudio;
use crate::error::PipelineError;

/// The transcript selected from the backend's candidates.
#[derive(Debug, Clone)]
pub struct TranscriptResult {
    pub text: String,
    pub confidence: Option<f32>,
}

/// Uploads normalized audio to durable storage and runs batch recognition.
///
/// Uploaded objects are retained permanently; there is no cleanup step.
pub struct TranscriptionGateway {
    store: Arc<dyn ObjectStore>,
    recognizer: Arc<dyn SpeechRecognizer>,
    bucket: String,
    language: String,
}

impl TranscriptionGateway {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        recognizer: Arc<dyn SpeechRecognizer>,
        bucket: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            store,
            recognizer,
            bucket: bucket.into(),
            language: language.into(),
        }
    }

    /// Upload the audio under a fresh object name and transcribe it.
    ///
    /// Returns `NoSpeech` when the backend produces no result candidates
    /// (silence or unintelligible audio); the caller skips the reply.
    pub async fn transcribe(
        &self,
        audio: NormalizedAudio,
    ) -> Result<TranscriptResult, PipelineError> {
        let object_name = format!("{}.wav", Uuid::new_v4());

        let uri = self
            .store
            .upload(&self.bucket, &object_name, audio.bytes)
            .await?;

        let results = self.recognizer.recognize(&self.language, &uri).await?;

        let transcript = Self::best_transcript(&results).ok_or(PipelineError::NoSpeech)?;

        info!(
            "Transcribed {} ({} chars, confidence {:?})",
            object_name,
            transcript.text.len(),
            transcript.confidence
        );

        Ok(transcript)
    }

    /// Re-run recognition on an already-uploaded object, collecting the
    /// most probable candidate of every result segment.
    pub async fn recognize_stored(&self, object_name: &str) -> Result<Vec<String>, PipelineError> {
        let uri = format!("gs://{}/{}", self.bucket, object_name);

        let results = self.recognizer.recognize(&self.language, &uri).await?;

        Ok(results
            .iter()
            .filter_map(|result| result.alternatives.first())
            .map(|alternative| alternative.transcript.clone())
            .collect())
    }

    /// First alternative of the first result is the most probable candidate.
    fn best_transcript(results: &[RecognitionResult]) -> Option<TranscriptResult> {
        let alternative = results.first()?.alternatives.first()?;

        if alternative.transcript.is_empty() {
            return None;
        }

        Some(TranscriptResult {
            text: alternative.transcript.clone(),
            confidence: alternative.confidence,
        })
    }
}
