use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PipelineError;

/// One candidate transcription, ranked by confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionAlternative {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// One recognized segment with its ranked alternatives. The first
/// alternative is the most probable one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognitionResult {
    #[serde(default)]
    pub alternatives: Vec<RecognitionAlternative>,
}

/// Speech recognition backend (synchronous batch recognition; the call
/// blocks for the round-trip, there is no streaming API).
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Recognize speech in a stored audio object, addressed by storage URI.
    async fn recognize(
        &self,
        language_code: &str,
        audio_uri: &str,
    ) -> Result<Vec<RecognitionResult>, PipelineError>;
}

/// Google Cloud Speech synchronous recognition endpoint.
const SPEECH_RECOGNIZE_URL: &str = "https://speech.googleapis.com/v1/speech:recognize";

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    config: RecognizeConfig<'a>,
    audio: RecognizeAudio<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognizeConfig<'a> {
    language_code: &'a str,
}

#[derive(Debug, Serialize)]
struct RecognizeAudio<'a> {
    uri: &'a str,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

/// Recognizer backed by the Google Cloud Speech REST API.
pub struct GoogleSpeechClient {
    http: reqwest::Client,
    api_token: String,
    endpoint: String,
}

impl GoogleSpeechClient {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_token: api_token.into(),
            endpoint: SPEECH_RECOGNIZE_URL.to_string(),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for GoogleSpeechClient {
    async fn recognize(
        &self,
        language_code: &str,
        audio_uri: &str,
    ) -> Result<Vec<RecognitionResult>, PipelineError> {
        let request = RecognizeRequest {
            config: RecognizeConfig { language_code },
            audio: RecognizeAudio { uri: audio_uri },
        };

        debug!("Recognizing {} ({})", audio_uri, language_code);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::Recognition(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(PipelineError::Recognition(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let parsed: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Recognition(e.to_string()))?;

        Ok(parsed.results)
    }
}
