// Integration tests for the transcription gateway
//
// These verify upload naming, result selection, and the explicit
// no-speech outcome against stubbed storage and recognition backends.

use std::sync::Arc;

use async_trait::async_trait;
use scribe_bot::audio::NormalizedAudio;
use scribe_bot::error::PipelineError;
use scribe_bot::stt::{
    ObjectStore, RecognitionAlternative, RecognitionResult, SpeechRecognizer,
    TranscriptionGateway,
};
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct RecordedUpload {
    bucket: String,
    object_name: String,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct MemoryStore {
    uploads: Mutex<Vec<RecordedUpload>>,
    fail: bool,
}

impl MemoryStore {
    fn failing() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn upload(
        &self,
        bucket: &str,
        object_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, PipelineError> {
        if self.fail {
            return Err(PipelineError::Upload("stub upload failure".to_string()));
        }

        let mut uploads = self.uploads.lock().await;
        uploads.push(RecordedUpload {
            bucket: bucket.to_string(),
            object_name: object_name.to_string(),
            bytes,
        });

        Ok(format!("gs://{}/{}", bucket, object_name))
    }
}

#[derive(Default)]
struct StubRecognizer {
    results: Vec<RecognitionResult>,
    calls: Mutex<Vec<(String, String)>>,
}

impl StubRecognizer {
    fn returning(results: Vec<RecognitionResult>) -> Self {
        Self {
            results,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for StubRecognizer {
    async fn recognize(
        &self,
        language_code: &str,
        audio_uri: &str,
    ) -> Result<Vec<RecognitionResult>, PipelineError> {
        let mut calls = self.calls.lock().await;
        calls.push((language_code.to_string(), audio_uri.to_string()));
        Ok(self.results.clone())
    }
}

fn alternative(transcript: &str, confidence: Option<f32>) -> RecognitionAlternative {
    RecognitionAlternative {
        transcript: transcript.to_string(),
        confidence,
    }
}

fn audio() -> NormalizedAudio {
    NormalizedAudio {
        bytes: vec![82, 73, 70, 70, 1, 2, 3, 4],
        sample_rate: 16_000,
        channels: 1,
        bits_per_sample: 16,
    }
}

#[tokio::test]
async fn selects_first_alternative_of_first_result() {
    let store = Arc::new(MemoryStore::default());
    let recognizer = Arc::new(StubRecognizer::returning(vec![
        RecognitionResult {
            alternatives: vec![
                alternative("bonjour", Some(0.92)),
                alternative("bonjou", Some(0.55)),
            ],
        },
        RecognitionResult {
            alternatives: vec![alternative("au revoir", Some(0.88))],
        },
    ]));
    let gateway =
        TranscriptionGateway::new(store, recognizer, "audio-messages", "fr-FR");

    let transcript = gateway.transcribe(audio()).await.unwrap();

    assert_eq!(transcript.text, "bonjour");
    assert_eq!(transcript.confidence, Some(0.92));
}

#[tokio::test]
async fn empty_result_set_yields_no_speech() {
    let store = Arc::new(MemoryStore::default());
    let recognizer = Arc::new(StubRecognizer::returning(Vec::new()));
    let gateway =
        TranscriptionGateway::new(store, recognizer, "audio-messages", "fr-FR");

    let result = gateway.transcribe(audio()).await;

    assert!(matches!(result, Err(PipelineError::NoSpeech)));
}

#[tokio::test]
async fn empty_alternatives_also_yield_no_speech() {
    let store = Arc::new(MemoryStore::default());
    let recognizer = Arc::new(StubRecognizer::returning(vec![RecognitionResult {
        alternatives: Vec::new(),
    }]));
    let gateway =
        TranscriptionGateway::new(store, recognizer, "audio-messages", "fr-FR");

    let result = gateway.transcribe(audio()).await;

    assert!(matches!(result, Err(PipelineError::NoSpeech)));
}

#[tokio::test]
async fn uploads_get_unique_wav_object_names() {
    let store = Arc::new(MemoryStore::default());
    let recognizer = Arc::new(StubRecognizer::returning(vec![RecognitionResult {
        alternatives: vec![alternative("bonjour", None)],
    }]));
    let gateway = TranscriptionGateway::new(
        store.clone(),
        recognizer.clone(),
        "audio-messages",
        "fr-FR",
    );

    gateway.transcribe(audio()).await.unwrap();
    gateway.transcribe(audio()).await.unwrap();

    let uploads = store.uploads.lock().await;
    assert_eq!(uploads.len(), 2);
    assert_ne!(uploads[0].object_name, uploads[1].object_name);

    for upload in uploads.iter() {
        assert!(upload.object_name.ends_with(".wav"));
        assert_eq!(upload.bucket, "audio-messages");
        assert_eq!(upload.bytes, audio().bytes);
    }

    // The recognizer was handed the storage URI of each upload
    let calls = recognizer.calls.lock().await;
    assert_eq!(calls.len(), 2);
    for (i, (language, uri)) in calls.iter().enumerate() {
        assert_eq!(language, "fr-FR");
        assert_eq!(
            uri,
            &format!("gs://audio-messages/{}", uploads[i].object_name)
        );
    }
}

#[tokio::test]
async fn upload_failure_skips_recognition() {
    let store = Arc::new(MemoryStore::failing());
    let recognizer = Arc::new(StubRecognizer::returning(vec![RecognitionResult {
        alternatives: vec![alternative("bonjour", None)],
    }]));
    let gateway = TranscriptionGateway::new(
        store,
        recognizer.clone(),
        "audio-messages",
        "fr-FR",
    );

    let result = gateway.transcribe(audio()).await;

    assert!(matches!(result, Err(PipelineError::Upload(_))));
    assert!(recognizer.calls.lock().await.is_empty());
}

#[tokio::test]
async fn recognize_stored_collects_every_result_head() {
    let store = Arc::new(MemoryStore::default());
    let recognizer = Arc::new(StubRecognizer::returning(vec![
        RecognitionResult {
            alternatives: vec![
                alternative("bonjour", Some(0.92)),
                alternative("bonjou", Some(0.55)),
            ],
        },
        RecognitionResult {
            alternatives: vec![alternative("au revoir", Some(0.88))],
        },
    ]));
    let gateway = TranscriptionGateway::new(
        store,
        recognizer.clone(),
        "audio-messages",
        "fr-FR",
    );

    let transcripts = gateway.recognize_stored("existing.wav").await.unwrap();

    assert_eq!(transcripts, vec!["bonjour", "au revoir"]);

    let calls = recognizer.calls.lock().await;
    assert_eq!(calls[0].1, "gs://audio-messages/existing.wav");
}
