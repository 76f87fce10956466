pub mod gateway;
pub mod recognizer;
pub mod storage;

pub use gateway::{TranscriptResult, TranscriptionGateway};
pub use recognizer::{
    GoogleSpeechClient, RecognitionAlternative, RecognitionResult, SpeechRecognizer,
};
pub use storage::{GcsObjectStore, ObjectStore};
