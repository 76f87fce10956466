pub mod audio;
pub mod chat;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod identity;
pub mod stt;

pub use audio::{HttpTranscoder, NormalizedAudio, VoiceTranscoder};
pub use chat::{ChatClient, ChatListener, MessageEvent, NatsChatClient, ThreadKind, UserProfile};
pub use config::Config;
pub use dispatch::Dispatcher;
pub use error::{ChatError, ConfigError, IdentityError, PipelineError};
pub use format::MessageFormatter;
pub use identity::IdentityCache;
pub use stt::{
    GcsObjectStore, GoogleSpeechClient, ObjectStore, SpeechRecognizer, TranscriptResult,
    TranscriptionGateway,
};
