pub mod decode;
pub mod transcode;

pub use decode::{decode, DecodedAudio};
pub use transcode::{
    HttpTranscoder, NormalizedAudio, VoiceTranscoder, TARGET_BITS_PER_SAMPLE, TARGET_CHANNELS,
    TARGET_SAMPLE_RATE,
};
