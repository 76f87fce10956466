use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::audio::VoiceTranscoder;
use crate::chat::{Attachment, AttachmentKind, ChatClient, MessageEvent};
use crate::error::PipelineError;
use crate::format::MessageFormatter;
use crate::stt::TranscriptionGateway;

/// Per-message entry point.
///
/// Filters eligible attachments and runs the transcription pipeline for
/// each one, isolating failures so a broken attachment never takes down
/// the listener or blocks the rest of the message.
pub struct Dispatcher {
    client: Arc<dyn ChatClient>,
    transcoder: Arc<dyn VoiceTranscoder>,
    gateway: Arc<TranscriptionGateway>,
    formatter: MessageFormatter,
    whitelist: HashSet<String>,
}

impl Dispatcher {
    pub fn new(
        client: Arc<dyn ChatClient>,
        transcoder: Arc<dyn VoiceTranscoder>,
        gateway: Arc<TranscriptionGateway>,
        formatter: MessageFormatter,
        whitelist: HashSet<String>,
    ) -> Self {
        Self {
            client,
            transcoder,
            gateway,
            formatter,
            whitelist,
        }
    }

    /// Handle one inbound message event.
    ///
    /// Every failure is contained here and reported through logging only;
    /// the conversation receives no reply for a failed attachment.
    pub async fn on_message(&self, event: MessageEvent) {
        if !self.whitelist.contains(&event.thread_id) {
            debug!(
                "Ignoring message in non-whitelisted thread {}",
                event.thread_id
            );
            return;
        }

        for attachment in &event.attachments {
            if attachment.kind != AttachmentKind::VoiceMessage {
                continue;
            }

            match self.process(&event, attachment).await {
                Ok(()) => info!("Transcribed voice message in thread {}", event.thread_id),
                Err(e) => error!(
                    "Transcription failed in thread {}: {}",
                    event.thread_id, e
                ),
            }
        }
    }

    /// Run one attachment through fetch/transcode, upload/recognize,
    /// format and send.
    async fn process(
        &self,
        event: &MessageEvent,
        attachment: &Attachment,
    ) -> Result<(), PipelineError> {
        let audio = self.transcoder.transcode(&attachment.url).await?;

        let transcript = self.gateway.transcribe(audio).await?;

        let reply = self
            .formatter
            .format(&event.author_id, event.timestamp_ms, &transcript.text)
            .await;

        self.client
            .send(&reply, &event.thread_id, event.thread_kind)
            .await?;

        Ok(())
    }
}
