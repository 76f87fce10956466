use async_nats::Client;
use async_trait::async_trait;
use tracing::{debug, info};

use super::events::{OutboundMessage, ThreadKind, UserInfoRequest, UserProfile};
use crate::error::{ChatError, IdentityError};

/// Subject the bridge answers profile fetches on (request-reply).
const USER_INFO_SUBJECT: &str = "chat.user.info";

/// Chat platform client.
///
/// Implemented over the NATS bridge in production; tests substitute stubs.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Fetch profile data for a user from the platform.
    async fn fetch_user_info(&self, user_id: &str) -> Result<UserProfile, IdentityError>;

    /// Send a text message into a thread.
    async fn send(
        &self,
        text: &str,
        thread_id: &str,
        thread_kind: ThreadKind,
    ) -> Result<(), ChatError>;
}

/// NATS-backed chat client speaking to the platform bridge.
pub struct NatsChatClient {
    client: Client,
}

impl NatsChatClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect to the bridge server.
    pub async fn connect(url: &str) -> Result<Self, ChatError> {
        info!("Connecting to chat bridge at {}", url);

        let client = async_nats::connect(url)
            .await
            .map_err(|e| ChatError::Connect(e.to_string()))?;

        info!("Connected to chat bridge");

        Ok(Self { client })
    }

    /// The underlying NATS connection, shared with the listener.
    pub fn nats(&self) -> Client {
        self.client.clone()
    }
}

#[async_trait]
impl ChatClient for NatsChatClient {
    async fn fetch_user_info(&self, user_id: &str) -> Result<UserProfile, IdentityError> {
        let request = UserInfoRequest {
            user_id: user_id.to_string(),
        };
        let payload = serde_json::to_vec(&request).map_err(|e| IdentityError::Fetch {
            user_id: user_id.to_string(),
            reason: e.to_string(),
        })?;

        debug!("Requesting profile for user {}", user_id);

        let reply = self
            .client
            .request(USER_INFO_SUBJECT, payload.into())
            .await
            .map_err(|e| IdentityError::Fetch {
                user_id: user_id.to_string(),
                reason: e.to_string(),
            })?;

        serde_json::from_slice(&reply.payload)
            .map_err(|_| IdentityError::Malformed(user_id.to_string()))
    }

    async fn send(
        &self,
        text: &str,
        thread_id: &str,
        thread_kind: ThreadKind,
    ) -> Result<(), ChatError> {
        let subject = format!("chat.send.{}", thread_id);

        let message = OutboundMessage {
            text: text.to_string(),
            thread_id: thread_id.to_string(),
            thread_kind,
        };
        let payload = serde_json::to_vec(&message).map_err(|e| ChatError::Publish(e.to_string()))?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .map_err(|e| ChatError::Publish(e.to_string()))?;

        info!("Published reply to {} ({} chars)", subject, text.len());

        Ok(())
    }
}
