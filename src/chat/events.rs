use serde::{Deserialize, Serialize};

/// Conversation kind, mirroring the platform's thread model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadKind {
    /// Direct conversation with a single user
    User,
    /// Group conversation
    Group,
}

/// Attachment classification as delivered by the platform bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    VoiceMessage,
    Audio,
    Image,
    Video,
    File,
    Other,
}

/// A non-text payload carried by a message event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    /// Remote URL the payload can be fetched from
    pub url: String,
    pub kind: AttachmentKind,
}

/// Inbound message event published by the platform bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEvent {
    pub author_id: String,
    pub thread_id: String,
    pub thread_kind: ThreadKind,
    /// Message timestamp in milliseconds since epoch
    pub timestamp_ms: i64,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Outbound reply published back to the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub text: String,
    pub thread_id: String,
    pub thread_kind: ThreadKind,
}

/// Request payload for a profile fetch over request-reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfoRequest {
    pub user_id: String,
}

/// Profile data returned by the platform bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub nickname: Option<String>,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl UserProfile {
    /// Display name: the nickname when one is set, otherwise the first name
    /// followed by the last name when present.
    pub fn display_name(&self) -> String {
        if let Some(nickname) = &self.nickname {
            return nickname.clone();
        }

        match &self.last_name {
            Some(last_name) => format!("{} {}", self.first_name, last_name),
            None => self.first_name.clone(),
        }
    }
}
