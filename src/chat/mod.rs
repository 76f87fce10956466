pub mod client;
pub mod events;
pub mod listener;

pub use client::{ChatClient, NatsChatClient};
pub use events::{
    Attachment, AttachmentKind, MessageEvent, OutboundMessage, ThreadKind, UserInfoRequest,
    UserProfile,
};
pub use listener::ChatListener;
