use std::sync::Arc;

use chrono::{Local, TimeZone};
use tracing::warn;

use crate::identity::IdentityCache;

/// Label used when the author's profile cannot be resolved.
const UNKNOWN_AUTHOR: &str = "Unknown sender";

/// Builds the reply text from author identity, timestamp and transcript.
pub struct MessageFormatter {
    identities: Arc<IdentityCache>,
}

impl MessageFormatter {
    pub fn new(identities: Arc<IdentityCache>) -> Self {
        Self { identities }
    }

    /// `"{author_name} ({HH:MM:SS}): {transcript}"`, with the timestamp
    /// rendered in local wall-clock time.
    ///
    /// An identity failure falls back to a generic label; it never
    /// propagates out of the formatter.
    pub async fn format(&self, author_id: &str, timestamp_ms: i64, transcript: &str) -> String {
        let author_name = match self.identities.lookup(author_id).await {
            Ok(profile) => profile.display_name(),
            Err(e) => {
                warn!("Could not resolve author {}: {}", author_id, e);
                UNKNOWN_AUTHOR.to_string()
            }
        };

        format!(
            "{} ({}): {}",
            author_name,
            format_time(timestamp_ms),
            transcript
        )
    }
}

/// Local wall-clock `HH:MM:SS` for a millisecond epoch timestamp.
pub fn format_time(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(time) => time.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}
