use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

use crate::chat::{ChatClient, UserProfile};
use crate::error::IdentityError;

/// Default time-to-live for cached profiles (2 hours).
pub const DEFAULT_TTL: Duration = Duration::from_secs(7200);

#[derive(Debug, Clone)]
struct CacheEntry {
    profile: UserProfile,
    fetched_at: Instant,
}

/// TTL cache over the platform's profile fetch.
///
/// Entries are replaced on refresh, never mutated in place, and never
/// actively evicted: memory growth is bounded by the set of distinct
/// senders seen during the session.
pub struct IdentityCache {
    client: Arc<dyn ChatClient>,
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl IdentityCache {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self::with_ttl(client, DEFAULT_TTL)
    }

    pub fn with_ttl(client: Arc<dyn ChatClient>, ttl: Duration) -> Self {
        Self {
            client,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a user profile, fetching from the platform on a miss or a
    /// stale entry.
    ///
    /// Concurrent refreshes of the same key are last-writer-wins; a fetch
    /// failure leaves any stale entry in place and is returned to the
    /// caller, who falls back instead of crashing.
    pub async fn lookup(&self, user_id: &str) -> Result<UserProfile, IdentityError> {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(user_id) {
                if entry.fetched_at.elapsed() < self.ttl {
                    return Ok(entry.profile.clone());
                }
            }
        }

        debug!("Identity cache miss for user {}", user_id);

        let profile = self.client.fetch_user_info(user_id).await?;

        let mut entries = self.entries.write().await;
        entries.insert(
            user_id.to_string(),
            CacheEntry {
                profile: profile.clone(),
                fetched_at: Instant::now(),
            },
        );

        Ok(profile)
    }
}
