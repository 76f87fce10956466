use std::sync::Arc;

use anyhow::{Context, Result};
use scribe_bot::{
    ChatClient, ChatListener, Config, Dispatcher, GcsObjectStore, GoogleSpeechClient,
    HttpTranscoder, IdentityCache, MessageFormatter, NatsChatClient, TranscriptionGateway,
    VoiceTranscoder,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cfg = Config::from_env().context("Failed to load configuration")?;
    let whitelist = cfg.thread_whitelist();

    info!("scribe-bot v0.1.0");
    info!(
        "Watching {} threads, bucket {}, language {}",
        whitelist.len(),
        cfg.bucket,
        cfg.language
    );

    let chat = Arc::new(
        NatsChatClient::connect(&cfg.nats_url)
            .await
            .context("Failed to connect to chat bridge")?,
    );
    let nats = chat.nats();
    let client: Arc<dyn ChatClient> = chat;

    let identities = Arc::new(IdentityCache::with_ttl(
        Arc::clone(&client),
        cfg.cache_ttl(),
    ));

    let gateway = Arc::new(TranscriptionGateway::new(
        Arc::new(GcsObjectStore::new(cfg.api_token.clone())),
        Arc::new(GoogleSpeechClient::new(cfg.api_token.clone())),
        cfg.bucket.clone(),
        cfg.language.clone(),
    ));

    let transcoder: Arc<dyn VoiceTranscoder> = Arc::new(HttpTranscoder::new());

    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&client),
        transcoder,
        gateway,
        MessageFormatter::new(identities),
        whitelist,
    ));

    let listener = ChatListener::new(nats);
    listener
        .start(dispatcher)
        .await
        .context("Failed to start listener")?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to wait for shutdown signal")?;
    info!("Shutdown signal received");

    listener.stop().await;

    Ok(())
}
