use std::sync::Arc;

use futures::stream::StreamExt;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::events::MessageEvent;
use crate::dispatch::Dispatcher;
use crate::error::ChatError;

/// Subject the platform bridge publishes inbound message events on.
const MESSAGE_EVENT_SUBJECT: &str = "chat.event.message";

/// Consumes inbound message events and drives the dispatcher.
///
/// Runs on its own tokio task so the main task is free to wait for the
/// termination signal. `stop` signals the task and joins it; in-flight
/// pipeline runs are not waited for beyond the current event.
pub struct ChatListener {
    client: async_nats::Client,
    shutdown_tx: Mutex<Option<mpsc::Sender<()>>>,
    task_handle: Mutex<Option<JoinHandle<()>>>,
}

impl ChatListener {
    pub fn new(client: async_nats::Client) -> Self {
        Self {
            client,
            shutdown_tx: Mutex::new(None),
            task_handle: Mutex::new(None),
        }
    }

    /// Subscribe to message events and start dispatching.
    pub async fn start(&self, dispatcher: Arc<Dispatcher>) -> Result<(), ChatError> {
        let mut subscriber = self
            .client
            .subscribe(MESSAGE_EVENT_SUBJECT)
            .await
            .map_err(|e| ChatError::Connect(e.to_string()))?;

        info!("Listening for message events on {}", MESSAGE_EVENT_SUBJECT);

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                    message = subscriber.next() => {
                        match message {
                            Some(message) => {
                                match serde_json::from_slice::<MessageEvent>(&message.payload) {
                                    Ok(event) => dispatcher.on_message(event).await,
                                    Err(e) => warn!("Failed to parse message event: {}", e),
                                }
                            }
                            None => {
                                error!("Message event subscription closed");
                                break;
                            }
                        }
                    }
                }
            }

            info!("Listener task stopped");
        });

        {
            let mut tx = self.shutdown_tx.lock().await;
            *tx = Some(shutdown_tx);
        }
        {
            let mut handle = self.task_handle.lock().await;
            *handle = Some(task);
        }

        Ok(())
    }

    /// Signal the listener to stop and wait for its task to finish.
    pub async fn stop(&self) {
        info!("Stopping listener");

        {
            let tx = self.shutdown_tx.lock().await.take();
            if let Some(tx) = tx {
                // The task may already be gone; nothing to do then
                let _ = tx.send(()).await;
            }
        }

        let handle = self.task_handle.lock().await.take();
        if let Some(task) = handle {
            if let Err(e) = task.await {
                error!("Listener task panicked: {}", e);
            }
        }
    }
}
