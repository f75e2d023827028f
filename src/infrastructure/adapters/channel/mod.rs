//! In-process adapter fed by tokio channels, for tests and embedding

use async_trait::async_trait;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

use crate::application::errors::BotError;
use crate::application::messaging::{handle_event, MessageParser};
use crate::domain::entities::{BackendEvent, OutgoingMessage};
use crate::domain::traits::{Backend, CommandRunner};

const EVENT_BUFFER: usize = 64;

/// Backend whose inbound events come from a [`ChannelHandle`].
///
/// Listening ends once every event sender is dropped.
pub struct ChannelBackend {
    name: String,
    parser: MessageParser,
    events: Mutex<Option<mpsc::Receiver<BackendEvent>>>,
    outbox: mpsc::UnboundedSender<OutgoingMessage>,
}

/// The other end of a [`ChannelBackend`].
pub struct ChannelHandle {
    pub events: mpsc::Sender<BackendEvent>,
    outbox: mpsc::UnboundedReceiver<OutgoingMessage>,
}

impl ChannelBackend {
    pub fn new(name: impl Into<String>, prefix: impl Into<String>) -> (Self, ChannelHandle) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let backend = Self {
            name: name.into(),
            parser: MessageParser::new(prefix),
            events: Mutex::new(Some(event_rx)),
            outbox: out_tx,
        };
        let handle = ChannelHandle {
            events: event_tx,
            outbox: out_rx,
        };
        (backend, handle)
    }
}

#[async_trait]
impl Backend for ChannelBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send_message(&self, text: &str, conversation: &str) {
        if conversation.is_empty() || text.trim().is_empty() {
            tracing::warn!("[{}] Not sending {:?} to {:?}", self.name, text, conversation);
            return;
        }
        if self.outbox.send(OutgoingMessage::new(conversation, text)).is_err() {
            tracing::debug!("[{}] Outbox closed, dropping message to {}", self.name, conversation);
        }
    }

    async fn listen(&self, runner: Arc<dyn CommandRunner>) -> Result<(), BotError> {
        let mut events = self
            .events
            .lock()
            .await
            .take()
            .ok_or_else(|| BotError::AlreadyListening(self.name.clone()))?;

        while let Some(event) = events.recv().await {
            let flow = handle_event(&self.name, &self.parser, event, runner.as_ref()).await;
            if let ControlFlow::Break(()) = flow {
                return Err(BotError::Auth(format!("{} rejected its credentials", self.name)));
            }
        }
        tracing::info!("[{}] Event source closed", self.name);
        Ok(())
    }
}

impl ChannelHandle {
    /// Deliver a text message from `conversation`.
    pub async fn say(&self, conversation: &str, text: &str) -> Result<(), BotError> {
        self.events
            .send(BackendEvent::message(conversation, text))
            .await
            .map_err(|_| BotError::Internal("channel backend is gone".to_string()))
    }

    /// Everything sent so far, without waiting.
    pub fn drain(&mut self) -> Vec<OutgoingMessage> {
        let mut sent = Vec::new();
        while let Ok(message) = self.outbox.try_recv() {
            sent.push(message);
        }
        sent
    }

    /// Wait for the next outgoing message.
    pub async fn next_message(&mut self) -> Option<OutgoingMessage> {
        self.outbox.recv().await
    }
}
