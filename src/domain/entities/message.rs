use chrono::{DateTime, Utc};
use std::time::Duration;

/// Text message received from a chat backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub conversation: String,
    pub text: String,
    pub sender: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    pub fn new(conversation: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            conversation: conversation.into(),
            text: text.into(),
            sender: None,
            received_at: Utc::now(),
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn with_received_at(mut self, at: DateTime<Utc>) -> Self {
        self.received_at = at;
        self
    }
}

/// Message the bot posted to a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub conversation: String,
    pub text: String,
}

impl OutgoingMessage {
    pub fn new(conversation: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            conversation: conversation.into(),
            text: text.into(),
        }
    }
}

/// Events a backend's connection can deliver.
///
/// Only `Message` carries commands; `InvalidAuth` ends the listen loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    Hello,
    Connected,
    Message(InboundMessage),
    PresenceChange { user: String, presence: String },
    Latency(Duration),
    Error(String),
    InvalidAuth,
}

impl BackendEvent {
    pub fn as_str(&self) -> &str {
        match self {
            BackendEvent::Hello => "hello",
            BackendEvent::Connected => "connected",
            BackendEvent::Message(_) => "message",
            BackendEvent::PresenceChange { .. } => "presence_change",
            BackendEvent::Latency(_) => "latency",
            BackendEvent::Error(_) => "error",
            BackendEvent::InvalidAuth => "invalid_auth",
        }
    }

    /// Shorthand for a text message event.
    pub fn message(conversation: impl Into<String>, text: impl Into<String>) -> Self {
        BackendEvent::Message(InboundMessage::new(conversation, text))
    }
}
