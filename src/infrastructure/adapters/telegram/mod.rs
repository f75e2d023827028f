//! Telegram adapter

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use crate::application::errors::BotError;
use crate::application::messaging::{handle_event, MessageParser};
use crate::domain::entities::{BackendEvent, InboundMessage};
use crate::domain::traits::{Backend, CommandRunner};

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Seconds a getUpdates call may wait for new messages
const POLL_TIMEOUT_SECS: u64 = 30;

/// Pause after a failed poll
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub date: i64,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

/// Telegram bot backend bound to a single chat.
pub struct TelegramBackend {
    token: String,
    chat_id: String,
    client: Client,
    parser: MessageParser,
    api_base: String,
}

impl TelegramBackend {
    pub fn new(
        token: impl Into<String>,
        chat_id: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Result<Self, BotError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
            .build()
            .map_err(|e| BotError::Network(e.to_string()))?;
        Ok(Self {
            token: token.into(),
            chat_id: chat_id.into(),
            client,
            parser: MessageParser::new(prefix),
            api_base: API_BASE.to_string(),
        })
    }

    /// Talk to a self-hosted Bot API server instead of api.telegram.org.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: u64,
            allowed_updates: Vec<String>,
        }

        #[derive(Deserialize)]
        struct Response {
            result: Vec<Update>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout: POLL_TIMEOUT_SECS,
            allowed_updates: vec!["message".to_string()],
        };

        let response = self.client
            .post(self.api_url("getUpdates"))
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                return Err(BotError::Auth("Telegram rejected the bot token".to_string()));
            }
            status if !status.is_success() => {
                return Err(BotError::Network(format!("Telegram API error: {}", status)));
            }
            _ => {}
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(data.result)
    }

    /// Get the next update offset
    pub fn next_offset(updates: &[Update], current: i64) -> i64 {
        updates.iter()
            .map(|u| u.update_id + 1)
            .max()
            .unwrap_or(current)
            .max(current)
    }

    /// Turn an update into a message event if it is text from the bound chat.
    pub fn to_event(&self, update: Update) -> Option<BackendEvent> {
        let message = update.message?;
        let text = message.text?;
        let chat = message.chat.id.to_string();
        if chat != self.chat_id {
            tracing::debug!("[telegram] Ignoring message from chat {}", chat);
            return None;
        }

        let mut inbound = InboundMessage::new(chat, text);
        if let Some(from) = message.from {
            let sender = from.username.or(from.first_name).unwrap_or_else(|| from.id.to_string());
            inbound = inbound.with_sender(sender);
        }
        if let Some(at) = Utc.timestamp_opt(message.date, 0).single() {
            inbound = inbound.with_received_at(at);
        }
        Some(BackendEvent::Message(inbound))
    }

    /// Send a message via Telegram API - try Markdown, fallback to plain
    async fn send_message_api(&self, chat_id: &str, text: &str) -> Result<(), BotError> {
        match self.send_message_with_format(chat_id, text, Some("Markdown")).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!("Markdown failed, using plain text: {}", e);
                self.send_message_with_format(chat_id, text, None).await
            }
        }
    }

    /// Send a message with specific parse mode
    async fn send_message_with_format(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<&str>,
    ) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: &'a str,
            text: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            parse_mode: Option<&'a str>,
        }

        let request = SendMessageRequest { chat_id, text, parse_mode };

        let response = self.client
            .post(self.api_url("sendMessage"))
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Telegram API error: {}", response.status())));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for TelegramBackend {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send_message(&self, text: &str, conversation: &str) {
        if conversation.is_empty() || text.trim().is_empty() {
            tracing::warn!("[telegram] Not sending {:?} to {:?}", text, conversation);
            return;
        }
        if conversation != self.chat_id {
            tracing::warn!("[telegram] Refusing to send to unbound chat {}", conversation);
            return;
        }
        tracing::debug!("Sending to {}: {}", conversation, text);
        if let Err(e) = self.send_message_api(conversation, text).await {
            tracing::error!("Failed to send message: {}", e);
        }
    }

    async fn listen(&self, runner: Arc<dyn CommandRunner>) -> Result<(), BotError> {
        let shown: String = self.token.chars().take(8).collect();
        tracing::info!("Starting Telegram bot (token: {}...)", shown);
        handle_event("telegram", &self.parser, BackendEvent::Connected, runner.as_ref()).await;

        let mut offset = 0;
        loop {
            let events: Vec<BackendEvent> = match self.get_updates(offset).await {
                Ok(updates) => {
                    offset = Self::next_offset(&updates, offset);
                    updates.into_iter().filter_map(|u| self.to_event(u)).collect()
                }
                Err(BotError::Auth(_)) => vec![BackendEvent::InvalidAuth],
                Err(e) => {
                    let event = BackendEvent::Error(e.to_string());
                    handle_event("telegram", &self.parser, event, runner.as_ref()).await;
                    tokio::time::sleep(RETRY_DELAY).await;
                    continue;
                }
            };

            for event in events {
                let flow = handle_event("telegram", &self.parser, event, runner.as_ref()).await;
                if let ControlFlow::Break(()) = flow {
                    return Err(BotError::Auth("Telegram rejected the bot token".to_string()));
                }
            }
        }
    }
}
