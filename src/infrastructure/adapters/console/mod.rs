//! Console adapter for development/testing

use async_trait::async_trait;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

use crate::application::errors::BotError;
use crate::application::messaging::{handle_event, MessageParser};
use crate::domain::entities::{BackendEvent, InboundMessage};
use crate::domain::traits::{Backend, CommandRunner};

type Input = Box<dyn AsyncBufRead + Send + Unpin>;
type Output = Box<dyn AsyncWrite + Send + Unpin>;

/// Console backend for local development.
///
/// Every input line is a message from the bound conversation. Replies are
/// written as `[name] text`.
pub struct ConsoleBackend {
    name: String,
    conversation: String,
    parser: MessageParser,
    input: Mutex<Option<Input>>,
    output: Mutex<Output>,
}

impl ConsoleBackend {
    /// Console on the process's stdin/stdout.
    pub fn new(
        name: impl Into<String>,
        conversation: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self::with_io(
            name,
            conversation,
            prefix,
            Box::new(BufReader::new(tokio::io::stdin())),
            Box::new(tokio::io::stdout()),
        )
    }

    pub fn with_io(
        name: impl Into<String>,
        conversation: impl Into<String>,
        prefix: impl Into<String>,
        input: Input,
        output: Output,
    ) -> Self {
        Self {
            name: name.into(),
            conversation: conversation.into(),
            parser: MessageParser::new(prefix),
            input: Mutex::new(Some(input)),
            output: Mutex::new(output),
        }
    }

    pub fn conversation(&self) -> &str {
        &self.conversation
    }
}

#[async_trait]
impl Backend for ConsoleBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send_message(&self, text: &str, conversation: &str) {
        if conversation.is_empty() || text.trim().is_empty() {
            tracing::warn!("[{}] Not sending {:?} to {:?}", self.name, text, conversation);
            return;
        }
        let line = format!("[{}] {}\n", self.name, text);
        let mut output = self.output.lock().await;
        let written = match output.write_all(line.as_bytes()).await {
            Ok(()) => output.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            tracing::error!("[{}] Failed to write reply: {}", self.name, e);
        }
    }

    async fn listen(&self, runner: Arc<dyn CommandRunner>) -> Result<(), BotError> {
        let input = self
            .input
            .lock()
            .await
            .take()
            .ok_or_else(|| BotError::AlreadyListening(self.name.clone()))?;
        let mut lines = input.lines();

        handle_event(&self.name, &self.parser, BackendEvent::Hello, runner.as_ref()).await;
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("[{}] Failed to read input: {}", self.name, e);
                    break;
                }
            };
            let message =
                InboundMessage::new(self.conversation.clone(), line).with_sender("console");
            let event = BackendEvent::Message(message);
            if let ControlFlow::Break(()) =
                handle_event(&self.name, &self.parser, event, runner.as_ref()).await
            {
                break;
            }
        }
        tracing::info!("[{}] Input closed", self.name);
        Ok(())
    }
}
