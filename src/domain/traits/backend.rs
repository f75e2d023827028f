use async_trait::async_trait;
use std::sync::Arc;

use crate::application::errors::BotError;

/// Receives recognized commands from a backend's listen loop.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Handle `args` (command prefix already stripped) that arrived on
    /// `conversation`. Must return without waiting for the command to finish.
    async fn run_command(&self, args: Vec<String>, conversation: &str) -> Result<(), BotError>;
}

/// Backend trait - abstraction for chat network adapters
#[async_trait]
pub trait Backend: Send + Sync {
    /// Adapter name for logging
    fn name(&self) -> &str;

    /// Send `text` to `conversation`.
    ///
    /// Best effort: failures are logged, never returned. An empty
    /// conversation or blank text is a no-op.
    async fn send_message(&self, text: &str, conversation: &str);

    /// Read inbound events until the connection ends, forwarding every
    /// prefixed command to `runner`.
    ///
    /// A healthy backend never returns. Returns `Ok` when the event source is
    /// exhausted and `Err` on an unrecoverable failure such as invalid
    /// credentials.
    async fn listen(&self, runner: Arc<dyn CommandRunner>) -> Result<(), BotError>;
}
