//! Event handling shared by every backend's listen loop

use std::ops::ControlFlow;

use super::parser::MessageParser;
use crate::domain::entities::BackendEvent;
use crate::domain::traits::CommandRunner;

/// Handle one inbound event.
///
/// Text messages starting with the bot's prefix are forwarded to `runner`;
/// everything else is logged and dropped. Breaks on invalid credentials.
pub async fn handle_event(
    backend: &str,
    parser: &MessageParser,
    event: BackendEvent,
    runner: &dyn CommandRunner,
) -> ControlFlow<()> {
    match event {
        BackendEvent::Hello | BackendEvent::Connected => {
            tracing::info!("[{}] {}", backend, event.as_str());
        }
        BackendEvent::Message(message) => {
            let Some(args) = parser.parse(&message.text) else {
                return ControlFlow::Continue(());
            };
            tracing::info!(
                "[{}] Command from {} in {} at {}: {:?}",
                backend,
                message.sender.as_deref().unwrap_or("unknown"),
                message.conversation,
                message.received_at.format("%H:%M:%S"),
                args
            );
            if let Err(e) = runner.run_command(args, &message.conversation).await {
                tracing::info!("[{}] Failed to run command: {}", backend, e);
            }
        }
        BackendEvent::PresenceChange { .. } | BackendEvent::Latency(_) => {
            tracing::trace!("[{}] Ignoring {:?}", backend, event);
        }
        BackendEvent::Error(e) => {
            tracing::warn!("[{}] Error: {}", backend, e);
        }
        BackendEvent::InvalidAuth => {
            tracing::error!("[{}] Invalid credentials", backend);
            return ControlFlow::Break(());
        }
    }
    ControlFlow::Continue(())
}
