//! Hybrid adapter - one bot reachable from several chat networks at once

use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::application::errors::BotError;
use crate::domain::traits::{Backend, CommandRunner};

/// A backend and the conversation the bot speaks in on it.
#[derive(Clone)]
pub struct HybridMember {
    pub backend: Arc<dyn Backend>,
    pub conversation: String,
}

impl HybridMember {
    pub fn new(backend: Arc<dyn Backend>, conversation: impl Into<String>) -> Self {
        Self {
            backend,
            conversation: conversation.into(),
        }
    }
}

/// Fans every send out to all members and listens on all of them.
///
/// `send_message` ignores its conversation argument: a reply goes to every
/// member's bound conversation, not just the network the command came from.
pub struct HybridBackend {
    members: Vec<HybridMember>,
}

impl HybridBackend {
    pub fn new(members: Vec<HybridMember>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[HybridMember] {
        &self.members
    }
}

/// Forwards commands as if they came from the member's bound conversation.
struct BoundRunner {
    conversation: String,
    inner: Arc<dyn CommandRunner>,
}

#[async_trait]
impl CommandRunner for BoundRunner {
    async fn run_command(&self, args: Vec<String>, _conversation: &str) -> Result<(), BotError> {
        self.inner.run_command(args, &self.conversation).await
    }
}

#[async_trait]
impl Backend for HybridBackend {
    fn name(&self) -> &str {
        "hybrid"
    }

    async fn send_message(&self, text: &str, _conversation: &str) {
        for member in &self.members {
            member.backend.send_message(text, &member.conversation).await;
        }
    }

    /// Returns only once every member's listen loop has returned.
    async fn listen(&self, runner: Arc<dyn CommandRunner>) -> Result<(), BotError> {
        let mut loops = JoinSet::new();
        for member in &self.members {
            let backend = Arc::clone(&member.backend);
            let bound: Arc<dyn CommandRunner> = Arc::new(BoundRunner {
                conversation: member.conversation.clone(),
                inner: Arc::clone(&runner),
            });
            loops.spawn(async move {
                let result = backend.listen(bound).await;
                (backend.name().to_string(), result)
            });
        }

        while let Some(joined) = loops.join_next().await {
            match joined {
                Ok((name, Ok(()))) => tracing::info!("[hybrid] {} stopped listening", name),
                Ok((name, Err(e))) => tracing::error!("[hybrid] {} stopped listening: {}", name, e),
                Err(e) => tracing::error!("[hybrid] Listener task failed: {}", e),
            }
        }
        Ok(())
    }
}
