//! Extension trait definitions

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::application::services::RunStateService;
use crate::domain::entities::Command;
use crate::domain::traits::Backend;

/// What an extension can reach while running
#[derive(Clone)]
pub struct ExtensionContext {
    pub run_state: Arc<RunStateService>,
    pub backend: Arc<dyn Backend>,
}

impl ExtensionContext {
    pub fn new(run_state: Arc<RunStateService>, backend: Arc<dyn Backend>) -> Self {
        Self { run_state, backend }
    }

    /// Post an intermediate message while a long command runs.
    pub async fn progress(&self, text: &str, conversation: &str) {
        self.backend.send_message(text, conversation).await;
    }
}

/// Core trait every extension implements
#[async_trait]
pub trait Extension: Send + Sync {
    /// Unique identifier for the extension
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// Parse and execute `args`, trigger word included.
    async fn run(
        &self,
        ctx: &ExtensionContext,
        conversation: &str,
        args: &[String],
    ) -> Result<String, CommandError>;

    /// Usage text, by default whatever `run` prints for no arguments.
    async fn help(&self, ctx: &ExtensionContext) -> String {
        match self.run(ctx, "", &[]).await {
            Ok(out) => out,
            Err(e) => format!("Error getting help: {}", e),
        }
    }
}

/// Exposes an [`Extension`] through the [`Command`] interface.
pub struct ExtensionCommand {
    extension: Arc<dyn Extension>,
    ctx: ExtensionContext,
}

impl ExtensionCommand {
    pub fn new(extension: Arc<dyn Extension>, ctx: ExtensionContext) -> Self {
        Self { extension, ctx }
    }
}

#[async_trait]
impl Command for ExtensionCommand {
    fn description(&self) -> &str {
        self.extension.description()
    }

    fn show_result(&self) -> bool {
        true
    }

    async fn run(&self, conversation: &str, args: &[String]) -> Result<String, CommandError> {
        tracing::debug!("Extension {} handling {:?}", self.extension.name(), args);
        self.extension.run(&self.ctx, conversation, args).await
    }
}
