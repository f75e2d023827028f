//! Bot aggregate - one registry, one run state, one backend

use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::messaging::Dispatcher;
use crate::application::services::{HelpService, RunStateService};
use crate::domain::entities::{Command, CommandRegistry};
use crate::domain::traits::Backend;

/// Collects commands before the bot starts listening.
///
/// The registry can only be changed here; [`BotBuilder::build`] freezes it.
pub struct BotBuilder {
    name: String,
    label: String,
    registry: CommandRegistry,
    help: Option<String>,
    backend: Arc<dyn Backend>,
    run_state: Arc<RunStateService>,
}

impl BotBuilder {
    pub fn new(
        name: impl Into<String>,
        backend: Arc<dyn Backend>,
        run_state: Arc<RunStateService>,
    ) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            registry: CommandRegistry::new(),
            help: None,
            backend,
            run_state,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn add_command<C: Command + 'static>(
        &mut self,
        trigger: &str,
        command: C,
    ) -> Result<(), BotError> {
        self.add_shared_command(trigger, Arc::new(command))
    }

    /// Register one command instance under `trigger`; the same `Arc` may back
    /// several triggers.
    pub fn add_shared_command(
        &mut self,
        trigger: &str,
        command: Arc<dyn Command>,
    ) -> Result<(), BotError> {
        if self.registry.register(trigger, command)?.is_some() {
            tracing::warn!("Replaced command for trigger {:?}", trigger);
        }
        Ok(())
    }

    /// Command used when the first word matches no trigger.
    pub fn set_default<C: Command + 'static>(&mut self, command: C) {
        self.registry.set_default(Arc::new(command));
    }

    /// Reply to `help` with `text` instead of the generated table.
    pub fn set_help(&mut self, text: impl Into<String>) {
        self.help = Some(text.into());
    }

    /// Generated help for the commands registered so far.
    pub fn help_message(&self) -> String {
        HelpService::new().help_text(&self.registry)
    }

    pub fn run_state(&self) -> &Arc<RunStateService> {
        &self.run_state
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn build(self) -> Bot {
        let help = match self.help {
            Some(text) => HelpService::with_override(text),
            None => HelpService::new(),
        };
        let dispatcher = Dispatcher::new(
            Arc::new(self.registry),
            Arc::clone(&self.run_state),
            Arc::clone(&self.backend),
            help,
        );
        Bot {
            name: self.name,
            label: self.label,
            dispatcher: Arc::new(dispatcher),
            backend: self.backend,
            run_state: self.run_state,
        }
    }
}

/// A running chat-ops bot
pub struct Bot {
    name: String,
    label: String,
    dispatcher: Arc<Dispatcher>,
    backend: Arc<dyn Backend>,
    run_state: Arc<RunStateService>,
}

impl Bot {
    pub fn builder(
        name: impl Into<String>,
        backend: Arc<dyn Backend>,
        run_state: Arc<RunStateService>,
    ) -> BotBuilder {
        BotBuilder::new(name, backend, run_state)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Word that addresses the bot in chat, e.g. `!opsbot`.
    pub fn command_prefix(&self) -> String {
        format!("!{}", self.name)
    }

    pub fn help_text(&self) -> String {
        self.dispatcher.help_text()
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }

    pub fn run_state(&self) -> &Arc<RunStateService> {
        &self.run_state
    }

    pub async fn send_message(&self, text: &str, conversation: &str) {
        self.backend.send_message(text, conversation).await;
    }

    /// Listen on the backend until it stops.
    pub async fn listen(&self) -> Result<(), BotError> {
        tracing::info!(
            "Started {} ({}) on {} backend",
            self.label,
            self.command_prefix(),
            self.backend.name()
        );
        let result = self.backend.listen(self.dispatcher()).await;
        match &result {
            Ok(()) => tracing::info!("{} stopped listening", self.label),
            Err(e) => tracing::error!("{} stopped listening: {}", self.label, e),
        }
        result
    }
}
