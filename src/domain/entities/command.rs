use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::errors::{BotError, CommandError};

/// Trigger that always shows the help text and can never be registered.
pub const HELP_TRIGGER: &str = "help";

/// A chat command bound to a trigger word.
///
/// Implementations are built once at startup and shared across every
/// dispatch, so `run` may be called concurrently.
#[async_trait]
pub trait Command: Send + Sync {
    /// One-line description shown in the help table.
    fn description(&self) -> &str;

    /// Whether successful output is echoed back to the conversation.
    fn show_result(&self) -> bool;

    /// Execute the command. `args` is the full argument vector, trigger first.
    async fn run(&self, conversation: &str, args: &[String]) -> Result<String, CommandError>;
}

/// Maps trigger words to commands, with an optional catch-all.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
    default: Option<Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `command` under `trigger`, returning the command it replaced.
    ///
    /// Triggers are case-sensitive and carry no leading marker. `help` and the
    /// empty string are rejected.
    pub fn register(
        &mut self,
        trigger: impl Into<String>,
        command: Arc<dyn Command>,
    ) -> Result<Option<Arc<dyn Command>>, BotError> {
        let trigger = trigger.into();
        if trigger.is_empty()
            || trigger == HELP_TRIGGER
            || trigger.chars().any(char::is_whitespace)
        {
            return Err(BotError::ReservedTrigger(trigger));
        }
        Ok(self.commands.insert(trigger, command))
    }

    pub fn set_default(&mut self, command: Arc<dyn Command>) {
        self.default = Some(command);
    }

    pub fn get(&self, trigger: &str) -> Option<&Arc<dyn Command>> {
        self.commands.get(trigger)
    }

    /// Look up `trigger`, falling back to the default command.
    pub fn resolve(&self, trigger: &str) -> Option<Arc<dyn Command>> {
        self.get(trigger).or(self.default.as_ref()).cloned()
    }

    /// Registered triggers in ascending order.
    pub fn triggers(&self) -> Vec<&str> {
        let mut triggers: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        triggers.sort_unstable();
        triggers
    }

    /// `(trigger, command)` pairs in trigger order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Arc<dyn Command>)> {
        self.triggers()
            .into_iter()
            .filter_map(move |t| self.commands.get(t).map(|c| (t, c)))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
