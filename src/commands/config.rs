use async_trait::async_trait;
use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::application::services::RunStateService;
use crate::domain::entities::{Command, RunState};

type Updater = Box<dyn Fn(RunState) -> Result<RunState, CommandError> + Send + Sync>;

/// Changes the persisted run state and reports the result.
///
/// In dry-run mode the change is only described, except for
/// [`ConfigCommand::toggle_dry_run`], which always applies.
pub struct ConfigCommand {
    description: String,
    updater: Updater,
    run_state: Arc<RunStateService>,
    applies_in_dry_run: bool,
}

impl ConfigCommand {
    pub fn new<F>(
        description: impl Into<String>,
        run_state: Arc<RunStateService>,
        updater: F,
    ) -> Self
    where
        F: Fn(RunState) -> Result<RunState, CommandError> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            updater: Box::new(updater),
            run_state,
            applies_in_dry_run: false,
        }
    }

    pub fn pause(run_state: Arc<RunStateService>) -> Self {
        Self::new("Pause any future builds", run_state, |mut state| {
            state.paused = true;
            Ok(state)
        })
    }

    pub fn resume(run_state: Arc<RunStateService>) -> Self {
        Self::new("Continue any future builds", run_state, |mut state| {
            state.paused = false;
            Ok(state)
        })
    }

    pub fn list(run_state: Arc<RunStateService>) -> Self {
        Self::new("List current config", run_state, Ok)
    }

    /// The one way out of dry-run mode, so it skips the dry-run check.
    pub fn toggle_dry_run(run_state: Arc<RunStateService>) -> Self {
        let mut command = Self::new("Toggle dry run mode", run_state, |mut state| {
            state.dry_run = !state.dry_run;
            Ok(state)
        });
        command.applies_in_dry_run = true;
        command
    }
}

#[async_trait]
impl Command for ConfigCommand {
    fn description(&self) -> &str {
        &self.description
    }

    fn show_result(&self) -> bool {
        true
    }

    async fn run(&self, _conversation: &str, _args: &[String]) -> Result<String, CommandError> {
        if !self.applies_in_dry_run && self.run_state.is_dry_run().await {
            return Ok(format!("Dry Run: {}", self.description));
        }
        let state = self.run_state.update(|state| (self.updater)(state)).await?;
        Ok(format!("Config is now: {}", state))
    }
}
