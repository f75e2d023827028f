//! Concrete command variants
//!
//! - Exec: runs a process
//! - Config: mutates the persisted run state
//! - Func: wraps an async closure

pub mod config;
pub mod exec;
pub mod func;

pub use config::ConfigCommand;
pub use exec::ExecCommand;
pub use func::FuncCommand;

use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::BotBuilder;

/// Register the standard ops triggers on `builder`.
pub fn register_builtins(builder: &mut BotBuilder) -> Result<(), BotError> {
    let run_state = Arc::clone(builder.run_state());
    let date = ExecCommand::new(
        "date",
        Vec::<String>::new(),
        true,
        "Show the current date",
        Arc::clone(&run_state),
    );
    builder.add_command("date", date)?;
    builder.add_command("pause", ConfigCommand::pause(Arc::clone(&run_state)))?;
    builder.add_command("resume", ConfigCommand::resume(Arc::clone(&run_state)))?;
    builder.add_command("config", ConfigCommand::list(Arc::clone(&run_state)))?;
    builder.add_command("toggle-dryrun", ConfigCommand::toggle_dry_run(run_state))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::RunStateService;
    use crate::application::Bot;
    use crate::infrastructure::adapters::channel::ChannelBackend;
    use crate::infrastructure::storage::MemoryStore;

    #[test]
    fn test_builtins_in_help() {
        let (backend, _handle) = ChannelBackend::new("test", "!opsbot");
        let run_state = Arc::new(RunStateService::new(
            Arc::new(MemoryStore::new()),
            Default::default(),
        ));
        let mut builder = Bot::builder("opsbot", Arc::new(backend), run_state);
        register_builtins(&mut builder).unwrap();

        let help = builder.help_message();
        let triggers: Vec<&str> = help
            .lines()
            .skip(2)
            .filter_map(|line| line.split('\t').next())
            .filter(|t| !t.is_empty() && *t != "```")
            .collect();
        assert_eq!(triggers, vec!["config", "date", "pause", "resume", "toggle-dryrun"]);
        assert!(help.contains("Toggle dry run mode"));
    }
}
