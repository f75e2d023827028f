use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command as Process;

use crate::application::errors::CommandError;
use crate::application::services::RunStateService;
use crate::domain::entities::Command;

/// Runs a fixed program with fixed arguments.
///
/// Chat arguments are ignored. In dry-run mode the process is never spawned.
pub struct ExecCommand {
    program: String,
    args: Vec<String>,
    show_result: bool,
    description: String,
    run_state: Arc<RunStateService>,
}

impl ExecCommand {
    pub fn new<I, S>(
        program: impl Into<String>,
        args: I,
        show_result: bool,
        description: impl Into<String>,
        run_state: Arc<RunStateService>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            show_result,
            description: description.into(),
            run_state,
        }
    }

    /// Program and arguments as one line.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl Command for ExecCommand {
    fn description(&self) -> &str {
        &self.description
    }

    fn show_result(&self) -> bool {
        self.show_result
    }

    async fn run(&self, _conversation: &str, _args: &[String]) -> Result<String, CommandError> {
        if self.run_state.is_dry_run().await {
            return Ok(format!("Dry Run: would run {}", self.command_line()));
        }

        tracing::info!("Executing {}", self.command_line());
        let output = Process::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .await?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(CommandError::failed(
                format!("{} exited with {}", self.program, output.status),
                combined,
            ));
        }
        Ok(combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RunState;
    use crate::infrastructure::storage::MemoryStore;

    fn run_state(dry_run: bool) -> Arc<RunStateService> {
        Arc::new(RunStateService::new(
            Arc::new(MemoryStore::new()),
            RunState { dry_run, paused: false },
        ))
    }

    #[tokio::test]
    async fn test_dry_run_describes() {
        let cmd = ExecCommand::new("date", ["-u"], true, "Show the date", run_state(true));
        assert_eq!(cmd.run("ops", &[]).await.unwrap(), "Dry Run: would run date -u");

        let bare =
            ExecCommand::new("date", Vec::<String>::new(), true, "Show the date", run_state(true));
        assert_eq!(bare.run("ops", &[]).await.unwrap(), "Dry Run: would run date");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runs_process() {
        let script = ["-c", "echo out; echo err >&2"];
        let cmd = ExecCommand::new("sh", script, true, "Say", run_state(false));
        assert_eq!(cmd.run("ops", &[]).await.unwrap(), "out\nerr\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failure_keeps_output() {
        let script = ["-c", "echo halfway; exit 3"];
        let cmd = ExecCommand::new("sh", script, false, "Fail", run_state(false));
        let err = cmd.run("ops", &[]).await.unwrap_err();
        assert_eq!(err.output(), Some("halfway\n"));
        assert!(err.to_string().contains("sh exited with"));
    }

    #[tokio::test]
    async fn test_missing_program_is_io_error() {
        let missing = "/nonexistent/opsbot-test";
        let cmd = ExecCommand::new(missing, Vec::<String>::new(), true, "x", run_state(false));
        assert!(matches!(cmd.run("ops", &[]).await, Err(CommandError::Io(_))));
    }

    #[test]
    fn test_metadata() {
        let cmd = ExecCommand::new("date", ["-u"], false, "Show the date (utc)", run_state(true));
        assert_eq!(cmd.description(), "Show the date (utc)");
        assert!(!cmd.show_result());
        assert_eq!(cmd.command_line(), "date -u");
    }
}
