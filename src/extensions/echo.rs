use async_trait::async_trait;
use clap::{Parser, Subcommand};

use super::cli::{self, ParseOutcome};
use super::trait_def::{Extension, ExtensionContext};
use crate::application::errors::CommandError;

#[derive(Parser, Debug)]
#[command(name = "opsbot", about = "Commands handled by the echo extension")]
struct EchoCli {
    #[command(subcommand)]
    action: EchoAction,
}

#[derive(Subcommand, Debug)]
enum EchoAction {
    /// Repeat text back into the conversation
    Echo {
        /// Text to repeat
        #[arg(long)]
        output: String,
    },
}

impl EchoAction {
    fn name(&self) -> &'static str {
        match self {
            EchoAction::Echo { .. } => "echo",
        }
    }
}

/// Sample extension answering `echo --output <text>`.
#[derive(Debug, Default)]
pub struct EchoExtension;

#[async_trait]
impl Extension for EchoExtension {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Repeat text back into the conversation"
    }

    async fn run(
        &self,
        ctx: &ExtensionContext,
        _conversation: &str,
        args: &[String],
    ) -> Result<String, CommandError> {
        let parsed = match cli::parse::<EchoCli>(args) {
            ParseOutcome::Parsed(parsed) => parsed,
            ParseOutcome::Usage(usage) => return Ok(usage),
        };

        if ctx.run_state.is_dry_run().await {
            return Ok(format!("I would have run: `{}`", parsed.action.name()));
        }

        match parsed.action {
            EchoAction::Echo { output } => Ok(output),
        }
    }
}
