//! Extension system for opsbot
//!
//! Extensions parse their own sub-commands and can be registered as a
//! trigger or as the bot's default command.

pub mod cli;
pub mod echo;
pub mod trait_def;

pub use cli::ParseOutcome;
pub use echo::EchoExtension;
pub use trait_def::{Extension, ExtensionCommand, ExtensionContext};

use std::sync::Arc;

use crate::application::BotBuilder;

/// Make `extension` the default command and append its usage to the help.
pub async fn install_default(builder: &mut BotBuilder, extension: Arc<dyn Extension>) {
    let ctx = ExtensionContext::new(Arc::clone(builder.run_state()), Arc::clone(builder.backend()));
    let usage = extension.help(&ctx).await;
    tracing::info!("Installing {} extension as the default command", extension.name());
    builder.set_default(ExtensionCommand::new(extension, ctx));
    let help = format!("{}\n\n{}", builder.help_message(), usage);
    builder.set_help(help);
}
