//! Sub-command parsing for extensions, built on clap

use clap::{CommandFactory, FromArgMatches, Parser};

use crate::application::messaging::block_quote;

/// Result of parsing chat arguments.
#[derive(Debug)]
pub enum ParseOutcome<T> {
    Parsed(T),
    /// Block-quoted usage to send back instead of running anything.
    Usage(String),
}

/// Parse `args` (no program name) into `T`.
///
/// Empty input or `--help` yields the usage. Anything clap rejects yields the
/// usage prefixed with what went wrong.
pub fn parse<T: Parser>(args: &[String]) -> ParseOutcome<T> {
    let mut command = T::command().no_binary_name(true);
    if args.is_empty() {
        return ParseOutcome::Usage(block_quote(&command.render_help().to_string()));
    }

    let err = match command
        .try_get_matches_from_mut(args)
        .and_then(|matches| T::from_arg_matches(&matches))
    {
        Ok(parsed) => return ParseOutcome::Parsed(parsed),
        Err(err) => err,
    };

    use clap::error::ErrorKind;
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        | ErrorKind::DisplayVersion => ParseOutcome::Usage(block_quote(&err.to_string())),
        _ => {
            tracing::info!("Error in parsing command: {:?}: {}", args, summary(&err));
            ParseOutcome::Usage(block_quote(&format!(
                "I don't know what you mean by `{}`.\nError: `{}`\nHere's my usage:\n\n{}",
                args.join(" "),
                summary(&err),
                command.render_help()
            )))
        }
    }
}

/// First line of a clap error without its `error:` tag.
fn summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).trim().to_string()
}
