//! Chat-facing reply texts

use crate::application::errors::CommandError;

/// Reply sent instead of running a command while paused.
pub const PAUSED_MESSAGE: &str = "I can't do that, I'm paused.";

/// Wrap `s` in a fenced block, ensuring the body ends with a newline.
pub fn block_quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 8);
    quoted.push_str("```\n");
    quoted.push_str(s);
    if !s.ends_with('\n') {
        quoted.push('\n');
    }
    quoted.push_str("```");
    quoted
}

/// Report for a command that failed.
///
/// Quotes the command's partial output, or the error itself when there was
/// none.
pub fn error_report(args: &[String], err: &CommandError) -> String {
    let detail = match err.output() {
        Some(output) => output.to_string(),
        None => err.to_string(),
    };
    format!(
        "Oops, there was an error in `{}`:\n{}",
        args.join(" "),
        block_quote(&detail)
    )
}
