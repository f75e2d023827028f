//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Unrecognized command: {0}")]
    UnrecognizedCommand(String),

    #[error("Reserved trigger: {0}")]
    ReservedTrigger(String),

    #[error("Backend {0} is already listening")]
    AlreadyListening(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ConfigError> for BotError {
    fn from(err: ConfigError) -> Self {
        BotError::Config(err.to_string())
    }
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Execution failed: {message}")]
    ExecutionFailed { message: String, output: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    pub fn failed(message: impl Into<String>, output: impl Into<String>) -> Self {
        CommandError::ExecutionFailed {
            message: message.into(),
            output: output.into(),
        }
    }

    /// Output the command produced before failing, if any.
    pub fn output(&self) -> Option<&str> {
        match self {
            CommandError::ExecutionFailed { output, .. } if !output.is_empty() => Some(output),
            _ => None,
        }
    }
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_output_exposed() {
        let err = CommandError::failed("date exited with 1", "partial");
        assert_eq!(err.output(), Some("partial"));
        assert_eq!(err.to_string(), "Execution failed: date exited with 1");
    }

    #[test]
    fn test_empty_output_hidden() {
        assert_eq!(CommandError::failed("boom", "").output(), None);
        assert_eq!(CommandError::InvalidArgs("x".into()).output(), None);
    }

    #[test]
    fn test_config_error_converts() {
        let err: BotError = ConfigError::MissingField("bot.name".into()).into();
        assert!(matches!(err, BotError::Config(msg) if msg.contains("bot.name")));
    }
}
