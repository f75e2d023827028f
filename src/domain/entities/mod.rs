//! Domain entities - Core business objects

pub mod command;
pub mod message;
pub mod run_state;

pub use command::{Command, CommandRegistry, HELP_TRIGGER};
pub use message::{BackendEvent, InboundMessage, OutgoingMessage};
pub use run_state::RunState;
