//! Message handling - Tokenizing, dispatching and replying

pub mod dispatcher;
pub mod format;
pub mod listener;
pub mod parser;

pub use dispatcher::{Dispatch, Dispatcher, ALWAYS_ALLOWED};
pub use format::{block_quote, error_report, PAUSED_MESSAGE};
pub use listener::handle_event;
pub use parser::{tokenize, MessageParser};
