//! opsbot - a chat-ops bot that runs commands on request
//!
//! Messages addressed as `!<name> <trigger> [args...]` are tokenized, looked
//! up in the command registry, gated on the paused/dry-run state and run in
//! the background. Results go back to the chat through a [`Backend`].
//!
//! [`Backend`]: domain::traits::Backend

pub mod application;
pub mod commands;
pub mod domain;
pub mod extensions;
pub mod infrastructure;
