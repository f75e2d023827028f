//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Bot: The aggregate root tying registry, run state and backend together
//! - Errors: Domain-specific errors
//! - Messaging: Tokenizing, dispatching, reply formatting
//! - Services: Help text and run state

pub mod bot;
pub mod errors;
pub mod messaging;
pub mod services;

pub use bot::{Bot, BotBuilder};
