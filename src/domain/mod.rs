//! Domain layer - Core business logic
//!
//! This layer contains:
//! - Entities: Core business objects (Command, RunState, BackendEvent)
//! - Traits: Abstractions for infrastructure (Backend, CommandRunner, RunStateStore)

pub mod entities;
pub mod traits;
