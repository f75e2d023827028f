//! Domain traits - Abstractions for infrastructure implementations

pub mod backend;
pub mod store;

pub use backend::{Backend, CommandRunner};
pub use store::RunStateStore;
