//! Application services - Business logic orchestration

pub mod help_service;
pub mod run_state_service;

pub use help_service::HelpService;
pub use run_state_service::RunStateService;
