//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: Run state persistence
//! - Adapters: Chat network integrations (console, Telegram, hybrid)

pub mod config;
pub mod storage;
pub mod adapters;
