//! Chat network adapters

pub mod channel;
pub mod console;
pub mod hybrid;
pub mod telegram;

use std::sync::Arc;

use crate::application::errors::ConfigError;
use crate::domain::traits::Backend;
use crate::infrastructure::config::Config;
use hybrid::{HybridBackend, HybridMember};

/// One member per enabled adapter, bound to its configured conversation.
pub fn build_members(config: &Config) -> Result<Vec<HybridMember>, ConfigError> {
    let prefix = format!("!{}", config.bot.name);
    let mut members = Vec::new();

    if let Some(console) = config.adapters.console.as_ref().filter(|c| c.enabled) {
        let backend =
            console::ConsoleBackend::new("console", console.conversation.clone(), prefix.clone());
        members.push(HybridMember::new(Arc::new(backend), console.conversation.clone()));
    }

    if let Some(tg) = config.adapters.telegram.as_ref().filter(|t| t.enabled) {
        let token = tg
            .token
            .clone()
            .ok_or_else(|| ConfigError::MissingField("adapters.telegram.token".to_string()))?;
        let chat_id = tg
            .chat_id
            .clone()
            .ok_or_else(|| ConfigError::MissingField("adapters.telegram.chat-id".to_string()))?;
        let backend = telegram::TelegramBackend::new(token, chat_id.clone(), prefix.clone())
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        members.push(HybridMember::new(Arc::new(backend), chat_id));
    }

    Ok(members)
}

/// Build the backend for every enabled adapter.
///
/// A single adapter is used as is; several are combined into a
/// [`HybridBackend`].
pub fn build_backend(config: &Config) -> Result<Arc<dyn Backend>, ConfigError> {
    let mut members = build_members(config)?;
    match members.len() {
        0 => Err(ConfigError::InvalidValue("no adapters enabled".to_string())),
        1 => Ok(members.remove(0).backend),
        n => {
            tracing::info!("Combining {} adapters into a hybrid backend", n);
            Ok(Arc::new(HybridBackend::new(members)))
        }
    }
}
