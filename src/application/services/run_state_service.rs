//! Shared, persisted run state (paused / dry-run)

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::errors::CommandError;
use crate::domain::entities::RunState;
use crate::domain::traits::RunStateStore;

/// Owns the bot's [`RunState`] and its persistence.
///
/// Every update runs read → compute → save → assign under one lock, so
/// concurrent toggles never interleave. The in-memory state only changes once
/// the store accepted the new value.
pub struct RunStateService {
    state: Mutex<RunState>,
    store: Arc<dyn RunStateStore>,
}

impl RunStateService {
    pub fn new(store: Arc<dyn RunStateStore>, initial: RunState) -> Self {
        Self {
            state: Mutex::new(initial),
            store,
        }
    }

    /// Start from whatever `store` holds, or the defaults if it holds nothing
    /// usable.
    pub async fn load(store: Arc<dyn RunStateStore>) -> Self {
        let initial = match store.load().await {
            Ok(Some(state)) => state,
            Ok(None) => {
                tracing::info!("No saved run state, using defaults");
                RunState::default()
            }
            Err(e) => {
                tracing::warn!("Couldn't read run state: {}, using defaults", e);
                RunState::default()
            }
        };
        tracing::info!("Run state: {}", initial);
        Self::new(store, initial)
    }

    pub async fn snapshot(&self) -> RunState {
        *self.state.lock().await
    }

    pub async fn is_paused(&self) -> bool {
        self.snapshot().await.paused
    }

    pub async fn is_dry_run(&self) -> bool {
        self.snapshot().await.dry_run
    }

    /// Apply `updater` and persist the result.
    pub async fn update<F>(&self, updater: F) -> Result<RunState, CommandError>
    where
        F: FnOnce(RunState) -> Result<RunState, CommandError>,
    {
        let mut state = self.state.lock().await;
        let next = updater(*state)?;
        self.store.save(&next).await?;
        *state = next;
        tracing::info!("Run state is now {}", next);
        Ok(next)
    }
}
