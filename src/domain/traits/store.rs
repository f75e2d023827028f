use async_trait::async_trait;

use crate::application::errors::StorageError;
use crate::domain::entities::RunState;

/// Store trait - abstraction for run state persistence
#[async_trait]
pub trait RunStateStore: Send + Sync {
    /// Load the persisted state, `None` if nothing was saved yet.
    async fn load(&self) -> Result<Option<RunState>, StorageError>;

    async fn save(&self, state: &RunState) -> Result<(), StorageError>;
}
