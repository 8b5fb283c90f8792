//! In-memory build status store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{BuildId, BuildStatusUpdate, WatchdogError};
use crate::ports::StatusStore;

#[derive(Default)]
struct StoreState {
    records: HashMap<BuildId, BuildStatusUpdate>,
    calls: usize,
    fail_with: Option<String>,
}

#[derive(Default)]
pub struct InMemoryStatusStore {
    state: Mutex<StoreState>,
}

impl InMemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent update fails with `message`.
    pub async fn fail_with(&self, message: impl Into<String>) {
        self.state.lock().await.fail_with = Some(message.into());
    }

    pub async fn get(&self, build_id: &BuildId) -> Option<BuildStatusUpdate> {
        self.state.lock().await.records.get(build_id).cloned()
    }

    /// Number of update calls, including failed ones.
    pub async fn calls(&self) -> usize {
        self.state.lock().await.calls
    }
}

#[async_trait]
impl StatusStore for InMemoryStatusStore {
    async fn conditional_update(
        &self,
        build_id: &BuildId,
        update: &BuildStatusUpdate,
    ) -> Result<(), WatchdogError> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        if let Some(message) = &state.fail_with {
            return Err(WatchdogError::StatusStore {
                build_id: build_id.clone(),
                message: message.clone(),
            });
        }
        state.records.insert(build_id.clone(), update.clone());
        Ok(())
    }
}
