//! In-memory instance registry.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{InstanceGroup, InstanceId, LifecycleState, WatchdogError};
use crate::ports::{InstanceFilter, InstanceRegistry};

#[derive(Default)]
struct RegistryState {
    groups: Vec<InstanceGroup>,
    fail_listing: Option<String>,
    fail_termination: HashSet<InstanceId>,
    terminate_calls: Vec<Vec<InstanceId>>,
}

/// Registry backed by a list of reservations.
///
/// `terminate_instances` moves matching instances to `terminated`, so a second
/// pass over the same registry no longer sees them.
#[derive(Default)]
pub struct InMemoryRegistry {
    state: Mutex<RegistryState>,
}

impl InMemoryRegistry {
    pub fn new(groups: Vec<InstanceGroup>) -> Self {
        Self {
            state: Mutex::new(RegistryState {
                groups,
                ..Default::default()
            }),
        }
    }

    /// Every subsequent `list_instances` fails with `message`.
    pub async fn fail_listing(&self, message: impl Into<String>) {
        self.state.lock().await.fail_listing = Some(message.into());
    }

    /// `terminate_instances` fails whenever `id` is in the request.
    pub async fn fail_termination_of(&self, id: InstanceId) {
        self.state.lock().await.fail_termination.insert(id);
    }

    /// Termination requests received so far (for testing).
    pub async fn terminate_calls(&self) -> Vec<Vec<InstanceId>> {
        self.state.lock().await.terminate_calls.clone()
    }

    pub async fn state_of(&self, id: &InstanceId) -> Option<LifecycleState> {
        let state = self.state.lock().await;
        state
            .groups
            .iter()
            .flat_map(|group| &group.instances)
            .find(|record| record.instance_id.as_ref() == Some(id))
            .map(|record| record.state)
    }
}

#[async_trait]
impl InstanceRegistry for InMemoryRegistry {
    async fn list_instances(
        &self,
        filter: &InstanceFilter,
    ) -> Result<Vec<InstanceGroup>, WatchdogError> {
        let state = self.state.lock().await;
        if let Some(message) = &state.fail_listing {
            return Err(WatchdogError::registry("list_instances", message.clone()));
        }

        let groups = state
            .groups
            .iter()
            .map(|group| {
                InstanceGroup::new(
                    group
                        .instances
                        .iter()
                        .filter(|record| filter.matches(record))
                        .cloned()
                        .collect(),
                )
            })
            .filter(|group| !group.instances.is_empty())
            .collect();
        Ok(groups)
    }

    async fn terminate_instances(&self, ids: &[InstanceId]) -> Result<(), WatchdogError> {
        let mut state = self.state.lock().await;
        state.terminate_calls.push(ids.to_vec());

        if let Some(id) = ids.iter().find(|id| state.fail_termination.contains(*id)) {
            return Err(WatchdogError::registry(
                "terminate_instances",
                format!("simulated failure terminating {id}"),
            ));
        }

        for record in state.groups.iter_mut().flat_map(|group| &mut group.instances) {
            if record
                .instance_id
                .as_ref()
                .is_some_and(|id| ids.contains(id))
            {
                record.state = LifecycleState::Terminated;
            }
        }
        Ok(())
    }
}
