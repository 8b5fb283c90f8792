//! InstanceLocator - 監視対象インスタンスの検索
//!
//! `Project = <pool>` かつ `AutoDelete = true` かつ state ∈ {running, pending}

use std::sync::Arc;

use tracing::{error, info};

use crate::domain::{InstanceRecord, LifecycleState, WatchdogError};
use crate::ports::{InstanceFilter, InstanceRegistry};

pub const PROJECT_TAG: &str = "Project";
pub const AUTO_DELETE_TAG: &str = "AutoDelete";

pub struct InstanceLocator {
    registry: Arc<dyn InstanceRegistry>,
    pool_name: String,
}

impl InstanceLocator {
    pub fn new(registry: Arc<dyn InstanceRegistry>, pool_name: impl Into<String>) -> Self {
        Self {
            registry,
            pool_name: pool_name.into(),
        }
    }

    pub fn filter(&self) -> InstanceFilter {
        InstanceFilter::new()
            .tag(PROJECT_TAG, &self.pool_name)
            .tag(AUTO_DELETE_TAG, "true")
            .states(LifecycleState::ACTIVE.iter().map(LifecycleState::as_str))
    }

    /// Candidates across all registry groups.
    ///
    /// A registry failure is returned as-is; the caller treats it as fatal.
    pub async fn find_candidates(&self) -> Result<Vec<InstanceRecord>, WatchdogError> {
        let groups = self
            .registry
            .list_instances(&self.filter())
            .await
            .inspect_err(|e| error!(error = %e, "error describing instances"))?;

        let records: Vec<InstanceRecord> =
            groups.into_iter().flat_map(|group| group.instances).collect();
        info!(count = records.len(), pool = %self.pool_name, "found instances to check");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InstanceGroup;
    use crate::impls::InMemoryRegistry;
    use crate::ports::FilterClause;
    use chrono::{TimeZone, Utc};

    fn pool_record(id: &str, state: LifecycleState) -> InstanceRecord {
        InstanceRecord::new(id, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(), state)
            .with_tag(PROJECT_TAG, "labapp")
            .with_tag(AUTO_DELETE_TAG, "true")
    }

    #[test]
    fn filter_targets_pool_auto_delete_and_active_states() {
        let locator = InstanceLocator::new(Arc::new(InMemoryRegistry::default()), "labapp");
        assert_eq!(
            locator.filter().clauses,
            vec![
                FilterClause {
                    name: "tag:Project".to_string(),
                    values: vec!["labapp".to_string()],
                },
                FilterClause {
                    name: "tag:AutoDelete".to_string(),
                    values: vec!["true".to_string()],
                },
                FilterClause {
                    name: "instance-state-name".to_string(),
                    values: vec!["running".to_string(), "pending".to_string()],
                },
            ]
        );
    }

    #[tokio::test]
    async fn flattens_groups() {
        let registry = InMemoryRegistry::new(vec![
            InstanceGroup::new(vec![
                pool_record("i-1", LifecycleState::Running),
                pool_record("i-2", LifecycleState::Pending),
            ]),
            InstanceGroup::new(vec![pool_record("i-3", LifecycleState::Running)]),
            InstanceGroup::new(vec![pool_record("i-4", LifecycleState::Stopped)]),
        ]);
        let locator = InstanceLocator::new(Arc::new(registry), "labapp");

        let found: Vec<String> = locator
            .find_candidates()
            .await
            .unwrap()
            .iter()
            .map(|r| r.label().to_string())
            .collect();
        assert_eq!(found, vec!["i-1", "i-2", "i-3"]);
    }

    #[tokio::test]
    async fn registry_failure_propagates() {
        let registry = InMemoryRegistry::default();
        registry.fail_listing("throttled").await;
        let locator = InstanceLocator::new(Arc::new(registry), "labapp");

        let err = locator.find_candidates().await.unwrap_err();
        assert!(matches!(err, WatchdogError::Registry { operation: "list_instances", .. }));
    }
}
