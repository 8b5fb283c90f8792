//! InstanceRegistry port - compute instance の一覧取得と終了
//!
//! Registry API は `tag:<Key>` / `instance-state-name` 形式のフィルタを受け取り、
//! reservation 単位でグループ化された結果を返す。

use async_trait::async_trait;

use crate::domain::{InstanceGroup, InstanceId, InstanceRecord, WatchdogError};

/// Filter name prefix for tag clauses.
pub const TAG_FILTER_PREFIX: &str = "tag:";

/// Filter name for the lifecycle state clause.
pub const STATE_FILTER: &str = "instance-state-name";

/// One clause of a registry filter: `name` matches any of `values`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    pub name: String,
    pub values: Vec<String>,
}

/// Conjunction of clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceFilter {
    pub clauses: Vec<FilterClause>,
}

impl InstanceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.clauses.push(FilterClause {
            name: format!("{TAG_FILTER_PREFIX}{key}"),
            values: vec![value.to_string()],
        });
        self
    }

    pub fn states<'a>(mut self, states: impl IntoIterator<Item = &'a str>) -> Self {
        self.clauses.push(FilterClause {
            name: STATE_FILTER.to_string(),
            values: states.into_iter().map(str::to_string).collect(),
        });
        self
    }

    /// Evaluates the filter locally. Unknown clause names never match.
    pub fn matches(&self, record: &InstanceRecord) -> bool {
        self.clauses.iter().all(|clause| {
            let actual = if clause.name == STATE_FILTER {
                Some(record.state.as_str())
            } else if let Some(key) = clause.name.strip_prefix(TAG_FILTER_PREFIX) {
                record.tag(key)
            } else {
                None
            };
            actual.is_some_and(|value| clause.values.iter().any(|v| v == value))
        })
    }
}

/// Compute-instance registry/control API.
#[async_trait]
pub trait InstanceRegistry: Send + Sync {
    async fn list_instances(
        &self,
        filter: &InstanceFilter,
    ) -> Result<Vec<InstanceGroup>, WatchdogError>;

    async fn terminate_instances(&self, ids: &[InstanceId]) -> Result<(), WatchdogError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LifecycleState;
    use chrono::{TimeZone, Utc};

    fn record(state: LifecycleState) -> InstanceRecord {
        InstanceRecord::new("i-1", Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(), state)
            .with_tag("Project", "labapp")
            .with_tag("AutoDelete", "true")
    }

    #[test]
    fn filter_requires_every_clause() {
        let filter = InstanceFilter::new()
            .tag("Project", "labapp")
            .tag("AutoDelete", "true")
            .states(["running", "pending"]);

        assert!(filter.matches(&record(LifecycleState::Running)));
        assert!(filter.matches(&record(LifecycleState::Pending)));
        assert!(!filter.matches(&record(LifecycleState::Stopped)));

        let other_pool = InstanceRecord::new(
            "i-2",
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            LifecycleState::Running,
        )
        .with_tag("Project", "other")
        .with_tag("AutoDelete", "true");
        assert!(!filter.matches(&other_pool));
    }

    #[test]
    fn missing_tag_does_not_match() {
        let filter = InstanceFilter::new().tag("AutoDelete", "true");
        let untagged = InstanceRecord::new(
            "i-3",
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            LifecycleState::Running,
        );
        assert!(!filter.matches(&untagged));
    }
}
