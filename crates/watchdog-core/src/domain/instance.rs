//! Instance model: registry records and validated candidates.
//!
//! Registry は reservation 単位でグループ化されたレコードを返す。
//! レコードの id / launch_time は欠けている可能性があるため Option で受け、
//! Candidate への変換時に検証する（失敗はインスタンス単位のエラーになる）。

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::WatchdogError;
use super::ids::{BuildId, InstanceId};

/// Tag key carrying the status-store correlation key.
pub const BUILD_ID_TAG: &str = "BuildID";

/// Label used in error messages when a record carries no instance id.
pub const UNKNOWN_INSTANCE: &str = "unknown";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Launch timestamp as reported by the registry.
///
/// Some registries report naive timestamps; those are interpreted as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LaunchTime {
    Utc(DateTime<Utc>),
    Naive(NaiveDateTime),
}

impl LaunchTime {
    pub fn to_utc(self) -> DateTime<Utc> {
        match self {
            Self::Utc(at) => at,
            Self::Naive(at) => at.and_utc(),
        }
    }
}

impl From<DateTime<Utc>> for LaunchTime {
    fn from(at: DateTime<Utc>) -> Self {
        Self::Utc(at)
    }
}

impl From<NaiveDateTime> for LaunchTime {
    fn from(at: NaiveDateTime) -> Self {
        Self::Naive(at)
    }
}

impl FromStr for LaunchTime {
    type Err = WatchdogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(at) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::Utc(at.with_timezone(&Utc)));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(Self::Naive)
            .ok_or_else(|| WatchdogError::InvalidLaunchTime {
                value: s.to_string(),
                reason: "expected RFC 3339 or naive ISO-8601 timestamp".to_string(),
            })
    }
}

impl TryFrom<String> for LaunchTime {
    type Error = WatchdogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LaunchTime> for String {
    fn from(at: LaunchTime) -> Self {
        at.to_string()
    }
}

impl fmt::Display for LaunchTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc(at) => f.write_str(&at.to_rfc3339()),
            Self::Naive(at) => write!(f, "{}", at.format(NAIVE_FORMATS[0])),
        }
    }
}

/// Lifecycle state of a compute instance.
///
/// Only `pending` and `running` instances are candidates for the watchdog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleState {
    Pending,
    Running,
    ShuttingDown,
    Terminated,
    Stopping,
    Stopped,
}

impl LifecycleState {
    pub const ACTIVE: [LifecycleState; 2] = [LifecycleState::Running, LifecycleState::Pending];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::ShuttingDown => "shutting-down",
            Self::Terminated => "terminated",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// First tag with `key` wins when the registry reports duplicates.
pub fn tag_value<'a>(tags: &'a [Tag], key: &str) -> Option<&'a str> {
    tags.iter()
        .find(|tag| tag.key == key)
        .map(|tag| tag.value.as_str())
}

/// Raw instance as returned by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<InstanceId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_time: Option<LaunchTime>,

    pub state: LifecycleState,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl InstanceRecord {
    pub fn new(
        instance_id: impl Into<String>,
        launch_time: impl Into<LaunchTime>,
        state: LifecycleState,
    ) -> Self {
        Self {
            instance_id: Some(InstanceId::new(instance_id)),
            launch_time: Some(launch_time.into()),
            state,
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push(Tag::new(key, value));
        self
    }

    /// Instance id for log and error messages.
    pub fn label(&self) -> &str {
        self.instance_id
            .as_ref()
            .map(InstanceId::as_str)
            .unwrap_or(UNKNOWN_INSTANCE)
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        tag_value(&self.tags, key)
    }
}

/// Grouping imposed by the registry API (a reservation).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceGroup {
    #[serde(default)]
    pub instances: Vec<InstanceRecord>,
}

impl InstanceGroup {
    pub fn new(instances: Vec<InstanceRecord>) -> Self {
        Self { instances }
    }
}

/// An instance eligible for lifetime-policy evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub instance_id: InstanceId,
    pub launch_time: LaunchTime,
    pub state: LifecycleState,
    pub tags: Vec<Tag>,
}

impl Candidate {
    pub fn tag(&self, key: &str) -> Option<&str> {
        tag_value(&self.tags, key)
    }

    pub fn build_id(&self) -> Option<BuildId> {
        self.tag(BUILD_ID_TAG).and_then(BuildId::from_tag_value)
    }
}

impl TryFrom<InstanceRecord> for Candidate {
    type Error = WatchdogError;

    fn try_from(record: InstanceRecord) -> Result<Self, Self::Error> {
        let instance_id = record
            .instance_id
            .ok_or_else(|| WatchdogError::InvalidInstance("missing instance id".to_string()))?;
        let launch_time = record.launch_time.ok_or_else(|| {
            WatchdogError::InvalidInstance(format!("instance {instance_id} has no launch time"))
        })?;
        Ok(Self {
            instance_id,
            launch_time,
            state: record.state,
            tags: record.tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("2026-10-19T08:00:00Z")]
    #[case("2026-10-19T10:00:00+02:00")]
    #[case("2026-10-19T08:00:00")]
    #[case("2026-10-19 08:00:00")]
    #[case("2026-10-19T08:00:00.000")]
    fn launch_time_parses_to_same_instant(#[case] raw: &str) {
        let at: LaunchTime = raw.parse().unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        assert_eq!(at.to_utc(), expected);
    }

    #[test]
    fn launch_time_rejects_garbage() {
        let err = "yesterday".parse::<LaunchTime>().unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn first_duplicate_tag_wins() {
        let record = InstanceRecord::new(
            "i-1",
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            LifecycleState::Running,
        )
        .with_tag(BUILD_ID_TAG, "b-first")
        .with_tag(BUILD_ID_TAG, "b-second");

        let candidate = Candidate::try_from(record).unwrap();
        assert_eq!(candidate.build_id(), Some(BuildId::new("b-first")));
    }

    #[test]
    fn empty_build_id_tag_is_absent() {
        let record = InstanceRecord::new(
            "i-1",
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            LifecycleState::Running,
        )
        .with_tag(BUILD_ID_TAG, "");

        let candidate = Candidate::try_from(record).unwrap();
        assert_eq!(candidate.build_id(), None);
    }

    #[test]
    fn record_without_id_is_labelled_unknown() {
        let record = InstanceRecord {
            instance_id: None,
            launch_time: None,
            state: LifecycleState::Running,
            tags: vec![],
        };
        assert_eq!(record.label(), UNKNOWN_INSTANCE);
        let err = Candidate::try_from(record).unwrap_err();
        assert!(err.to_string().contains("missing instance id"));
    }

    #[test]
    fn record_without_launch_time_is_rejected() {
        let record = InstanceRecord {
            instance_id: Some(InstanceId::new("i-9")),
            launch_time: None,
            state: LifecycleState::Pending,
            tags: vec![],
        };
        let err = Candidate::try_from(record).unwrap_err();
        assert!(err.to_string().contains("i-9"));
    }

    #[test]
    fn record_deserializes_from_inventory_json() {
        let record: InstanceRecord = serde_json::from_value(serde_json::json!({
            "instance_id": "i-abc",
            "launch_time": "2026-10-19T08:00:00",
            "state": "running",
            "tags": [{"key": "Project", "value": "labapp"}],
        }))
        .unwrap();

        assert_eq!(record.label(), "i-abc");
        assert!(matches!(record.launch_time, Some(LaunchTime::Naive(_))));
        assert_eq!(record.tag("Project"), Some("labapp"));
    }

    #[test]
    fn only_pending_and_running_are_active() {
        assert_eq!(
            LifecycleState::ACTIVE,
            [LifecycleState::Running, LifecycleState::Pending]
        );
        assert_eq!(
            serde_json::to_string(&LifecycleState::ShuttingDown).unwrap(),
            "\"shutting-down\""
        );
    }
}
