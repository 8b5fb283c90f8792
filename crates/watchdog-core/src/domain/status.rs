//! Build status record update written on forced termination.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Terminal status marker written to the status store.
pub const TERMINATED_STATUS: &str = "terminated";

/// Fields set on the build status record keyed by BuildID.
///
/// Serialized with the store's attribute names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuildStatusUpdate {
    pub status: String,
    pub forced_termination: bool,
    pub completion_time: String,
    pub error_message: String,
}

impl BuildStatusUpdate {
    pub fn forced_termination(
        age_hours: f64,
        max_lifetime_hours: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            status: TERMINATED_STATUS.to_string(),
            forced_termination: true,
            completion_time: now.to_rfc3339_opts(SecondsFormat::Micros, false),
            error_message: format!(
                "Force terminated by watchdog after {age_hours:.1} hours (limit: {max_lifetime_hours}h)"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn forced_termination_fields() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let update = BuildStatusUpdate::forced_termination(4.04, 3, now);

        assert_eq!(update.status, TERMINATED_STATUS);
        assert!(update.forced_termination);
        assert_eq!(update.completion_time, "2026-10-19T12:00:00.000000+00:00");
        assert_eq!(
            update.error_message,
            "Force terminated by watchdog after 4.0 hours (limit: 3h)"
        );
    }

    #[test]
    fn serializes_with_store_attribute_names() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let v = serde_json::to_value(BuildStatusUpdate::forced_termination(5.0, 3, now)).unwrap();
        assert_eq!(v["Status"], "terminated");
        assert_eq!(v["ForcedTermination"], true);
        assert!(v["CompletionTime"].is_string());
        assert!(v["ErrorMessage"].as_str().unwrap().contains("limit: 3h"));
    }
}
