//! Notification message formatting for forced terminations.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::ESTIMATED_COST_PER_HOUR;
use crate::domain::{BuildId, InstanceId};

/// Shown in place of a BuildID when the instance carries none.
pub const NO_BUILD_ID: &str = "(none)";

/// Everything an operator needs to investigate a forced termination.
#[derive(Debug, Clone)]
pub struct TerminationNotice<'a> {
    pub instance_id: &'a InstanceId,
    pub build_id: Option<&'a BuildId>,
    pub age_hours: f64,
    pub max_lifetime_hours: u32,
    pub terminated_at: DateTime<Utc>,
    pub pool_name: &'a str,
    pub status_table: &'a str,
}

impl TerminationNotice<'_> {
    fn build_label(&self) -> &str {
        self.build_id.map(BuildId::as_str).unwrap_or(NO_BUILD_ID)
    }

    pub fn estimated_cost(&self) -> f64 {
        self.age_hours * ESTIMATED_COST_PER_HOUR
    }

    pub fn subject(&self) -> String {
        format!(
            "[CRITICAL] {} build instance force-terminated: {}",
            self.pool_name,
            self.build_label()
        )
    }

    pub fn body(&self) -> String {
        let build = self.build_label();
        format!(
            "CRITICAL: {pool} build instance was force-terminated by watchdog\n\
             \n\
             Instance ID: {instance}\n\
             Build ID: {build}\n\
             Instance Age: {age:.1} hours\n\
             Lifetime Limit: {limit} hours\n\
             Termination Time: {at}\n\
             \n\
             Reason: Instance exceeded maximum lifetime limit\n\
             \n\
             This likely indicates a hung build or configuration issue. Please investigate:\n\
             1. Check CloudWatch logs: /{pool}/metal-builds/{build}\n\
             2. Review status table: {table}\n\
             3. Check for partial build artifacts in S3\n\
             4. Verify build configuration\n\
             \n\
             The instance and associated resources have been terminated to prevent runaway costs.\n\
             \n\
             Cost impact: ~${cost:.2} (estimated)\n",
            pool = self.pool_name,
            instance = self.instance_id,
            age = self.age_hours,
            limit = self.max_lifetime_hours,
            at = self.terminated_at.to_rfc3339_opts(SecondsFormat::Micros, false),
            table = self.status_table,
            cost = self.estimated_cost(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn notice<'a>(instance: &'a InstanceId, build: Option<&'a BuildId>) -> TerminationNotice<'a> {
        TerminationNotice {
            instance_id: instance,
            build_id: build,
            age_hours: 4.0,
            max_lifetime_hours: 3,
            terminated_at: Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap(),
            pool_name: "labapp",
            status_table: "labapp-builds",
        }
    }

    #[test]
    fn subject_names_the_build() {
        let instance = InstanceId::new("i-1");
        let build = BuildId::new("b-1");
        assert_eq!(
            notice(&instance, Some(&build)).subject(),
            "[CRITICAL] labapp build instance force-terminated: b-1"
        );
        assert_eq!(
            notice(&instance, None).subject(),
            "[CRITICAL] labapp build instance force-terminated: (none)"
        );
    }

    #[test]
    fn body_carries_age_limit_and_cost() {
        let instance = InstanceId::new("i-1");
        let build = BuildId::new("b-1");
        let body = notice(&instance, Some(&build)).body();

        assert!(body.contains("Instance ID: i-1"));
        assert!(body.contains("Build ID: b-1"));
        assert!(body.contains("Instance Age: 4.0 hours"));
        assert!(body.contains("Lifetime Limit: 3 hours"));
        assert!(body.contains("Termination Time: 2026-10-19T12:00:00.000000+00:00"));
        assert!(body.contains("Check CloudWatch logs: /labapp/metal-builds/b-1"));
        assert!(body.contains("partial build artifacts in S3"));
        assert!(body.contains("Review status table: labapp-builds"));
        assert!(body.contains("Cost impact: ~$17.60 (estimated)"));
    }
}
