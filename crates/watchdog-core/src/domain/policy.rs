//! Termination policy: age vs. configured maximum lifetime.

use chrono::{DateTime, Utc};
use tracing::warn;

use super::age::age_hours;
use super::instance::Candidate;

/// Result of evaluating one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub age_hours: f64,
    pub terminate: bool,
}

/// Maximum-lifetime policy.
///
/// Pure apart from the `warn!` emitted when an instance is over the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifetimePolicy {
    max_lifetime_hours: u32,
}

impl LifetimePolicy {
    pub fn new(max_lifetime_hours: u32) -> Self {
        Self { max_lifetime_hours }
    }

    pub fn max_lifetime_hours(&self) -> u32 {
        self.max_lifetime_hours
    }

    /// Strictly greater: an instance exactly at the limit is kept.
    pub fn exceeds(&self, age_hours: f64) -> bool {
        age_hours > f64::from(self.max_lifetime_hours)
    }

    pub fn evaluate(&self, candidate: &Candidate, now: DateTime<Utc>) -> Verdict {
        let age_hours = age_hours(candidate.launch_time, now);
        let terminate = self.exceeds(age_hours);
        if terminate {
            warn!(
                instance_id = %candidate.instance_id,
                age_hours = format_args!("{age_hours:.1}"),
                limit_hours = self.max_lifetime_hours,
                "instance exceeded max lifetime, terminating"
            );
        }
        Verdict {
            age_hours,
            terminate,
        }
    }

    pub fn should_terminate(&self, candidate: &Candidate, now: DateTime<Utc>) -> bool {
        self.evaluate(candidate, now).terminate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InstanceId, LaunchTime, LifecycleState};
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn candidate(age: Duration) -> Candidate {
        Candidate {
            instance_id: InstanceId::new("i-1"),
            launch_time: LaunchTime::Utc(now() - age),
            state: LifecycleState::Running,
            tags: vec![],
        }
    }

    #[rstest]
    #[case(Duration::hours(2), false)]
    #[case(Duration::hours(3), false)]
    #[case(Duration::hours(3) + Duration::microseconds(500), true)]
    #[case(Duration::hours(3) + Duration::seconds(1), true)]
    #[case(Duration::hours(4), true)]
    fn terminates_only_strictly_over_limit(#[case] age: Duration, #[case] expected: bool) {
        let policy = LifetimePolicy::new(3);
        assert_eq!(policy.should_terminate(&candidate(age), now()), expected);
    }

    #[test]
    fn verdict_carries_age() {
        let policy = LifetimePolicy::new(3);
        let verdict = policy.evaluate(&candidate(Duration::hours(4)), now());
        assert_eq!(verdict.age_hours, 4.0);
        assert!(verdict.terminate);
    }

    #[test]
    fn zero_limit_terminates_any_aged_instance() {
        let policy = LifetimePolicy::new(0);
        assert!(!policy.exceeds(0.0));
        assert!(policy.exceeds(0.01));
    }
}
