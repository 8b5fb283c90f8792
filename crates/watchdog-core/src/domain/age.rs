//! Age calculation.

use chrono::{DateTime, Utc};

use super::instance::LaunchTime;

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Hours elapsed between `launch_time` and `now`.
///
/// Naive launch times are taken as UTC. Fractional hours are kept for
/// reporting ("2.3 hours"). A launch time in the future (clock skew) yields
/// `0.0`.
pub fn age_hours(launch_time: LaunchTime, now: DateTime<Utc>) -> f64 {
    let elapsed = now.signed_duration_since(launch_time.to_utc());
    // num_microseconds only overflows past ~292k years
    let hours = match elapsed.num_microseconds() {
        Some(micros) => micros as f64 / MICROS_PER_HOUR,
        None => elapsed.num_seconds() as f64 / SECONDS_PER_HOUR,
    };
    hours.max(0.0)
}
