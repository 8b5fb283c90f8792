//! Domain model (ids, instances, age, policy, status records, outcomes).
//!
//! 外部サービスに依存しない純粋な型と関数のみを置く。

pub mod ids;
pub mod instance;
pub mod age;
pub mod policy;
pub mod status;
pub mod outcome;
pub mod errors;

pub use self::ids::{BuildId, InstanceId};
pub use self::instance::{
    tag_value, Candidate, InstanceGroup, InstanceRecord, LaunchTime, LifecycleState, Tag,
    BUILD_ID_TAG, UNKNOWN_INSTANCE,
};
pub use self::age::age_hours;
pub use self::policy::{LifetimePolicy, Verdict};
pub use self::status::{BuildStatusUpdate, TERMINATED_STATUS};
pub use self::outcome::{Advisory, CandidateOutcome, TerminationReport};
pub use self::errors::{ErrorKind, WatchdogError};
