//! Outcome model: per-candidate result of one watchdog pass.
//!
//! 終了（primary）と、ステータス更新・通知（advisory）を型で分けることで、
//! ログを見なくても「終了は成功したが通知は失敗した」を判定できる。

use serde::{Deserialize, Serialize};

use super::ids::{BuildId, InstanceId};

/// Result of a best-effort side effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum Advisory {
    Done,
    Skipped,
    Failed(String),
}

impl Advisory {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// A successful forced termination and its advisory side effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminationReport {
    pub instance_id: InstanceId,
    pub build_id: Option<BuildId>,
    pub age_hours: f64,
    pub reconciliation: Advisory,
    pub notification: Advisory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CandidateOutcome {
    /// Under the limit; nothing was changed.
    WithinLimit {
        instance_id: InstanceId,
        age_hours: f64,
    },

    Terminated(TerminationReport),

    /// The candidate could not be processed. `error` is the message surfaced
    /// in the invocation result.
    Failed { instance: String, error: String },
}
