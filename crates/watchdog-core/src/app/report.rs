//! Report - 実行結果の集計とレスポンス整形
//!
//! 成功時: `{ statusCode: 200, body: "{checked, terminated, errors}" }`
//! 致命的エラー時: `{ statusCode: 500, body: "{error, results}" }`

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::CandidateOutcome;

pub const STATUS_OK: u16 = 200;
pub const STATUS_FATAL: u16 = 500;

/// Counts for one invocation. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResult {
    pub checked: usize,
    pub terminated: usize,
    pub errors: Vec<String>,
}

impl InvocationResult {
    /// Folds one candidate's outcome into the counts. `checked` is counted by
    /// the caller before the candidate is processed.
    pub fn record(&mut self, outcome: &CandidateOutcome) {
        match outcome {
            CandidateOutcome::WithinLimit { .. } => {}
            CandidateOutcome::Terminated(_) => self.terminated += 1,
            CandidateOutcome::Failed { error, .. } => self.errors.push(error.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunReport {
    Completed {
        result: InvocationResult,
        outcomes: Vec<CandidateOutcome>,
    },

    /// Discovery failed before any candidate was seen.
    Fatal {
        error: String,
        result: InvocationResult,
    },
}

impl RunReport {
    pub fn result(&self) -> &InvocationResult {
        match self {
            Self::Completed { result, .. } | Self::Fatal { result, .. } => result,
        }
    }

    pub fn outcomes(&self) -> &[CandidateOutcome] {
        match self {
            Self::Completed { outcomes, .. } => outcomes,
            Self::Fatal { .. } => &[],
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }

    pub fn into_response(self) -> Response {
        Response::from(&self)
    }
}

#[derive(Debug, Serialize)]
struct FatalBody<'a> {
    error: &'a str,
    results: &'a InvocationResult,
}

/// What the scheduled trigger receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    /// JSON-encoded result body.
    pub body: String,
}

impl From<&RunReport> for Response {
    fn from(report: &RunReport) -> Self {
        match report {
            RunReport::Completed { result, .. } => Self {
                status_code: STATUS_OK,
                body: encode_body(result),
            },
            RunReport::Fatal { error, result } => Self {
                status_code: STATUS_FATAL,
                body: encode_body(&FatalBody {
                    error,
                    results: result,
                }),
            },
        }
    }
}

/// Empty body (logged) if the value cannot be encoded.
fn encode_body<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        error!(error = %e, "failed to encode response body");
        String::new()
    })
}
