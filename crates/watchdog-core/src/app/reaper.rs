//! Reaper - 寿命超過インスタンスの回収
//!
//! # フロー
//! 1. InstanceLocator で候補を取得（失敗したら Fatal で終了）
//! 2. 候補ごとに LifetimePolicy で判定
//! 3. 超過していれば terminate → status store 更新 → 通知
//! 4. 候補単位のエラーは errors に記録して次へ進む
//!
//! terminate が primary。status store 更新と通知は advisory で、失敗しても
//! ログに残すだけで errors には数えない。terminate の失敗はこの実行内では
//! リトライしない（次回の定期実行で同じインスタンスが再検出される）。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use super::locator::InstanceLocator;
use super::notification::TerminationNotice;
use super::report::{InvocationResult, RunReport};
use crate::config::WatchdogConfig;
use crate::domain::{
    Advisory, BuildStatusUpdate, Candidate, CandidateOutcome, InstanceRecord, LifetimePolicy,
    TerminationReport, WatchdogError,
};
use crate::ports::{Clock, InstanceRegistry, Notifier, StatusStore};

pub struct Reaper {
    locator: InstanceLocator,
    registry: Arc<dyn InstanceRegistry>,
    status_store: Arc<dyn StatusStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    policy: LifetimePolicy,
    config: WatchdogConfig,
}

impl Reaper {
    pub fn new(
        config: WatchdogConfig,
        registry: Arc<dyn InstanceRegistry>,
        status_store: Arc<dyn StatusStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            locator: InstanceLocator::new(Arc::clone(&registry), config.pool_name.clone()),
            registry,
            status_store,
            notifier,
            clock,
            policy: LifetimePolicy::new(config.max_lifetime_hours),
            config,
        }
    }

    pub fn policy(&self) -> LifetimePolicy {
        self.policy
    }

    /// One watchdog pass at the clock's current time.
    pub async fn run(&self) -> RunReport {
        self.run_at(self.clock.now()).await
    }

    pub async fn run_at(&self, now: DateTime<Utc>) -> RunReport {
        info!(
            started_at = %now.to_rfc3339(),
            max_lifetime_hours = self.policy.max_lifetime_hours(),
            "watchdog execution started"
        );

        let records = match self.locator.find_candidates().await {
            Ok(records) => records,
            Err(e) => {
                let error = format!("Fatal error in watchdog: {e}");
                error!(error = %e, "watchdog aborted before checking any instance");
                return RunReport::Fatal {
                    error,
                    result: InvocationResult::default(),
                };
            }
        };

        let mut result = InvocationResult::default();
        let mut outcomes = Vec::with_capacity(records.len());
        for record in records {
            result.checked += 1;
            let outcome = self.process(record, now).await;
            result.record(&outcome);
            outcomes.push(outcome);
        }

        info!(
            checked = result.checked,
            terminated = result.terminated,
            errors = result.errors.len(),
            "watchdog execution completed"
        );
        RunReport::Completed { result, outcomes }
    }

    /// Failure boundary for one candidate: every error ends up in the outcome.
    async fn process(&self, record: InstanceRecord, now: DateTime<Utc>) -> CandidateOutcome {
        let instance = record.label().to_string();
        match self.evaluate_and_reap(record, now).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let error = format!("Error processing instance {instance}: {e}");
                error!(instance_id = %instance, error = %e, "error processing instance");
                CandidateOutcome::Failed { instance, error }
            }
        }
    }

    async fn evaluate_and_reap(
        &self,
        record: InstanceRecord,
        now: DateTime<Utc>,
    ) -> Result<CandidateOutcome, WatchdogError> {
        let candidate = Candidate::try_from(record)?;
        let verdict = self.policy.evaluate(&candidate, now);

        if !verdict.terminate {
            info!(
                instance_id = %candidate.instance_id,
                age_hours = format_args!("{:.1}", verdict.age_hours),
                "instance within limit"
            );
            return Ok(CandidateOutcome::WithinLimit {
                instance_id: candidate.instance_id,
                age_hours: verdict.age_hours,
            });
        }

        let report = self.terminate(candidate, verdict.age_hours, now).await?;
        Ok(CandidateOutcome::Terminated(report))
    }

    async fn terminate(
        &self,
        candidate: Candidate,
        age_hours: f64,
        now: DateTime<Utc>,
    ) -> Result<TerminationReport, WatchdogError> {
        let build_id = candidate.build_id();
        info!(
            instance_id = %candidate.instance_id,
            build_id = build_id.as_ref().map(|b| b.as_str()).unwrap_or_default(),
            age_hours = format_args!("{age_hours:.1}"),
            "terminating instance"
        );

        self.registry
            .terminate_instances(std::slice::from_ref(&candidate.instance_id))
            .await?;
        info!(instance_id = %candidate.instance_id, "instance termination initiated");

        let reconciliation = match &build_id {
            Some(build_id) => {
                let update = BuildStatusUpdate::forced_termination(
                    age_hours,
                    self.policy.max_lifetime_hours(),
                    now,
                );
                match self.status_store.conditional_update(build_id, &update).await {
                    Ok(()) => {
                        info!(%build_id, "updated build status record");
                        Advisory::Done
                    }
                    Err(e) => {
                        warn!(%build_id, error = %e, "failed to update build status record");
                        Advisory::Failed(e.to_string())
                    }
                }
            }
            None => Advisory::Skipped,
        };

        let notice = TerminationNotice {
            instance_id: &candidate.instance_id,
            build_id: build_id.as_ref(),
            age_hours,
            max_lifetime_hours: self.policy.max_lifetime_hours(),
            terminated_at: now,
            pool_name: &self.config.pool_name,
            status_table: &self.config.status_table,
        };
        let notification = match self.notifier.publish(&notice.subject(), &notice.body()).await {
            Ok(()) => {
                info!(instance_id = %candidate.instance_id, "sent termination notification");
                Advisory::Done
            }
            Err(e) => {
                warn!(instance_id = %candidate.instance_id, error = %e, "failed to send termination notification");
                Advisory::Failed(e.to_string())
            }
        };

        Ok(TerminationReport {
            instance_id: candidate.instance_id,
            build_id,
            age_hours,
            reconciliation,
            notification,
        })
    }
}
