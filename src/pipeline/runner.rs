//! Run orchestration: the strictly linear step sequence.
//!
//! The runner owns the control flow promised by the pipeline contract:
//! provision → install → package → publish, one ephemeral build environment
//! per run, every step under a wall-clock timeout, first failure aborts,
//! nothing published for a failed run, and a JSON report either way.

use std::future::Future;
use std::time::{Duration, Instant};

use chrono::Utc;
use uuid::Uuid;

use super::report::{RunOutcome, RunReport, StepStatus};
use super::steps::{install, package, provision, publish, StepKind};
use super::{BuildEnvironment, Error, Settings};
use crate::trigger::{self, TriggerDecision, TriggerEvent};

/// Outcome of handing an event to the runner.
#[derive(Debug)]
pub enum RunResult {
    /// The event did not match the configured triggers; nothing ran.
    NotTriggered {
        /// Why the event was ignored
        reason: String,
    },
    /// Exactly one run executed; the report says how it went.
    Completed(Box<RunReport>),
}

/// Executes pipeline runs for trigger events.
///
/// Holds the resolved [`Settings`]; each call to [`PipelineRunner::execute`]
/// is an independent run with its own [`BuildEnvironment`]. Runners share
/// nothing mutable, so concurrent runs need no coordination.
#[derive(Debug)]
pub struct PipelineRunner {
    settings: Settings,
}

impl PipelineRunner {
    /// Creates a runner over the given settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Returns a reference to the runner settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Evaluates the event and, if it triggers, executes one full run.
    ///
    /// Step failures do not surface as `Err`: the run completes with a
    /// failed outcome and a saved report. `Err` is reserved for
    /// infrastructure problems (invalid trigger patterns, environment
    /// creation, report persistence).
    pub async fn execute(&self, event: TriggerEvent) -> crate::error::Result<RunResult> {
        match trigger::evaluate(&event, &self.settings.manifest().trigger.tags)? {
            TriggerDecision::Triggered => {}
            TriggerDecision::Ignored { reason } => {
                log::info!("event ignored: {}", reason);
                return Ok(RunResult::NotTriggered { reason });
            }
        }

        let run_id = Uuid::new_v4();
        log::info!("run {} started for {}", run_id, event);

        let mut report = RunReport {
            run_id,
            event,
            started_at: Utc::now(),
            finished_at: Utc::now(),
            outcome: RunOutcome::Failed,
            steps: Vec::new(),
            artifact_dir: None,
        };

        let env = BuildEnvironment::create(self.settings.keep_env())
            .map_err(crate::error::DistError::from)?;

        // Step 1: provision the pinned interpreter
        let (duration, outcome) = self
            .timed(StepKind::Provision, provision::run(&self.settings))
            .await;
        let interpreter = match outcome {
            Ok(path) => {
                report.record(StepKind::Provision, StepStatus::Succeeded, duration, None);
                path
            }
            Err(e) => {
                return self
                    .abort(report, StepKind::Provision, duration, e)
                    .await
            }
        };

        // Step 2: install dependencies into the isolated scope
        let (duration, outcome) = self
            .timed(
                StepKind::Install,
                install::run(&self.settings, &env, &interpreter),
            )
            .await;
        match outcome {
            Ok(()) => report.record(StepKind::Install, StepStatus::Succeeded, duration, None),
            Err(e) => return self.abort(report, StepKind::Install, duration, e).await,
        }

        // Step 3: produce the distributable bundle
        let (duration, outcome) = self
            .timed(StepKind::Package, package::run(&self.settings, &env))
            .await;
        let bundle = match outcome {
            Ok(bundle) => {
                report.record(StepKind::Package, StepStatus::Succeeded, duration, None);
                bundle
            }
            Err(e) => return self.abort(report, StepKind::Package, duration, e).await,
        };

        // Step 4: publish the bundle as an immutable artifact
        let (duration, outcome) = self
            .timed(
                StepKind::Publish,
                publish::run(&self.settings, run_id, &bundle),
            )
            .await;
        let published = match outcome {
            Ok(published) => {
                report.record(StepKind::Publish, StepStatus::Succeeded, duration, None);
                published
            }
            Err(e) => return self.abort(report, StepKind::Publish, duration, e).await,
        };

        report.outcome = RunOutcome::Succeeded;
        report.artifact_dir = Some(published.dir.clone());
        report.finished_at = Utc::now();
        report.save(self.settings.store_dir()).await?;

        log::info!(
            "run {} succeeded; artifact at {}",
            run_id,
            published.dir.display()
        );
        Ok(RunResult::Completed(Box::new(report)))
    }

    /// Runs one step under the configured wall-clock timeout.
    async fn timed<T, F>(&self, step: StepKind, fut: F) -> (Duration, super::Result<T>)
    where
        F: Future<Output = super::Result<T>>,
    {
        let budget = self.settings.step_timeout();
        let start = Instant::now();
        let outcome = match tokio::time::timeout(budget, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                step,
                secs: budget.as_secs(),
            }),
        };
        (start.elapsed(), outcome)
    }

    /// Finalizes a failed run: record, skip the rest, save, no artifact.
    async fn abort(
        &self,
        mut report: RunReport,
        step: StepKind,
        duration: Duration,
        error: Error,
    ) -> crate::error::Result<RunResult> {
        log::error!("run {} failed at {}: {}", report.run_id, step, error);
        if step == StepKind::Publish {
            // A timed-out publish is cancelled mid-copy and cannot clean up
            // after itself
            let artifact_dir = self
                .settings
                .store_dir()
                .join(&self.settings.manifest().artifact.name)
                .join(report.run_id.to_string());
            publish::remove_partial_artifact(&artifact_dir).await;
        }
        report.record(step, StepStatus::Failed, duration, Some(error.to_string()));
        report.skip_remaining();
        report.outcome = RunOutcome::Failed;
        report.finished_at = Utc::now();
        report.save(self.settings.store_dir()).await?;
        Ok(RunResult::Completed(Box::new(report)))
    }
}
