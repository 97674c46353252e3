//! Run reports: the JSON record every run leaves behind.
//!
//! A report is written whether the run succeeds or fails; it is the only
//! durable trace of a failed run, since failed runs publish no artifact.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::steps::StepKind;
use crate::trigger::TriggerEvent;

/// Terminal status of one step within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Step completed and handed off
    Succeeded,
    /// Step aborted the run
    Failed,
    /// Step never ran because an earlier one failed
    Skipped,
}

/// Record of one step's execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    /// Which step
    pub step: StepKind,
    /// How it ended
    pub status: StepStatus,
    /// Wall-clock duration in milliseconds (zero for skipped steps)
    pub duration_ms: u64,
    /// Failure detail, present only for failed steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// All four steps completed; an artifact was published
    Succeeded,
    /// A step failed; no artifact was published
    Failed,
}

/// Durable record of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Run identifier
    pub run_id: Uuid,
    /// The event that triggered this run
    pub event: TriggerEvent,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
    /// Overall outcome
    pub outcome: RunOutcome,
    /// Per-step records, in execution order
    pub steps: Vec<StepReport>,
    /// Published artifact directory, present only for successful runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_dir: Option<PathBuf>,
}

impl RunReport {
    /// Records a completed step.
    pub fn record(
        &mut self,
        step: StepKind,
        status: StepStatus,
        duration: Duration,
        detail: Option<String>,
    ) {
        self.steps.push(StepReport {
            step,
            status,
            duration_ms: duration.as_millis() as u64,
            detail,
        });
    }

    /// Marks every step after the failing one as skipped.
    pub fn skip_remaining(&mut self) {
        for step in StepKind::ORDER {
            if !self.steps.iter().any(|s| s.step == step) {
                self.record(step, StepStatus::Skipped, Duration::ZERO, None);
            }
        }
    }

    /// Persists the report as `runs/<run-id>.json` under the store root.
    pub async fn save(&self, store_dir: &Path) -> crate::pipeline::Result<PathBuf> {
        let runs_dir = store_dir.join("runs");
        tokio::fs::create_dir_all(&runs_dir)
            .await
            .map_err(|e| crate::pipeline::Error::io(runs_dir.clone(), e))?;

        let path = runs_dir.join(format!("{}.json", self.run_id));
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            crate::pipeline::Error::Publish {
                reason: format!("failed to serialize run report: {}", e),
            }
        })?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| crate::pipeline::Error::io(path.clone(), e))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        RunReport {
            run_id: Uuid::new_v4(),
            event: TriggerEvent::TagPush {
                tag: "v1.0.0".into(),
            },
            started_at: Utc::now(),
            finished_at: Utc::now(),
            outcome: RunOutcome::Failed,
            steps: Vec::new(),
            artifact_dir: None,
        }
    }

    #[test]
    fn skip_remaining_fills_unexecuted_steps() {
        let mut report = report();
        report.record(
            StepKind::Provision,
            StepStatus::Succeeded,
            Duration::from_millis(10),
            None,
        );
        report.record(
            StepKind::Install,
            StepStatus::Failed,
            Duration::from_millis(20),
            Some("pip exploded".into()),
        );
        report.skip_remaining();

        assert_eq!(report.steps.len(), 4);
        assert_eq!(report.steps[2].step, StepKind::Package);
        assert_eq!(report.steps[2].status, StepStatus::Skipped);
        assert_eq!(report.steps[3].step, StepKind::Publish);
        assert_eq!(report.steps[3].status, StepStatus::Skipped);
    }

    #[tokio::test]
    async fn saves_under_runs_directory() {
        let store = tempfile::tempdir().unwrap();
        let mut r = report();
        r.skip_remaining();

        let path = r.save(store.path()).await.unwrap();
        assert!(path.starts_with(store.path().join("runs")));

        let raw = std::fs::read_to_string(&path).unwrap();
        let loaded: RunReport = serde_json::from_str(&raw).unwrap();
        assert_eq!(loaded.run_id, r.run_id);
        assert_eq!(loaded.steps.len(), 4);
    }
}
