//! The `run` subcommand: execute a pipeline run for an event.

use std::time::Duration;

use crate::cli::{Args, OutputManager, RunArgs};
use crate::error::Result;
use crate::manifest::Manifest;
use crate::pipeline::{
    PipelineRunner, RunOutcome, RunResult, SettingsBuilder, StepStatus,
};

/// Executes the pipeline for the selected event.
///
/// Exit codes: 0 when the run succeeded or the event was ignored, 1 when a
/// step failed.
pub async fn execute(args: &Args, run_args: &RunArgs, output: &OutputManager) -> Result<i32> {
    let manifest = Manifest::load(&args.manifest)?;

    let project_root = match &run_args.project_root {
        Some(root) => root.clone(),
        // Manifest paths are relative to the manifest's own directory
        None => args
            .manifest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| std::path::PathBuf::from(".")),
    };

    let mut builder = SettingsBuilder::new()
        .manifest(manifest)
        .project_root(project_root)
        .keep_env(run_args.keep_env);
    if let Some(store) = &run_args.store {
        builder = builder.store_dir(store);
    }
    if let Some(secs) = run_args.step_timeout {
        builder = builder.step_timeout(Duration::from_secs(secs));
    }
    if !run_args.python_programs.is_empty() {
        builder = builder.interpreter_candidates(run_args.python_programs.clone());
    }
    if let Some(packager) = &run_args.packager {
        builder = builder.packager_program(packager);
    }
    let settings = builder.build()?;

    let event = run_args.event.to_event();
    output.section(&format!("pipeline run: {}", event))?;
    output.verbose(&format!("store: {}", settings.store_dir().display()))?;
    output.verbose(&format!(
        "step timeout: {}s",
        settings.step_timeout().as_secs()
    ))?;

    let runner = PipelineRunner::new(settings);
    match runner.execute(event).await? {
        RunResult::NotTriggered { reason } => {
            output.warn(&format!("no run triggered: {}", reason))?;
            Ok(0)
        }
        RunResult::Completed(report) => {
            for step in &report.steps {
                match step.status {
                    StepStatus::Succeeded => {
                        output.success(&format!("{} ({} ms)", step.step, step.duration_ms))?
                    }
                    StepStatus::Failed => {
                        let detail = step.detail.as_deref().unwrap_or("unknown failure");
                        output.error(&format!("{}: {}", step.step, detail))?
                    }
                    StepStatus::Skipped => {
                        output.indent(&format!("{}: skipped", step.step))?
                    }
                }
            }

            match report.outcome {
                RunOutcome::Succeeded => {
                    let artifact = report
                        .artifact_dir
                        .as_deref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    output.success(&format!("run {} published {}", report.run_id, artifact))?;
                    Ok(0)
                }
                RunOutcome::Failed => {
                    output.error(&format!(
                        "run {} failed; no artifact published",
                        report.run_id
                    ))?;
                    Ok(1)
                }
            }
        }
    }
}
