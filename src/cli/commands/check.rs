//! The `check` subcommand: evaluate an event without running anything.

use crate::cli::{Args, EventArgs, OutputManager};
use crate::error::Result;
use crate::manifest::Manifest;
use crate::trigger::{self, TriggerDecision};

/// Reports whether the selected event would start a run.
///
/// Exit codes: 0 = would trigger, 2 = would not.
pub fn execute(args: &Args, event_args: &EventArgs, output: &OutputManager) -> Result<i32> {
    let manifest = Manifest::load(&args.manifest)?;
    let event = event_args.to_event();

    match trigger::evaluate(&event, &manifest.trigger.tags)? {
        TriggerDecision::Triggered => {
            output.success(&format!("{} triggers a run", event))?;
            Ok(0)
        }
        TriggerDecision::Ignored { reason } => {
            output.warn(&format!("{} triggers nothing: {}", event, reason))?;
            Ok(2)
        }
    }
}
