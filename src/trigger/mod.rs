//! Trigger evaluation for pipeline runs.
//!
//! A run starts for exactly two kinds of events: a tag push whose tag
//! matches one of the configured glob patterns (default `v*`), or a manual
//! dispatch with no parameters. Anything else triggers nothing.

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, DistError, Result};

/// Default tag pattern used when the manifest does not override it.
pub const DEFAULT_TAG_PATTERN: &str = "v*";

/// An externally generated event that may start a pipeline run.
///
/// Events are immutable; evaluation never mutates or consumes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerEvent {
    /// A version tag was pushed (e.g. `v1.0.0`).
    TagPush {
        /// The pushed tag name
        tag: String,
    },
    /// An operator requested a run by hand. Carries no payload.
    ManualDispatch,
}

impl std::fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerEvent::TagPush { tag } => write!(f, "tag push '{}'", tag),
            TriggerEvent::ManualDispatch => write!(f, "manual dispatch"),
        }
    }
}

/// Outcome of evaluating an event against the configured trigger patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerDecision {
    /// The event starts exactly one run.
    Triggered,
    /// The event does not start a run; the reason is user-facing.
    Ignored {
        /// Why the event was ignored
        reason: String,
    },
}

impl TriggerDecision {
    /// Whether this decision starts a run.
    pub fn is_triggered(&self) -> bool {
        matches!(self, TriggerDecision::Triggered)
    }
}

/// Evaluates an event against a list of tag glob patterns.
///
/// Manual dispatch always triggers. A tag push triggers iff the tag matches
/// at least one pattern. Invalid patterns are a configuration error, not an
/// ignored event.
pub fn evaluate(event: &TriggerEvent, tag_patterns: &[String]) -> Result<TriggerDecision> {
    match event {
        TriggerEvent::ManualDispatch => Ok(TriggerDecision::Triggered),
        TriggerEvent::TagPush { tag } => {
            for raw in tag_patterns {
                let pattern = Pattern::new(raw).map_err(|e| {
                    DistError::Cli(CliError::InvalidArguments {
                        reason: format!("Invalid tag pattern '{}': {}", raw, e),
                    })
                })?;
                if pattern.matches(tag) {
                    log::debug!("tag '{}' matches pattern '{}'", tag, raw);
                    return Ok(TriggerDecision::Triggered);
                }
            }
            Ok(TriggerDecision::Ignored {
                reason: format!(
                    "tag '{}' matches none of the configured patterns [{}]",
                    tag,
                    tag_patterns.join(", ")
                ),
            })
        }
    }
}
