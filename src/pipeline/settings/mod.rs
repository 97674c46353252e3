//! Runtime configuration for pipeline runs.
//!
//! [`Settings`] is the resolved form of the manifest: paths anchored at the
//! project root, an artifact store location, and the hardening knobs the
//! declarative manifest does not carry (per-step timeout, tool overrides).

mod builder;
mod core;

pub use builder::SettingsBuilder;
pub use core::{Settings, DEFAULT_STEP_TIMEOUT};
