//! Per-action-type static configuration: ordered phases and policies.
//!
//! One [`ActionConfig`] exists per action type, shared immutably by every
//! instance of that type. Validation happens once, at registration time --
//! a malformed config is a programmer error that must fail the build of
//! the action set, never surface mid-simulation.

use serde::{Deserialize, Serialize};

use crate::enums::{ActionMode, InterruptAuthority, PhaseInterruptPolicy};

/// Errors raised by construction-time config validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigDefect {
    /// The config declares no phases at all.
    #[error("action config '{name}' declares no phases")]
    NoPhases {
        /// The offending config's name.
        name: String,
    },

    /// A phase duration is negative, NaN, or infinite.
    #[error("action config '{name}' phase '{phase}' has invalid duration")]
    InvalidDuration {
        /// The offending config's name.
        name: String,
        /// The offending phase's name.
        phase: String,
    },
}

/// A named sub-interval of an action with its own interrupt vulnerability.
///
/// Phases are ordered; the running instance advances its own phase index
/// as time passes. The arbitration query always reads the policy of the
/// phase the instance currently reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Human-readable phase name ("windup", "active", "recovery").
    pub name: String,
    /// Phase length in game seconds. Zero is legal (a phase that is
    /// skipped over the instant it is reached).
    pub duration: f64,
    /// How vulnerable this phase is to preemption.
    pub interrupt_policy: PhaseInterruptPolicy,
}

impl Phase {
    /// Create a phase from its parts.
    pub fn new(
        name: impl Into<String>,
        duration: f64,
        interrupt_policy: PhaseInterruptPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            duration,
            interrupt_policy,
        }
    }
}

/// Immutable per-action-type configuration.
///
/// Shared by every instance of the type via `Arc` inside the definition.
/// The scheduler reads `mode`, `authority` and `priority` during
/// arbitration; the phase list answers interrupt queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    /// Human-readable action name ("dash", "heavy_attack").
    pub name: String,
    /// Refresh-vs-restart behavior for repeat requests.
    pub mode: ActionMode,
    /// How aggressively this action preempts a running one.
    pub authority: InterruptAuthority,
    /// Arbitration priority. Only compared under
    /// [`PhaseInterruptPolicy::HigherPriority`], strictly.
    pub priority: i32,
    /// Ordered phase sequence. Must be non-empty.
    pub phases: Vec<Phase>,
}

impl ActionConfig {
    /// Validate the config. Called once at definition registration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigDefect`] if the phase list is empty or any phase
    /// duration is negative or non-finite.
    pub fn validate(&self) -> Result<(), ConfigDefect> {
        if self.phases.is_empty() {
            return Err(ConfigDefect::NoPhases {
                name: self.name.clone(),
            });
        }
        for phase in &self.phases {
            if !phase.duration.is_finite() || phase.duration < 0.0 {
                return Err(ConfigDefect::InvalidDuration {
                    name: self.name.clone(),
                    phase: phase.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Sum of all phase durations, in game seconds.
    ///
    /// Informational only: the scheduler never enforces it. A continuation
    /// poll returning false is what actually ends an action.
    pub fn total_duration(&self) -> f64 {
        self.phases.iter().map(|p| p.duration).sum()
    }

    /// The interrupt policy of the phase at `index`, clamped to the last
    /// declared phase.
    ///
    /// An instance that has advanced past its final phase (or a buggy
    /// implementation reporting a wild index) is treated as sitting in its
    /// last phase, so an interrupt query can never fault.
    pub fn phase_policy(&self, index: usize) -> PhaseInterruptPolicy {
        self.phases
            .get(index)
            .or_else(|| self.phases.last())
            .map_or(PhaseInterruptPolicy::Any, |p| p.interrupt_policy)
    }
}
