//! Agent profile loading and typed config structures.
//!
//! A profile is a YAML document describing one agent archetype: the
//! runner's buffer settings plus every action type with its phases,
//! policies, and trigger bindings. Code (predicates, factories) stays in
//! the host; the profile carries only data. Profiles convert into
//! [`ActionConfig`] values the set builder consumes via
//! [`define_spec`](crate::set::ActionSetBuilder::define_spec).

use std::path::Path;

use impel_types::{ActionConfig, ActionMode, InterruptAuthority, Phase, PhaseInterruptPolicy};
use serde::Deserialize;

use crate::runner::RunnerConfig;

/// Errors that can occur when loading a profile.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the profile file from disk.
    #[error("failed to read profile file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse profile YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A parsed value is out of range.
    #[error("invalid profile value: {reason}")]
    InvalidValue {
        /// Explanation of what is out of range.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// One phase as declared in a profile.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PhaseSpec {
    /// Phase name.
    pub name: String,

    /// Phase length in game seconds.
    pub duration: f64,

    /// Interrupt vulnerability; defaults to `none` (uninterruptible).
    #[serde(default = "default_phase_policy")]
    pub interrupt: PhaseInterruptPolicy,
}

/// One action type as declared in a profile.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActionSpec {
    /// The action kind tag ("dash", "heavy_attack").
    pub kind: String,

    /// Refresh-vs-restart behavior; defaults to `discrete`.
    #[serde(default = "default_mode")]
    pub mode: ActionMode,

    /// Preemption aggressiveness; defaults to `if_allowed`.
    #[serde(default = "default_authority")]
    pub authority: InterruptAuthority,

    /// Arbitration priority; defaults to 0.
    #[serde(default)]
    pub priority: i32,

    /// Ordered phase declarations.
    pub phases: Vec<PhaseSpec>,

    /// Trigger identities that request this action.
    #[serde(default)]
    pub triggers: Vec<String>,
}

impl ActionSpec {
    /// Convert the spec into the engine's [`ActionConfig`].
    pub fn to_config(&self) -> ActionConfig {
        ActionConfig {
            name: self.kind.clone(),
            mode: self.mode,
            authority: self.authority,
            priority: self.priority,
            phases: self
                .phases
                .iter()
                .map(|p| Phase::new(p.name.clone(), p.duration, p.interrupt))
                .collect(),
        }
    }
}

/// Runner settings as declared in a profile.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunnerSpec {
    /// Trigger-buffer capacity; defaults to 4.
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,

    /// Buffered-request lifetime in game seconds; defaults to 0.35.
    #[serde(default = "default_buffer_life")]
    pub buffer_life: f64,
}

impl Default for RunnerSpec {
    fn default() -> Self {
        Self {
            buffer_capacity: default_buffer_capacity(),
            buffer_life: default_buffer_life(),
        }
    }
}

/// A full agent profile: runner settings plus the action catalogue.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentProfile {
    /// Human-readable profile name.
    #[serde(default = "default_profile_name")]
    pub name: String,

    /// Runner settings.
    #[serde(default)]
    pub runner: RunnerSpec,

    /// Every action type this archetype can run.
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

impl AgentProfile {
    /// Load a profile from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::InvalidValue`] for out-of-range settings.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a profile from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::InvalidValue`] for out-of-range settings.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let profile: Self = serde_yml::from_str(yaml)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Runner settings converted to the engine type.
    pub const fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            buffer_capacity: self.runner.buffer_capacity,
            buffer_life: self.runner.buffer_life,
        }
    }

    /// Find the spec for a given action kind, if declared.
    pub fn action(&self, kind: &str) -> Option<&ActionSpec> {
        self.actions.iter().find(|a| a.kind == kind)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.runner.buffer_life.is_finite() || self.runner.buffer_life < 0.0 {
            return Err(ConfigError::InvalidValue {
                reason: format!(
                    "runner.buffer_life must be a non-negative number of seconds, got {}",
                    self.runner.buffer_life
                ),
            });
        }
        for action in &self.actions {
            // Full phase validation happens again at definition build
            // time; this catches data defects at load time with a
            // friendlier error.
            if let Err(defect) = action.to_config().validate() {
                return Err(ConfigError::InvalidValue {
                    reason: defect.to_string(),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_profile_name() -> String {
    "agent".to_owned()
}

const fn default_phase_policy() -> PhaseInterruptPolicy {
    PhaseInterruptPolicy::None
}

const fn default_mode() -> ActionMode {
    ActionMode::Discrete
}

const fn default_authority() -> InterruptAuthority {
    InterruptAuthority::IfAllowed
}

const fn default_buffer_capacity() -> usize {
    4
}

const fn default_buffer_life() -> f64 {
    0.35
}
