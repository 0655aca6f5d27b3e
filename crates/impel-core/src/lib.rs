//! Per-agent action arbitration for real-time games.
//!
//! Each simulation tick an [`ActionRunner`] decides which behavior its
//! agent executes: it admits or buffers incoming requests, resolves
//! conflicts between a running action and an incoming one via a
//! priority/phase interruption policy, and drives the chosen action's
//! lifecycle (start, per-tick continuation poll, optional mid-flight
//! refresh, kill).
//!
//! # Modules
//!
//! - [`action`] -- The [`Action`] lifecycle trait and [`PhaseTracker`].
//! - [`buffer`] -- Bounded, time-windowed FIFO of pending requests.
//! - [`config`] -- YAML agent profiles (runner settings + action specs).
//! - [`context`] -- Collaborator capability traits and [`ActionContext`].
//! - [`definition`] -- Kind tag + config + predicate + factory bindings.
//! - [`runner`] -- The per-tick arbitration scheduler.
//! - [`set`] -- The frozen trigger-to-definition registry and its builder.
//! - [`trigger`] -- Condition detectors feeding the buffer.
//!
//! [`Action`]: action::Action
//! [`PhaseTracker`]: action::PhaseTracker
//! [`ActionContext`]: context::ActionContext
//! [`ActionRunner`]: runner::ActionRunner

pub mod action;
pub mod buffer;
pub mod config;
pub mod context;
pub mod definition;
pub mod runner;
pub mod set;
pub mod trigger;

// Re-export the working surface at crate root for convenience.
pub use action::{Action, PhaseTracker};
pub use buffer::{Admission, PendingRequest, TriggerBuffer};
pub use config::{ActionSpec, AgentProfile, ConfigError, PhaseSpec, RunnerSpec};
pub use context::{ActionContext, BodyControl, GroundSensor, MovementControl};
pub use definition::{
    decode_params, ActionDefinition, ActionFactory, DefinitionError, StartPredicate,
};
pub use runner::{
    phase_allows_interrupt, ActionRunner, ArbitrationOutcome, RefusalReason, RunnerConfig,
    RunnerError, TickReport,
};
pub use set::{ActionSet, ActionSetBuilder, ActionSetError};
pub use trigger::{ActionTrigger, InputSource};
