//! Shared type definitions for the impel action arbitration engine.
//!
//! This crate is the single source of truth for the data model used across
//! the impel workspace: identifiers, policy enumerations, and the static
//! per-action-type configuration (phases and arbitration policies).
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for agents and action instances
//! - [`keys`] -- Config-named identities (action kinds, trigger identities)
//! - [`enums`] -- Arbitration policy enumerations
//! - [`phase`] -- Phase and action configuration with build-time validation

pub mod enums;
pub mod ids;
pub mod keys;
pub mod phase;

// Re-export all public types at crate root for convenience.
pub use enums::{ActionMode, InterruptAuthority, PhaseInterruptPolicy};
pub use ids::{AgentId, InstanceId};
pub use keys::{ActionKind, TriggerId};
pub use phase::{ActionConfig, ConfigDefect, Phase};
