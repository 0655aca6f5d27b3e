//! Policy enumerations for action arbitration.
//!
//! Three small vocabularies govern every arbitration decision:
//!
//! - [`ActionMode`] -- whether a running action can absorb fresh requests
//!   of its own kind (refresh) or must always be restarted.
//! - [`InterruptAuthority`] -- how aggressively an *incoming* action may
//!   preempt whatever is running.
//! - [`PhaseInterruptPolicy`] -- how vulnerable the *running* action's
//!   current phase is to being preempted.

use serde::{Deserialize, Serialize};

/// Whether an action consumes repeat requests by refreshing or restarting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionMode {
    /// One-shot behavior. A repeat request while the action runs goes
    /// through the ordinary replacement path (and is usually refused).
    Discrete,
    /// Sustained behavior. A repeat request of the same kind is fed into
    /// the running instance via its update hook instead of restarting it,
    /// preserving phase state.
    Continuous,
}

/// How aggressively an incoming action may preempt the running one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptAuthority {
    /// The incoming action never preempts; it waits in the buffer until
    /// the current action finishes or the request expires.
    Never,
    /// The incoming action asks the running action's current phase for
    /// permission (see [`PhaseInterruptPolicy`]).
    IfAllowed,
    /// The incoming action preempts unconditionally, skipping the phase
    /// check entirely.
    Force,
}

/// How vulnerable a running action's phase is to preemption.
///
/// Consulted only when the incoming action carries
/// [`InterruptAuthority::IfAllowed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseInterruptPolicy {
    /// The phase cannot be interrupted.
    None,
    /// The phase can be interrupted by anything.
    Any,
    /// The phase yields only to a strictly higher-priority incoming
    /// action. Equal priority never authorizes interruption.
    HigherPriority,
    /// Placeholder: the upstream semantics for an explicit allow-list
    /// were never finalized. Currently treated as an unconditional allow;
    /// the runner logs a warning when this policy is consulted so hosts
    /// relying on it notice.
    ExplicitOnly,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policies_serialize_snake_case() {
        let json = serde_json::to_string(&PhaseInterruptPolicy::HigherPriority).ok();
        assert_eq!(json.as_deref(), Some("\"higher_priority\""));
        let json = serde_json::to_string(&InterruptAuthority::IfAllowed).ok();
        assert_eq!(json.as_deref(), Some("\"if_allowed\""));
        let json = serde_json::to_string(&ActionMode::Discrete).ok();
        assert_eq!(json.as_deref(), Some("\"discrete\""));
    }

    #[test]
    fn policies_deserialize() {
        let policy: Result<PhaseInterruptPolicy, _> = serde_json::from_str("\"none\"");
        assert_eq!(policy.ok(), Some(PhaseInterruptPolicy::None));
        let mode: Result<ActionMode, _> = serde_json::from_str("\"continuous\"");
        assert_eq!(mode.ok(), Some(ActionMode::Continuous));
    }
}
