//! Condition detectors that turn fired conditions into buffered requests.
//!
//! A trigger is constructed with everything it needs -- its own identity,
//! the action set, the shared buffer handle, and the buffer lifetime --
//! so there is no ambient input singleton anywhere. Event sources are
//! injected the same way via [`InputSource`].
//!
//! An unresolvable fire (no binding for the trigger's identity) is logged
//! and dropped; it never propagates as a fault across the trigger
//! boundary.

use std::cell::RefCell;
use std::rc::Rc;

use impel_types::TriggerId;
use tracing::{debug, warn};

use crate::buffer::{Admission, PendingRequest, TriggerBuffer};
use crate::runner::ActionRunner;
use crate::set::ActionSet;

/// An injected event-source handle a trigger can poll.
///
/// Input-device binding is outside this engine; hosts adapt their input
/// layer (buttons, gestures, AI signals) behind this trait.
pub trait InputSource {
    /// Whether the condition for the given trigger identity fired since
    /// the last poll.
    fn is_active(&self, trigger: &TriggerId) -> bool;
}

/// A condition detector bound to one trigger identity.
///
/// Holds the action-set and buffer handles it was given at construction
/// and resolves its own identity on every fire.
#[derive(Debug, Clone)]
pub struct ActionTrigger {
    id: TriggerId,
    set: Rc<ActionSet>,
    buffer: Rc<RefCell<TriggerBuffer>>,
    buffer_life: f64,
}

impl ActionTrigger {
    /// Create a detector for one trigger identity.
    pub fn new(
        id: TriggerId,
        set: Rc<ActionSet>,
        buffer: Rc<RefCell<TriggerBuffer>>,
        buffer_life: f64,
    ) -> Self {
        Self {
            id,
            set,
            buffer,
            buffer_life: buffer_life.max(0.0),
        }
    }

    /// Instantiate one detector per identity the set recognizes, wired to
    /// the given runner's buffer and lifetime.
    pub fn for_set(set: &Rc<ActionSet>, runner: &ActionRunner) -> Vec<Self> {
        set.trigger_ids()
            .into_iter()
            .map(|id| Self::new(id, Rc::clone(set), runner.buffer(), runner.buffer_life()))
            .collect()
    }

    /// This detector's trigger identity.
    pub const fn id(&self) -> &TriggerId {
        &self.id
    }

    /// Fire the trigger: resolve the identity and register a request
    /// expiring `buffer_life` seconds from `now`.
    ///
    /// Returns the buffer's admission decision, or `None` if the identity
    /// did not resolve (logged, dropped, never an error).
    pub fn fire(&self, params: serde_json::Value, now: f64) -> Option<Admission> {
        let Some(definition) = self.set.resolve(&self.id) else {
            warn!(
                trigger = %self.id,
                set = %self.set.name(),
                "trigger fired but resolves to nothing, dropping"
            );
            return None;
        };
        let admission = self.buffer.borrow_mut().register(PendingRequest {
            definition: definition.clone(),
            params,
            expires_at: now + self.buffer_life,
        });
        debug!(
            trigger = %self.id,
            kind = %definition.kind(),
            ?admission,
            "trigger fired"
        );
        Some(admission)
    }

    /// Poll the injected event source and fire (with a null payload) if
    /// the condition is active.
    pub fn sample(&self, source: &dyn InputSource, now: f64) -> Option<Admission> {
        if source.is_active(&self.id) {
            self.fire(serde_json::Value::Null, now)
        } else {
            None
        }
    }
}
