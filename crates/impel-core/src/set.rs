//! The action set: the frozen registry mapping trigger identities to
//! action definitions.
//!
//! A set is built once per agent archetype with the fluent
//! [`ActionSetBuilder`] -- name the set, define each action type, attach
//! one or more trigger identities to it, then freeze. Build defects
//! (invalid configs, a `trigger` call before any `define`) fail fast at
//! `freeze`; duplicate trigger bindings are non-fatal, last write wins.

use std::collections::{BTreeMap, BTreeSet};

use impel_types::{ActionConfig, ActionKind, TriggerId};
use tracing::{debug, warn};

use crate::config::ActionSpec;
use crate::definition::{ActionDefinition, ActionFactory, DefinitionError, StartPredicate};

/// Errors raised while building an action set.
#[derive(Debug, thiserror::Error)]
pub enum ActionSetError {
    /// A registered definition failed validation.
    #[error("invalid definition in set '{set}': {source}")]
    InvalidDefinition {
        /// The set being built.
        set: String,
        /// The underlying definition error.
        source: DefinitionError,
    },

    /// `trigger` was called before any `define`.
    #[error("set '{set}': trigger '{trigger}' bound before any action was defined")]
    TriggerBeforeDefine {
        /// The set being built.
        set: String,
        /// The dangling trigger identity.
        trigger: TriggerId,
    },
}

/// Immutable registry of all definitions and trigger bindings for one
/// agent archetype.
#[derive(Debug, Clone)]
pub struct ActionSet {
    name: String,
    bindings: BTreeMap<TriggerId, ActionDefinition>,
}

impl ActionSet {
    /// The set's name (used in logs).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up the definition bound to a trigger identity.
    pub fn resolve(&self, trigger: &TriggerId) -> Option<&ActionDefinition> {
        self.bindings.get(trigger)
    }

    /// Enumerate every trigger identity this set recognizes.
    ///
    /// Consumed by the external trigger-lifecycle manager, which
    /// instantiates one detector per identity.
    pub fn trigger_ids(&self) -> BTreeSet<TriggerId> {
        self.bindings.keys().cloned().collect()
    }

    /// Number of trigger bindings in the set.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the set has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Fluent builder for [`ActionSet`].
///
/// `trigger` attaches to the most recently defined action. Defects are
/// remembered and surfaced by [`freeze`](ActionSetBuilder::freeze) so the
/// chain stays fluent.
#[derive(Debug)]
pub struct ActionSetBuilder {
    name: String,
    current: Option<ActionDefinition>,
    bindings: BTreeMap<TriggerId, ActionDefinition>,
    defect: Option<ActionSetError>,
}

impl ActionSetBuilder {
    /// Start building a named set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current: None,
            bindings: BTreeMap::new(),
            defect: None,
        }
    }

    /// Define an action type: its kind tag, config, start predicate, and
    /// factory. Subsequent [`trigger`](Self::trigger) calls bind to it.
    #[must_use]
    pub fn define(
        mut self,
        kind: impl Into<ActionKind>,
        config: ActionConfig,
        start_predicate: StartPredicate,
        factory: ActionFactory,
    ) -> Self {
        match ActionDefinition::new(kind.into(), config, start_predicate, factory) {
            Ok(definition) => {
                debug!(set = %self.name, kind = %definition.kind(), "defined action");
                self.current = Some(definition);
            }
            Err(source) => {
                self.current = None;
                if self.defect.is_none() {
                    self.defect = Some(ActionSetError::InvalidDefinition {
                        set: self.name.clone(),
                        source,
                    });
                }
            }
        }
        self
    }

    /// Define an action type from a parsed [`ActionSpec`], binding all the
    /// spec's declared triggers in one step. The host supplies the
    /// predicate and factory; everything else comes from the profile.
    #[must_use]
    pub fn define_spec(
        self,
        spec: &ActionSpec,
        start_predicate: StartPredicate,
        factory: ActionFactory,
    ) -> Self {
        let triggers = spec.triggers.clone();
        let mut builder = self.define(
            spec.kind.as_str(),
            spec.to_config(),
            start_predicate,
            factory,
        );
        for trigger in triggers {
            builder = builder.trigger(trigger);
        }
        builder
    }

    /// Bind a trigger identity to the most recently defined action.
    ///
    /// Rebinding an identity already in the set is non-fatal: the new
    /// binding wins and a warning is logged.
    #[must_use]
    pub fn trigger(mut self, trigger: impl Into<TriggerId>) -> Self {
        let trigger = trigger.into();
        match &self.current {
            Some(definition) => {
                if let Some(previous) = self
                    .bindings
                    .insert(trigger.clone(), definition.clone())
                {
                    warn!(
                        set = %self.name,
                        trigger = %trigger,
                        previous = %previous.kind(),
                        now = %definition.kind(),
                        "duplicate trigger registration, last write wins"
                    );
                }
            }
            None => {
                if self.defect.is_none() {
                    self.defect = Some(ActionSetError::TriggerBeforeDefine {
                        set: self.name.clone(),
                        trigger,
                    });
                }
            }
        }
        self
    }

    /// Freeze the builder into an immutable set.
    ///
    /// # Errors
    ///
    /// Returns the first defect accumulated during building. Configuration
    /// defects abort here, at build time, never at runtime.
    pub fn freeze(self) -> Result<ActionSet, ActionSetError> {
        if let Some(defect) = self.defect {
            return Err(defect);
        }
        Ok(ActionSet {
            name: self.name,
            bindings: self.bindings,
        })
    }
}
