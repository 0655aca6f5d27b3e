//! Action definitions: the tagged registry entry binding a kind to its
//! config, start predicate, and factory.
//!
//! A definition is built once at registration time and cloned cheaply
//! (`Arc`/`Rc` internals) into every request that names it. The factory is
//! an explicit closure `(config, context, params) -> action` -- no runtime
//! reflection; a payload that does not decode into what the factory
//! expects is a programmer error surfaced immediately.

use std::rc::Rc;
use std::sync::Arc;

use impel_types::{ActionConfig, ActionKind, ConfigDefect};
use serde::de::DeserializeOwned;

use crate::action::Action;
use crate::context::ActionContext;

/// Errors raised while building or instantiating a definition.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    /// The action config failed validation at registration time.
    #[error("invalid config for action '{kind}': {source}")]
    InvalidConfig {
        /// The offending action kind.
        kind: ActionKind,
        /// The underlying config defect.
        source: ConfigDefect,
    },

    /// The request payload does not match what the factory expects.
    #[error("payload mismatch constructing action '{kind}': {source}")]
    PayloadMismatch {
        /// The action kind whose factory rejected the payload.
        kind: ActionKind,
        /// The underlying decode error.
        source: serde_json::Error,
    },
}

/// Start-eligibility predicate: a pure function of context plus static
/// config, callable before any instance exists.
pub type StartPredicate = Rc<dyn Fn(&ActionContext) -> bool>;

/// Factory constructing the bound action type from its shared config, the
/// agent context, and the request's action-specific payload.
pub type ActionFactory = Rc<
    dyn Fn(
        &Arc<ActionConfig>,
        &ActionContext,
        &serde_json::Value,
    ) -> Result<Box<dyn Action>, DefinitionError>,
>;

/// Immutable binding of an action kind to its static configuration,
/// start predicate, and factory.
#[derive(Clone)]
pub struct ActionDefinition {
    kind: ActionKind,
    config: Arc<ActionConfig>,
    start_predicate: StartPredicate,
    factory: ActionFactory,
}

impl ActionDefinition {
    /// Build a definition, validating the config.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::InvalidConfig`] if the config fails
    /// construction-time validation. This aborts action-set building --
    /// a malformed config never reaches the runner.
    pub fn new(
        kind: ActionKind,
        config: ActionConfig,
        start_predicate: StartPredicate,
        factory: ActionFactory,
    ) -> Result<Self, DefinitionError> {
        if let Err(source) = config.validate() {
            return Err(DefinitionError::InvalidConfig { kind, source });
        }
        Ok(Self {
            kind,
            config: Arc::new(config),
            start_predicate,
            factory,
        })
    }

    /// The kind tag this definition registers under.
    pub const fn kind(&self) -> &ActionKind {
        &self.kind
    }

    /// The shared static configuration.
    pub const fn config(&self) -> &Arc<ActionConfig> {
        &self.config
    }

    /// Evaluate start eligibility against the agent context.
    pub fn can_start(&self, context: &ActionContext) -> bool {
        (self.start_predicate)(context)
    }

    /// Construct a new instance of the bound action type.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::PayloadMismatch`] (or whatever the
    /// factory raises) if the payload does not fit the action type.
    pub fn create(
        &self,
        context: &ActionContext,
        params: &serde_json::Value,
    ) -> Result<Box<dyn Action>, DefinitionError> {
        (self.factory)(&self.config, context, params)
    }

    /// Sum of the configured phase durations, in game seconds.
    pub fn total_duration(&self) -> f64 {
        self.config.total_duration()
    }
}

impl core::fmt::Debug for ActionDefinition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ActionDefinition")
            .field("kind", &self.kind)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Decode an action payload into the factory's parameter type, mapping
/// decode failures to the fail-fast [`DefinitionError::PayloadMismatch`].
///
/// Factories call this as their first line:
///
/// ```ignore
/// let params: DashParams = decode_params(&kind, params)?;
/// ```
pub fn decode_params<T: DeserializeOwned>(
    kind: &ActionKind,
    params: &serde_json::Value,
) -> Result<T, DefinitionError> {
    serde_json::from_value(params.clone()).map_err(|source| DefinitionError::PayloadMismatch {
        kind: kind.clone(),
        source,
    })
}
