//! The per-agent action runner: arbitration and lifecycle driving.
//!
//! Each simulation tick the runner, in order:
//!
//! 1. Purges expired entries from the trigger buffer.
//! 2. Inspects the buffer head (the pending request, if any).
//! 3. Attempts consumption: refresh a matching continuous action, or run
//!    the replacement path (authority gate, phase-policy gate, start
//!    predicate) and kill-then-start on acceptance. A refused request
//!    stays buffered and is retried next tick until accepted or expired.
//! 4. Polls the current instance's continuation predicate. A false result
//!    finishes the action (kill hook, slot cleared).
//!
//! The poll runs after arbitration, so an instance started this tick is
//! never polled the same tick, while a refreshed instance's update is
//! visible to this same tick's poll.
//!
//! Every comparison is a pure function of static config plus the running
//! instance's phase index -- no randomness, no hidden clock; the host
//! supplies `now`.

use std::cell::RefCell;
use std::rc::Rc;

use impel_types::{ActionKind, AgentId, InstanceId, InterruptAuthority, PhaseInterruptPolicy};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::buffer::{PendingRequest, TriggerBuffer};
use crate::context::ActionContext;
use crate::definition::{ActionDefinition, DefinitionError};

/// Errors that can occur during a runner tick.
///
/// Policy outcomes (refusal, expiry, overflow) are ordinary control flow
/// and never appear here; only genuine programmer errors do.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A definition's factory rejected the request payload.
    #[error("constructing action '{kind}' for agent {agent_id}: {source}")]
    Construction {
        /// The agent whose runner hit the defect.
        agent_id: AgentId,
        /// The action kind being constructed.
        kind: ActionKind,
        /// The underlying definition error.
        source: DefinitionError,
    },
}

/// Per-runner settings, usually parsed from an agent profile.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RunnerConfig {
    /// Fixed trigger-buffer capacity (0 is legal: always drop).
    pub buffer_capacity: usize,
    /// Lifetime in game seconds granted to every buffered request.
    pub buffer_life: f64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 4,
            buffer_life: 0.35,
        }
    }
}

/// Why the head request was left buffered this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefusalReason {
    /// The incoming definition carries [`InterruptAuthority::Never`] and
    /// something is running.
    AuthorityNever,
    /// The running action's current phase denied the interruption.
    PhaseDenied,
    /// The incoming definition's start predicate returned false.
    NotEligible,
}

/// What arbitration did with the buffer head this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArbitrationOutcome {
    /// No pending request existed.
    Idle,
    /// The head was consumed by the running instance's update hook.
    Refreshed {
        /// The refreshed action's kind.
        kind: ActionKind,
    },
    /// The head was consumed and a new instance was started.
    Started {
        /// The started action's kind.
        kind: ActionKind,
        /// The new instance's identity.
        instance_id: InstanceId,
        /// The kind of the instance killed to make room, if any.
        preempted: Option<ActionKind>,
    },
    /// The head stays buffered; it is retried next tick.
    Deferred {
        /// The deferred action's kind.
        kind: ActionKind,
        /// Why consumption was refused.
        reason: RefusalReason,
    },
}

/// Summary of a single runner tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// The `now` this tick ran at.
    pub tick_at: f64,
    /// Requests purged from the buffer as expired.
    pub expired: usize,
    /// What arbitration did with the buffer head.
    pub outcome: ArbitrationOutcome,
    /// Whether the current action finished (false continuation) this tick.
    pub finished: bool,
}

/// The currently running action with its identity and definition.
struct RunningAction {
    instance_id: InstanceId,
    definition: ActionDefinition,
    instance: Box<dyn Action>,
    started_at: f64,
}

/// Per-agent scheduler owning the trigger buffer and the running action.
pub struct ActionRunner {
    agent_id: AgentId,
    context: ActionContext,
    buffer: Rc<RefCell<TriggerBuffer>>,
    buffer_life: f64,
    current: Option<RunningAction>,
    last_tick_at: Option<f64>,
    explicit_only_warned: bool,
}

impl ActionRunner {
    /// Create a runner for one agent.
    pub fn new(agent_id: AgentId, context: ActionContext, config: RunnerConfig) -> Self {
        Self {
            agent_id,
            context,
            buffer: Rc::new(RefCell::new(TriggerBuffer::new(config.buffer_capacity))),
            buffer_life: config.buffer_life.max(0.0),
            current: None,
            last_tick_at: None,
            explicit_only_warned: false,
        }
    }

    /// The agent this runner arbitrates for.
    pub const fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    /// Shared handle to the trigger buffer, for wiring up detectors.
    pub fn buffer(&self) -> Rc<RefCell<TriggerBuffer>> {
        Rc::clone(&self.buffer)
    }

    /// Lifetime granted to every buffered request, in game seconds.
    pub const fn buffer_life(&self) -> f64 {
        self.buffer_life
    }

    /// The agent context shared with triggers and actions.
    pub const fn context(&self) -> &ActionContext {
        &self.context
    }

    /// Kind of the currently running action, if any.
    pub fn current_kind(&self) -> Option<&ActionKind> {
        self.current.as_ref().map(|r| r.definition.kind())
    }

    /// Identity of the currently running instance, if any.
    ///
    /// Stable across refreshes; changes on every kill-and-restart.
    pub fn current_instance_id(&self) -> Option<InstanceId> {
        self.current.as_ref().map(|r| r.instance_id)
    }

    /// Game time at which the current instance was started, if any.
    pub fn current_started_at(&self) -> Option<f64> {
        self.current.as_ref().map(|r| r.started_at)
    }

    /// Whether no action is currently running.
    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    /// Run one arbitration-and-poll pass at game time `now`.
    ///
    /// Refresh precedence: when the head request matches the running
    /// continuous action's kind, the refresh path wins unconditionally --
    /// even if the phase policy would also have allowed a restart. This
    /// mirrors the original design and is the policy knob a future author
    /// is most likely to revisit.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Construction`] if a consumed request's
    /// factory fails. By then the previous instance is already killed and
    /// the request dequeued (step 3c ordering), leaving the runner idle.
    pub fn tick(&mut self, now: f64) -> Result<TickReport, RunnerError> {
        let dt = self
            .last_tick_at
            .map_or(0.0, |last| (now - last).max(0.0));
        self.last_tick_at = Some(now);

        // Step 1: purge expired requests before anything can consume them.
        let expired = self.buffer.borrow_mut().tick(now);

        // Steps 2-3: inspect the head and attempt consumption.
        let outcome = self.arbitrate(now)?;
        let started_this_tick = matches!(outcome, ArbitrationOutcome::Started { .. });

        // Step 4: continuation poll. Skipped only for an instance started
        // this very tick; a refreshed instance is polled as usual.
        let mut finished = false;
        if !started_this_tick
            && let Some(running) = self.current.as_mut()
        {
            if running.instance.on_run(&self.context, dt) {
                // Still running.
            } else {
                running.instance.on_kill(&self.context);
                info!(
                    agent = %self.agent_id,
                    kind = %running.definition.kind(),
                    instance = %running.instance_id,
                    "action finished"
                );
                finished = true;
            }
        }
        if finished {
            self.current = None;
        }

        Ok(TickReport {
            tick_at: now,
            expired,
            outcome,
            finished,
        })
    }

    /// Steps 2-3 of the tick: decide what to do with the buffer head.
    fn arbitrate(&mut self, now: f64) -> Result<ArbitrationOutcome, RunnerError> {
        let Some((kind, refresh)) = self.classify_head() else {
            return Ok(ArbitrationOutcome::Idle);
        };

        if refresh {
            let Some(request) = self.buffer.borrow_mut().accept() else {
                return Ok(ArbitrationOutcome::Idle);
            };
            if let Some(running) = self.current.as_mut() {
                running.instance.on_update(&self.context, &request.params);
                debug!(agent = %self.agent_id, kind = %kind, "refreshed running action");
            }
            return Ok(ArbitrationOutcome::Refreshed { kind });
        }

        if let Some(reason) = self.replacement_refusal() {
            debug!(agent = %self.agent_id, kind = %kind, ?reason, "request deferred");
            return Ok(ArbitrationOutcome::Deferred { kind, reason });
        }

        // Eligible: kill current, dequeue, construct, start.
        let preempted = self.current.take().map(|mut running| {
            running.instance.on_kill(&self.context);
            info!(
                agent = %self.agent_id,
                killed = %running.definition.kind(),
                instance = %running.instance_id,
                incoming = %kind,
                "action preempted"
            );
            running.definition.kind().clone()
        });

        let Some(request) = self.buffer.borrow_mut().accept() else {
            return Ok(ArbitrationOutcome::Idle);
        };

        let mut instance = request
            .definition
            .create(&self.context, &request.params)
            .map_err(|source| RunnerError::Construction {
                agent_id: self.agent_id,
                kind: kind.clone(),
                source,
            })?;
        instance.on_start(&self.context);

        let instance_id = InstanceId::new();
        info!(
            agent = %self.agent_id,
            kind = %kind,
            instance = %instance_id,
            "action started"
        );
        self.current = Some(RunningAction {
            instance_id,
            definition: request.definition,
            instance,
            started_at: now,
        });

        Ok(ArbitrationOutcome::Started {
            kind,
            instance_id,
            preempted,
        })
    }

    /// Inspect the buffer head: its kind, and whether the refresh path
    /// applies (running action of the same kind, continuous mode).
    fn classify_head(&self) -> Option<(ActionKind, bool)> {
        let buffer = self.buffer.borrow();
        let head = buffer.peek()?;
        let kind = head.definition.kind().clone();
        let refresh = self.current.as_ref().is_some_and(|running| {
            running.definition.kind() == &kind
                && head.definition.config().mode == impel_types::ActionMode::Continuous
        });
        Some((kind, refresh))
    }

    /// Evaluate the replacement path against the buffer head. Returns the
    /// refusal reason, or `None` when the request is eligible to start.
    fn replacement_refusal(&mut self) -> Option<RefusalReason> {
        let (authority, incoming_priority) = {
            let buffer = self.buffer.borrow();
            let config = buffer.peek()?.definition.config();
            (config.authority, config.priority)
        };

        // The interrupt query: dispatched on the running instance's
        // current phase policy, against the incoming priority.
        let phase_gate = self.current.as_ref().map(|running| {
            let config = running.definition.config();
            (
                config.phase_policy(running.instance.phase_index()),
                config.priority,
            )
        });

        if let Some((policy, running_priority)) = phase_gate {
            match authority {
                InterruptAuthority::Never => return Some(RefusalReason::AuthorityNever),
                InterruptAuthority::Force => {
                    // Skip the phase check entirely.
                }
                InterruptAuthority::IfAllowed => {
                    if policy == PhaseInterruptPolicy::ExplicitOnly && !self.explicit_only_warned {
                        warn!(
                            agent = %self.agent_id,
                            "explicit_only phase policy consulted; semantics are a placeholder \
                             (treated as unconditional allow)"
                        );
                        self.explicit_only_warned = true;
                    }
                    if !phase_allows_interrupt(policy, running_priority, incoming_priority) {
                        return Some(RefusalReason::PhaseDenied);
                    }
                }
            }
        }

        let eligible = self
            .buffer
            .borrow()
            .peek()
            .is_some_and(|head| head.definition.can_start(&self.context));
        if eligible {
            None
        } else {
            Some(RefusalReason::NotEligible)
        }
    }

    /// Register a request directly, bypassing trigger detectors. The
    /// request expires `buffer_life` seconds after `now`.
    ///
    /// Hosts that drive requests from their own input layer use this;
    /// games with condition detectors use [`ActionTrigger`] instead.
    ///
    /// [`ActionTrigger`]: crate::trigger::ActionTrigger
    pub fn request(
        &self,
        definition: &ActionDefinition,
        params: serde_json::Value,
        now: f64,
    ) -> crate::buffer::Admission {
        self.buffer.borrow_mut().register(PendingRequest {
            definition: definition.clone(),
            params,
            expires_at: now + self.buffer_life,
        })
    }
}

impl core::fmt::Debug for ActionRunner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ActionRunner")
            .field("agent_id", &self.agent_id)
            .field("current_kind", &self.current_kind())
            .field("buffer_life", &self.buffer_life)
            .finish_non_exhaustive()
    }
}

/// Pure phase-policy evaluation: may the running action's current phase be
/// interrupted by an incoming action of the given priority?
///
/// `HigherPriority` requires the running priority to be strictly less than
/// the incoming one -- equal priority never authorizes interruption.
/// `ExplicitOnly` is a placeholder treated as an unconditional allow.
pub const fn phase_allows_interrupt(
    policy: PhaseInterruptPolicy,
    running_priority: i32,
    incoming_priority: i32,
) -> bool {
    match policy {
        PhaseInterruptPolicy::None => false,
        PhaseInterruptPolicy::Any | PhaseInterruptPolicy::ExplicitOnly => true,
        PhaseInterruptPolicy::HigherPriority => running_priority < incoming_priority,
    }
}
