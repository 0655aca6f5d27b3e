//! The action lifecycle trait and the phase run-state helper.
//!
//! A concrete action moves through Constructed -> Started -> Running ->
//! Killed. Killed is terminal: a killed instance is discarded and a new
//! one is built to run the behavior again. The [`ActionRunner`] drives the
//! hooks; implementations only honor the contracts documented on each one.
//!
//! [`ActionRunner`]: crate::runner::ActionRunner

use impel_types::ActionConfig;

use crate::context::ActionContext;

/// A runtime behavior instance with a bounded start -> run -> kill
/// lifecycle.
///
/// Implementations hold their own mutable run state (typically a
/// [`PhaseTracker`]) and reach collaborator systems only through the
/// provided [`ActionContext`].
pub trait Action {
    /// One-time setup, invoked exactly once when the runner starts the
    /// instance. May mutate shared context state (e.g. suppress regular
    /// movement); every such side effect must be undone in
    /// [`on_kill`](Action::on_kill).
    fn on_start(&mut self, context: &ActionContext);

    /// Mid-flight refresh with fresh request params, invoked only via the
    /// runner's refresh path (same kind, continuous mode). The default is
    /// a no-op, which is correct for purely discrete actions.
    fn on_update(&mut self, context: &ActionContext, params: &serde_json::Value) {
        let _ = (context, params);
    }

    /// Continuation poll, invoked every tick after arbitration. Returns
    /// true to keep running, false when finished. This is where the
    /// instance advances its phase index and elapsed time; that mutation
    /// governs what [`phase_index`](Action::phase_index) answers on the
    /// next tick's arbitration.
    fn on_run(&mut self, context: &ActionContext, dt: f64) -> bool;

    /// Teardown, invoked exactly once -- from natural completion (a false
    /// continuation result) or from forced preemption. Must release every
    /// side effect from start/run.
    fn on_kill(&mut self, context: &ActionContext);

    /// The index of the phase the instance is currently in, answering the
    /// runner's interrupt query. Defaults to 0 for single-phase actions.
    fn phase_index(&self) -> usize {
        0
    }
}

/// Phase run state owned by a running instance: current phase index,
/// elapsed time within the phase, and total elapsed time.
///
/// The tracker advances strictly through the declared phase list and never
/// reports an index outside it, so the runner's interrupt query cannot be
/// handed an out-of-range phase by a well-behaved action. Zero-duration
/// phases are skipped over the instant they are reached.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTracker {
    durations: Vec<f64>,
    index: usize,
    phase_elapsed: f64,
    total_elapsed: f64,
}

impl PhaseTracker {
    /// Create a tracker over the config's declared phases, positioned at
    /// the start of the first phase.
    pub fn new(config: &ActionConfig) -> Self {
        Self {
            durations: config.phases.iter().map(|p| p.duration).collect(),
            index: 0,
            phase_elapsed: 0.0,
            total_elapsed: 0.0,
        }
    }

    /// Advance by `dt` game seconds, rolling into later phases as their
    /// durations elapse. Returns true while the action still has phase
    /// time left, false once the final phase has fully elapsed.
    pub fn advance(&mut self, dt: f64) -> bool {
        let dt = dt.max(0.0);
        self.total_elapsed += dt;
        self.phase_elapsed += dt;

        while let Some(&duration) = self.durations.get(self.index) {
            if self.phase_elapsed < duration {
                return true;
            }
            if self.index + 1 >= self.durations.len() {
                // Final phase exhausted; stay clamped on it.
                return false;
            }
            self.phase_elapsed -= duration;
            self.index += 1;
        }
        false
    }

    /// Index of the current phase. Never exceeds the declared range.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Seconds elapsed within the current phase.
    pub const fn phase_elapsed(&self) -> f64 {
        self.phase_elapsed
    }

    /// Seconds elapsed since the tracker was created.
    pub const fn total_elapsed(&self) -> f64 {
        self.total_elapsed
    }

    /// Restart the current phase's elapsed time, without changing the
    /// phase index. Used by refreshable actions that extend their active
    /// phase when new data arrives.
    pub const fn restart_phase(&mut self) {
        self.phase_elapsed = 0.0;
    }
}
