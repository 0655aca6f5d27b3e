//! Collaborator capabilities and the per-agent action context.
//!
//! The arbitration engine never integrates physics, reads input devices,
//! or plays animations itself. Actions reach those systems only through
//! the capability traits here, bundled into one [`ActionContext`] that is
//! built once per agent and shared by every action that agent ever runs.
//!
//! The engine is single-threaded and cooperative: at most one action runs
//! per agent, so whichever action is current is the sole writer of the
//! agent's capabilities during its tick. Handles are `Rc` for that reason;
//! implementations that need mutability use interior mutability.

use std::rc::Rc;

/// Horizontal/vertical movement control for the agent's character.
///
/// An action that takes over locomotion (a dash, a knockback) suppresses
/// regular movement on start and must restore it on kill.
pub trait MovementControl {
    /// Scale the agent's base movement speed (1.0 = unmodified).
    fn set_speed_scale(&self, scale: f64);

    /// Suppress or restore regular movement input entirely.
    fn set_suppressed(&self, suppressed: bool);

    /// Whether regular movement is currently suppressed.
    fn is_suppressed(&self) -> bool;
}

/// Velocity, impulse and gravity control over the agent's body.
pub trait BodyControl {
    /// Overwrite the body's velocity (x, y, z), in metres per second.
    fn set_velocity(&self, velocity: [f64; 3]);

    /// Apply an instantaneous impulse (x, y, z).
    fn apply_impulse(&self, impulse: [f64; 3]);

    /// Enable or disable gravity on the body.
    fn set_gravity_enabled(&self, enabled: bool);
}

/// Ground contact queries.
pub trait GroundSensor {
    /// Whether the agent is currently standing on ground.
    fn is_grounded(&self) -> bool;

    /// Seconds since the agent last touched ground (0.0 while grounded).
    fn air_time(&self) -> f64;
}

/// Read-only bundle of collaborator capability handles for one agent.
///
/// Constructed once when the agent is set up, then shared with the runner,
/// every start predicate, and every action instance. The bundle itself is
/// immutable; the capabilities behind the handles are mutated by whichever
/// action currently runs.
#[derive(Clone)]
pub struct ActionContext {
    /// Movement suppression and speed scaling.
    pub movement: Rc<dyn MovementControl>,
    /// Velocity, impulse and gravity control.
    pub body: Rc<dyn BodyControl>,
    /// Grounded / air-time queries.
    pub ground: Rc<dyn GroundSensor>,
}

impl ActionContext {
    /// Bundle the three capability handles into a context.
    pub fn new(
        movement: Rc<dyn MovementControl>,
        body: Rc<dyn BodyControl>,
        ground: Rc<dyn GroundSensor>,
    ) -> Self {
        Self {
            movement,
            body,
            ground,
        }
    }
}

impl core::fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ActionContext").finish_non_exhaustive()
    }
}
