//! Port traits: the hexagonal boundary between the motion core and the
//! planner, endstops, stepper drivers, clock and storage.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ HomingSequencer / MotionService (domain)
//! ```
//!
//! The domain consumes these through generics, so the homing and
//! kinematics logic never touches hardware directly and runs unchanged
//! against the mock machine in the integration tests.

use crate::config::MachineConfig;
use crate::error::ConfigError;
use crate::motion::{Axis, CartesianPose, JointAxis, JointPose};

// ───────────────────────────────────────────────────────────────
// Motion planner port
// ───────────────────────────────────────────────────────────────

/// Queue-side view of the motion planner.
pub trait MotionPort {
    /// Block until every queued move has executed.
    fn synchronize(&mut self);

    /// Queue a straight Cartesian move at `feed_mm_s`.
    fn enqueue_linear_move(&mut self, target: &CartesianPose, feed_mm_s: f32);

    /// Queue a move expressed directly in actuator space (degrees for the
    /// arm joints).  Returns immediately; poll the endstops or call
    /// [`synchronize`](Self::synchronize) to wait for it.
    fn enqueue_joint_move(&mut self, target: &JointPose, feed_deg_s: f32);

    /// Abort every queued and executing move.  The actuators stay wherever
    /// motion stopped.
    fn quick_stop(&mut self);

    /// Redefine the planner's logical position without moving.
    fn set_position(&mut self, pose: &CartesianPose);

    /// Redefine the actuator positions without moving.
    fn set_joint_position(&mut self, joints: &JointPose);

    /// Current actuator position as tracked by the stepper layer.
    fn joint_position(&self, joint: JointAxis) -> f32;

    /// Feedrate override in percent (100 = unscaled).
    fn feedrate_percent(&self) -> u16;

    fn set_feedrate_percent(&mut self, percent: u16);
}

// ───────────────────────────────────────────────────────────────
// Endstop port
// ───────────────────────────────────────────────────────────────

/// Homing-mode view of the endstop layer.
pub trait EndstopPort {
    /// Enable (or disable) move-aborting on endstop hits.
    fn arm(&mut self, enabled: bool);

    /// Sample the switches.  Returns `true` once any armed endstop has hit
    /// since the last validation; the hit latches.
    fn check_triggered(&mut self) -> bool;

    /// After a homing move toward `axis`'s endstop: did it trigger?
    /// Clears the latch either way.
    fn validate_homing_move(&mut self, axis: Axis) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Stepper driver port
// ───────────────────────────────────────────────────────────────

/// Programmable motor current, used for sensorless-homing overrides.
pub trait CurrentPort {
    fn current_ma(&self, axis: Axis) -> u16;

    fn set_current_ma(&mut self, axis: Axis, milliamps: u16);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time plus a cooperative yield for polling loops.
pub trait ClockPort {
    /// Milliseconds since an arbitrary fixed epoch.
    fn now_ms(&self) -> u64;

    /// Give other work a chance to run between polls.
    fn idle(&mut self);
}

/// Everything the homing sequencer drives.
pub trait MachinePort: MotionPort + EndstopPort + CurrentPort + ClockPort {}

impl<T: MotionPort + EndstopPort + CurrentPort + ClockPort> MachinePort for T {}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / display)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`MotionEvent`](super::events::MotionEvent)s
/// through this port.  Display refresh and position reports are events too;
/// adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::MotionEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the machine profile.
///
/// Implementations MUST validate before persisting and reject invalid
/// ranges with [`ConfigError::ValidationFailed`] rather than clamping.
pub trait ConfigPort {
    /// Load the stored profile, or [`MachineConfig::default()`] on first
    /// boot.
    fn load(&self) -> Result<MachineConfig, ConfigError>;

    /// Validate and persist.
    fn save(&mut self, config: &MachineConfig) -> Result<(), ConfigError>;
}
