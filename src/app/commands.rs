//! Inbound commands to the motion service.
//!
//! The G-code dispatcher translates `G28`, `M360`-style jogs and plain
//! moves into these and hands them to
//! [`MotionService::handle_command`](super::service::MotionService::handle_command).

use crate::motion::{AxisSet, CartesianPose};

/// Parameters of one homing request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HomeCommand {
    /// Axes named by the caller.  None named means all.
    pub axes: AxisSet,
    /// Pre-raise override (mm) used when Z is already known.
    pub raise_mm: Option<f32>,
    /// Return immediately when every axis is already known.
    pub only_if_unknown: bool,
    /// Mark every axis homed without moving.
    pub simulate: bool,
}

impl HomeCommand {
    /// Home every axis with the configured defaults.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn axes(axes: AxisSet) -> Self {
        Self {
            axes,
            ..Self::default()
        }
    }
}

/// Commands that the dispatcher can send into the motion core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionCommand {
    Home(HomeCommand),

    /// Emit the current actuator angles.
    ReportJointPositions,

    /// Emit the current logical position.
    ReportPosition,

    /// Rotate the arm joints by the given deltas (degrees).
    JogJoints { d_theta: f32, d_psi: f32, feed_deg_s: f32 },

    /// Straight move to a Cartesian target.
    MoveTo { target: CartesianPose, feed_mm_s: f32 },
}
