//! The single owner of mutable machine position state.
//!
//! `MotionState` replaces the ambient `current_position` / `axis_known`
//! globals of classic printer firmware.  Whoever holds `&mut MotionState`
//! is the only writer of logical position and "known" flags; during a
//! homing pass that is the sequencer.

use super::{Axis, AxisFlags, CartesianPose, JointPose};

#[derive(Debug, Clone, Default)]
pub struct MotionState {
    /// Logical tool position.
    pub current: CartesianPose,
    /// Last joint-space position handed to (or set on) the planner.
    pub joints: JointPose,
    known: AxisFlags,
}

impl MotionState {
    /// Fresh state after power-on: origin, nothing known.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_known(&self, axis: Axis) -> bool {
        self.known.contains(axis)
    }

    pub fn known(&self) -> AxisFlags {
        self.known
    }

    pub fn set_known(&mut self, axis: Axis, known: bool) {
        if known {
            self.known.insert(axis);
        } else {
            self.known.remove(axis);
        }
    }

    /// True when any linear axis still needs homing.
    pub fn homing_needed(&self) -> bool {
        !self.known.is_all()
    }

    /// Mark every axis unknown (e.g. after steppers are disabled).
    pub fn forget_all(&mut self) {
        self.known = AxisFlags::NONE;
    }
}
