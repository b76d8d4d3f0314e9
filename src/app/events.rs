//! Outbound motion events.
//!
//! The sequencer and [`MotionService`](super::service::MotionService) emit
//! these through the [`EventSink`](super::ports::EventSink) port.  The log
//! adapter prints them; a display adapter would redraw on
//! [`MotionEvent::DisplayRefresh`].

use crate::error::HomingError;
use crate::motion::{Axis, AxisFlags, CartesianPose, JointPose};

/// Structured events emitted by the motion core.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionEvent {
    /// A homing pass began; carries the effective axis set.
    HomingStarted(AxisFlags),

    /// `only_if_unknown` was set and every axis was already known.
    HomingSkipped,

    /// A driver current was overridden for the pass.
    CurrentOverride { axis: Axis, from_ma: u16, to_ma: u16 },

    /// Z was lifted before horizontal homing.
    ZRaised { to_mm: f32 },

    /// One axis completed its homing move(s) and is at its home position.
    AxisHomed { axis: Axis, position_mm: f32 },

    /// The combined XY quick-home finished.
    QuickHomeComplete,

    /// The pass completed; carries the axes homed in it.
    HomingFinished(AxisFlags),

    /// The pass stopped on a fault.  Cleanup has already run.
    HomingAborted(HomingError),

    /// Current logical position, for host reporting.
    PositionReport(CartesianPose),

    /// Current actuator angles.
    JointReport(JointPose),

    /// Observers should redraw.
    DisplayRefresh,
}
