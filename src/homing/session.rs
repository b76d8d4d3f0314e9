//! Transient state for one homing pass.
//!
//! The session records every current override it applies and the feedrate
//! scaling it replaced.  [`HomingSession::finish`] drains both, so calling
//! it on every exit path restores each saved value exactly once.

use heapless::Vec;
use log::debug;

use crate::app::events::MotionEvent;
use crate::app::ports::{EventSink, MachinePort};
use crate::config::MachineConfig;
use crate::motion::{Axis, AxisFlags, CartesianPose};

/// Feedrate percentage forced for the duration of a pass.
const HOMING_FEEDRATE_PERCENT: u16 = 100;

#[derive(Debug, Default)]
pub struct HomingSession {
    saved_currents: Vec<(Axis, u16), { Axis::COUNT }>,
    saved_feedrate_percent: Option<u16>,
    armed: bool,
    homed: AxisFlags,
    /// Scratch target for the pass's pre-moves.
    pub destination: CartesianPose,
}

impl HomingSession {
    /// Apply homing currents for `axes`, force unscaled feedrate and arm
    /// the endstops.
    pub fn begin<H, S>(cfg: &MachineConfig, axes: AxisFlags, hw: &mut H, sink: &mut S) -> Self
    where
        H: MachinePort + ?Sized,
        S: EventSink + ?Sized,
    {
        let mut session = Self::default();

        for axis in Axis::ALL {
            if !axes.contains(axis) {
                continue;
            }
            let Some(to_ma) = cfg.axis(axis).homing_current_ma else {
                continue;
            };
            let from_ma = hw.current_ma(axis);
            if from_ma == to_ma {
                continue;
            }
            // Capacity equals the axis count and each axis is visited once.
            let _ = session.saved_currents.push((axis, from_ma));
            hw.set_current_ma(axis, to_ma);
            debug!("{axis} current: {from_ma} -> {to_ma}");
            sink.emit(&MotionEvent::CurrentOverride {
                axis,
                from_ma,
                to_ma,
            });
        }

        session.saved_feedrate_percent = Some(hw.feedrate_percent());
        hw.set_feedrate_percent(HOMING_FEEDRATE_PERCENT);

        hw.arm(true);
        session.armed = true;
        session
    }

    pub fn mark_homed(&mut self, axis: Axis) {
        self.homed.insert(axis);
    }

    pub fn homed(&self) -> AxisFlags {
        self.homed
    }

    /// Disarm endstops, restore feedrate scaling and every saved current.
    /// Safe to call more than once; later calls do nothing.
    pub fn finish<H: MachinePort + ?Sized>(&mut self, hw: &mut H) {
        if self.armed {
            hw.arm(false);
            self.armed = false;
        }
        if let Some(percent) = self.saved_feedrate_percent.take() {
            hw.set_feedrate_percent(percent);
        }
        while let Some((axis, ma)) = self.saved_currents.pop() {
            hw.set_current_ma(axis, ma);
            debug!("{axis} current restored: {ma}");
        }
    }
}
