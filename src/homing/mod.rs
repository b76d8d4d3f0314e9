//! Homing sequencer.
//!
//! ```text
//!   home(cmd)
//!     ├─ only_if_unknown && all known ─▶ Skipped
//!     ├─ simulate                     ─▶ set at home, report
//!     └─ synchronize
//!        HomingSession::begin   (currents, feedrate, arm)
//!        for step in HomingPlan { RaiseZ | QuickHomeXY | HomeAxis }
//!        HomingSession::finish  (always, also on fault)
//!        resync + report
//! ```
//!
//! The sequencer borrows the machine profile and the transform; it owns
//! nothing between calls.  Logical position and "known" flags live in the
//! caller's [`MotionState`], passed by `&mut` for the duration of the pass.

mod axis;
pub mod plan;
mod quick_home;
pub mod session;

pub use plan::{HomingPlan, HomingStep};
pub use session::HomingSession;

use log::{debug, info, warn};

use crate::app::commands::HomeCommand;
use crate::app::events::MotionEvent;
use crate::app::ports::{EventSink, MachinePort};
use crate::config::MachineConfig;
use crate::error::HomingError;
use crate::kinematics::{Transform, report_joint_positions};
use crate::motion::{Axis, AxisFlags, MotionState};

/// Outcome of a successful [`HomingSequencer::home`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomingReport {
    /// Every axis was already known and the caller asked to skip.
    Skipped,
    /// Positions were set to home without any motion.
    Simulated,
    /// The listed axes were homed.
    Homed(AxisFlags),
}

pub struct HomingSequencer<'a> {
    cfg: &'a MachineConfig,
    transform: &'a Transform,
}

impl<'a> HomingSequencer<'a> {
    pub fn new(cfg: &'a MachineConfig, transform: &'a Transform) -> Self {
        Self { cfg, transform }
    }

    /// Run one homing pass.
    ///
    /// On `Err` the session has already been finished: endstops are
    /// disarmed, feedrate scaling and every overridden current restored.
    pub fn home<H, S>(
        &self,
        cmd: &HomeCommand,
        state: &mut MotionState,
        hw: &mut H,
        sink: &mut S,
    ) -> Result<HomingReport, HomingError>
    where
        H: MachinePort + ?Sized,
        S: EventSink + ?Sized,
    {
        if cmd.simulate {
            return self.simulate(state, hw, sink);
        }
        if cmd.only_if_unknown && !state.homing_needed() {
            debug!("homing not needed, skip");
            sink.emit(&MotionEvent::HomingSkipped);
            return Ok(HomingReport::Skipped);
        }

        hw.synchronize();

        let plan = HomingPlan::build(&cmd.axes, self.cfg);
        info!("homing {} ({:?})", plan.axes(), plan.steps());
        sink.emit(&MotionEvent::HomingStarted(plan.axes()));

        let mut session = HomingSession::begin(self.cfg, plan.axes(), hw, sink);
        let outcome = self.run(&plan, cmd, &mut session, state, hw, sink);

        match outcome {
            Ok(()) => {
                hw.set_position(&state.current);
                session.finish(hw);
                let homed = session.homed();
                info!("homing complete: {homed}");
                sink.emit(&MotionEvent::DisplayRefresh);
                sink.emit(&MotionEvent::PositionReport(state.current));
                sink.emit(&MotionEvent::HomingFinished(homed));
                Ok(HomingReport::Homed(homed))
            }
            Err(e) => {
                session.finish(hw);
                warn!("homing aborted: {e}");
                sink.emit(&MotionEvent::HomingAborted(e));
                sink.emit(&MotionEvent::DisplayRefresh);
                Err(e)
            }
        }
    }

    fn run<H, S>(
        &self,
        plan: &HomingPlan,
        cmd: &HomeCommand,
        session: &mut HomingSession,
        state: &mut MotionState,
        hw: &mut H,
        sink: &mut S,
    ) -> Result<(), HomingError>
    where
        H: MachinePort + ?Sized,
        S: EventSink + ?Sized,
    {
        for step in plan.steps() {
            match *step {
                HomingStep::RaiseZ => self.raise_z(cmd.raise_mm, session, state, hw, sink),
                HomingStep::QuickHomeXY => self.quick_home_xy(session, state, hw, sink)?,
                HomingStep::HomeAxis(axis) => self.home_axis(axis, session, state, hw, sink)?,
            }
        }
        Ok(())
    }

    /// Target Z for the pre-raise, or `None` when no raise applies.
    ///
    /// With Z known the height is relative to the current Z and clamped to
    /// the Z travel; with Z unknown the configured height is an absolute
    /// target and the override is ignored.
    pub fn raise_target(&self, raise_mm: Option<f32>, state: &MotionState) -> Option<f32> {
        let h = &self.cfg.homing;
        let target = if state.is_known(Axis::Z) {
            let height = raise_mm
                .filter(|mm| mm.is_finite())
                .unwrap_or(h.z_homing_height_mm);
            (state.current.z + height).min(self.cfg.axes.z.max_length_mm)
        } else if h.unknown_z_no_raise {
            return None;
        } else {
            h.z_homing_height_mm
        };
        (target > state.current.z).then_some(target)
    }

    fn raise_z<H, S>(
        &self,
        raise_mm: Option<f32>,
        session: &mut HomingSession,
        state: &mut MotionState,
        hw: &mut H,
        sink: &mut S,
    ) where
        H: MachinePort + ?Sized,
        S: EventSink + ?Sized,
    {
        let Some(target) = self.raise_target(raise_mm, state) else {
            debug!("raise skipped (z={:.3})", state.current.z);
            return;
        };
        session.destination = state.current;
        session.destination.z = target;
        debug!("raise Z {:.3} -> {:.3}", state.current.z, target);

        let feed = self.cfg.axes.z.homing_feedrate_mm_s;
        if self.transform.is_articulated() {
            // Logical XY may not match the arm yet; move the Z actuator alone.
            let mut joints = report_joint_positions(&*hw);
            joints.z = target;
            hw.enqueue_joint_move(&joints, feed);
        } else {
            hw.enqueue_linear_move(&session.destination, feed);
        }
        hw.synchronize();
        state.current.z = target;
        state.joints.z = target;
        sink.emit(&MotionEvent::ZRaised { to_mm: target });
    }

    /// Mark every axis at home without moving.
    fn simulate<H, S>(
        &self,
        state: &mut MotionState,
        hw: &mut H,
        sink: &mut S,
    ) -> Result<HomingReport, HomingError>
    where
        H: MachinePort + ?Sized,
        S: EventSink + ?Sized,
    {
        for axis in Axis::ALL {
            self.set_axis_is_at_home(axis, state, hw)?;
        }
        hw.set_position(&state.current);
        info!("simulated homing");
        sink.emit(&MotionEvent::PositionReport(state.current));
        Ok(HomingReport::Simulated)
    }
}
