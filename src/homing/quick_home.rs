//! Combined XY homing.
//!
//! Cartesian machines run one diagonal move into both switches.  Arms
//! rotate the whole arm one turn toward the X switch, then the second link
//! one turn toward the Y switch, polling the endstops in between.

use log::{debug, warn};

use super::axis::FULL_TURN_DEG;
use super::{HomingSequencer, HomingSession};
use crate::app::events::MotionEvent;
use crate::app::ports::{EventSink, MachinePort};
use crate::error::HomingError;
use crate::kinematics::report_joint_positions;
use crate::motion::{Axis, JointAxis, JointPose, MotionState};

/// Joint positions within this many degrees of the rotation target count
/// as "arrived".
const ARRIVED_TOLERANCE_DEG: f32 = 1e-3;

impl HomingSequencer<'_> {
    pub(super) fn quick_home_xy<H, S>(
        &self,
        session: &mut HomingSession,
        state: &mut MotionState,
        hw: &mut H,
        sink: &mut S,
    ) -> Result<(), HomingError>
    where
        H: MachinePort + ?Sized,
        S: EventSink + ?Sized,
    {
        if self.transform.is_articulated() {
            self.quick_home_joints(state, hw)?;
        } else {
            self.quick_home_diagonal(session, state, hw)?;
        }

        for axis in [Axis::X, Axis::Y] {
            self.set_axis_is_at_home(axis, state, hw)?;
            session.mark_homed(axis);
        }
        sink.emit(&MotionEvent::QuickHomeComplete);
        Ok(())
    }

    fn quick_home_diagonal<H: MachinePort + ?Sized>(
        &self,
        session: &mut HomingSession,
        state: &mut MotionState,
        hw: &mut H,
    ) -> Result<(), HomingError> {
        let (x, y) = (&self.cfg.axes.x, &self.cfg.axes.y);

        state.current = state.current.with_xy(0.0, 0.0);
        hw.set_position(&state.current);

        let (mlx, mly) = (x.max_length_mm, y.max_length_mm);
        let ratio = if mlx > mly { mly / mlx } else { mlx / mly };
        let feed = x.homing_feedrate_mm_s.min(y.homing_feedrate_mm_s) * (ratio * ratio + 1.0).sqrt();

        session.destination = state
            .current
            .with_xy(1.5 * mlx * x.home_dir.sign(), 1.5 * mly * y.home_dir.sign());
        debug!(
            "quick home -> ({:.1}, {:.1}) @ {:.2}mm/s",
            session.destination.x, session.destination.y, feed
        );
        hw.enqueue_linear_move(&session.destination, feed);
        hw.synchronize();

        for axis in [Axis::X, Axis::Y] {
            if !hw.validate_homing_move(axis) {
                return Err(HomingError::EndstopNotTriggered(axis));
            }
        }

        state.current = state.current.with_xy(0.0, 0.0);
        hw.set_position(&state.current);
        Ok(())
    }

    fn quick_home_joints<H: MachinePort + ?Sized>(
        &self,
        state: &mut MotionState,
        hw: &mut H,
    ) -> Result<(), HomingError> {
        let (x, y) = (&self.cfg.axes.x, &self.cfg.axes.y);

        // Whole arm toward the X switch, elbow held fixed.
        let turn = FULL_TURN_DEG * x.home_dir.sign();
        self.rotate_to_switch(
            Axis::X,
            JointPose::new(turn, turn, state.joints.z),
            x.homing_feedrate_mm_s,
            state,
            hw,
        )?;

        // Second link alone toward the Y switch.
        let turn = FULL_TURN_DEG * y.home_dir.sign();
        self.rotate_to_switch(
            Axis::Y,
            JointPose::new(0.0, turn, state.joints.z),
            y.homing_feedrate_mm_s,
            state,
            hw,
        )
    }

    /// Zero the joints, start the rotation and poll until an endstop hits
    /// or both joints arrive, then validate.
    fn rotate_to_switch<H: MachinePort + ?Sized>(
        &self,
        axis: Axis,
        target: JointPose,
        feed_deg_s: f32,
        state: &mut MotionState,
        hw: &mut H,
    ) -> Result<(), HomingError> {
        state.joints = JointPose::new(0.0, 0.0, state.joints.z);
        hw.set_joint_position(&state.joints);
        hw.enqueue_joint_move(&target, feed_deg_s);

        self.poll_endstops(axis, &target, hw)?;
        hw.synchronize();
        state.joints = report_joint_positions(&*hw);

        if hw.validate_homing_move(axis) {
            Ok(())
        } else {
            Err(HomingError::EndstopNotTriggered(axis))
        }
    }

    /// Cooperative poll for an endstop hit during a queued rotation.
    ///
    /// Every poll interval the joint positions are compared with the
    /// target; once both have arrived the loop ends without a hit and the
    /// following validation reports the fault.  The loop never runs past
    /// the configured timeout; on expiry the rotation is aborted before the
    /// error is returned.
    fn poll_endstops<H: MachinePort + ?Sized>(
        &self,
        axis: Axis,
        target: &JointPose,
        hw: &mut H,
    ) -> Result<(), HomingError> {
        let h = &self.cfg.homing;
        let interval = u64::from(h.quick_home_poll_interval_ms);
        let timeout = u64::from(h.quick_home_timeout_ms);
        let start = hw.now_ms();
        let mut deadline = start + interval;

        while !hw.check_triggered() {
            let now = hw.now_ms();
            let elapsed_ms = now.saturating_sub(start);
            if elapsed_ms >= timeout {
                warn!("{axis} quick home timed out after {elapsed_ms}ms, stopping");
                hw.quick_stop();
                return Err(HomingError::QuickHomeTimeout { axis, elapsed_ms });
            }
            if now >= deadline {
                deadline = now + interval;
                let theta = hw.joint_position(JointAxis::Theta);
                let psi = hw.joint_position(JointAxis::Psi);
                debug!("{axis} poll: theta={theta:.3} psi={psi:.3}");
                if (theta - target.theta).abs() < ARRIVED_TOLERANCE_DEG
                    && (psi - target.psi).abs() < ARRIVED_TOLERANCE_DEG
                {
                    break;
                }
            }
            hw.idle();
        }
        Ok(())
    }
}
