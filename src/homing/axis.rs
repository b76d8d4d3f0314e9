//! Single-axis homing and home-position assignment.

use log::{debug, info};

use super::{HomingSequencer, HomingSession};
use crate::app::events::MotionEvent;
use crate::app::ports::{EventSink, MachinePort};
use crate::error::HomingError;
use crate::kinematics::report_joint_positions;
use crate::motion::{Axis, JointAxis, JointPose, MotionState};

/// Overshoot factor on the fast approach so the switch is always reached.
const APPROACH_OVERSHOOT: f32 = 1.5;

/// One full actuator turn, the approach length for articulated joints.
pub(super) const FULL_TURN_DEG: f32 = 360.0;

impl HomingSequencer<'_> {
    /// Fast approach, optional bump and slow re-approach, then set at home.
    ///
    /// A missing trigger on either approach aborts with
    /// [`HomingError::EndstopNotTriggered`]; it is never retried.
    pub(super) fn home_axis<H, S>(
        &self,
        axis: Axis,
        session: &mut HomingSession,
        state: &mut MotionState,
        hw: &mut H,
        sink: &mut S,
    ) -> Result<(), HomingError>
    where
        H: MachinePort + ?Sized,
        S: EventSink + ?Sized,
    {
        if self.transform.is_articulated() && axis != Axis::Z {
            self.home_joint(axis, state, hw)?;
        } else {
            self.home_linear(axis, state, hw)?;
        }

        self.set_axis_is_at_home(axis, state, hw)?;
        session.mark_homed(axis);
        let position_mm = state.current.get(axis);
        info!("{axis} homed at {position_mm:.3}");
        sink.emit(&MotionEvent::AxisHomed { axis, position_mm });
        Ok(())
    }

    fn home_linear<H: MachinePort + ?Sized>(
        &self,
        axis: Axis,
        state: &mut MotionState,
        hw: &mut H,
    ) -> Result<(), HomingError> {
        let a = self.cfg.axis(axis);
        let dir = a.home_dir.sign();

        state.current.set(axis, 0.0);
        hw.set_position(&state.current);

        let step = |state: &mut MotionState, hw: &mut H, distance: f32, feed: f32| {
            let mut target = state.current;
            target.set(axis, state.current.get(axis) + distance);
            hw.enqueue_linear_move(&target, feed);
            hw.synchronize();
            state.current = target;
        };

        step(state, hw, APPROACH_OVERSHOOT * a.max_length_mm * dir, a.homing_feedrate_mm_s);
        validate(axis, hw)?;

        if a.home_bump_mm > 0.0 {
            // Position at the switch is the new zero.
            state.current.set(axis, 0.0);
            hw.set_position(&state.current);
            debug!("{axis} bump {:.3}mm", a.home_bump_mm);
            step(state, hw, -a.home_bump_mm * dir, a.homing_feedrate_mm_s);
            step(
                state,
                hw,
                2.0 * a.home_bump_mm * dir,
                a.homing_feedrate_mm_s / a.bump_divisor,
            );
            validate(axis, hw)?;
        }
        Ok(())
    }

    /// Articulated X/Y: rotate the matching actuator into its switch.
    ///
    /// X turns the whole arm (both joints together, elbow held) and Y
    /// turns the second link alone, the same motions quick home uses.
    fn home_joint<H: MachinePort + ?Sized>(
        &self,
        axis: Axis,
        state: &mut MotionState,
        hw: &mut H,
    ) -> Result<(), HomingError> {
        let a = self.cfg.axis(axis);
        let dir = a.home_dir.sign();
        let theta_gain = if axis == Axis::X { 1.0 } else { 0.0 };

        state.joints = JointPose::new(0.0, 0.0, state.joints.z);
        hw.set_joint_position(&state.joints);

        let rotate = |state: &mut MotionState, hw: &mut H, degrees: f32, feed: f32| {
            let target = JointPose::new(
                state.joints.theta + theta_gain * degrees,
                state.joints.psi + degrees,
                state.joints.z,
            );
            hw.enqueue_joint_move(&target, feed);
            hw.synchronize();
            state.joints = report_joint_positions(&*hw);
        };

        rotate(state, hw, FULL_TURN_DEG * dir, a.homing_feedrate_mm_s);
        validate(axis, hw)?;

        if a.home_bump_mm > 0.0 {
            state.joints = JointPose::new(0.0, 0.0, state.joints.z);
            hw.set_joint_position(&state.joints);
            rotate(state, hw, -a.home_bump_mm * dir, a.homing_feedrate_mm_s);
            rotate(
                state,
                hw,
                2.0 * a.home_bump_mm * dir,
                a.homing_feedrate_mm_s / a.bump_divisor,
            );
            validate(axis, hw)?;
        }
        Ok(())
    }

    /// Assign `axis` its home coordinate, mark it known and push the new
    /// position to the planner.
    ///
    /// Articulated X/Y take their component of the arm's home pose, and
    /// the matching joint takes the home angle, so joint and Cartesian
    /// state stay consistent.
    pub(super) fn set_axis_is_at_home<H: MachinePort + ?Sized>(
        &self,
        axis: Axis,
        state: &mut MotionState,
        hw: &mut H,
    ) -> Result<(), HomingError> {
        if axis != Axis::Z {
            let (pose, joints) = self.transform.home_pose(self.cfg, state.current.z)?;
            let joint = JointAxis::for_axis(axis);
            state.current.set(axis, pose.get(axis));
            state.joints.set(joint, joints.get(joint));
            if self.transform.is_articulated() {
                hw.set_joint_position(&state.joints);
            }
        } else {
            let home = self.cfg.axis(axis).home_pos_mm;
            state.current.set(axis, home);
            state.joints.set(JointAxis::for_axis(axis), home);
        }
        state.set_known(axis, true);
        hw.set_position(&state.current);
        Ok(())
    }
}

fn validate<H: MachinePort + ?Sized>(axis: Axis, hw: &mut H) -> Result<(), HomingError> {
    if hw.validate_homing_move(axis) {
        Ok(())
    } else {
        Err(HomingError::EndstopNotTriggered(axis))
    }
}
