//! Motion service, the hexagonal core.
//!
//! [`MotionService`] owns the machine profile, the kinematic transform and
//! the single [`MotionState`].  Every operation borrows the hardware and
//! event sink only for the duration of the call.
//!
//! ```text
//!  MachinePort ◀──┌─────────────────────────┐──▶ EventSink
//!                 │      MotionService       │
//!                 │ Sequencer · Transform    │
//!                 └─────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::config::MachineConfig;
use crate::error::{Error, Result};
use crate::homing::{HomingReport, HomingSequencer};
use crate::kinematics::{Transform, report_joint_positions};
use crate::motion::{CartesianPose, JointPose, MotionState};

use super::commands::{HomeCommand, MotionCommand};
use super::events::MotionEvent;
use super::ports::{EventSink, MachinePort};

pub struct MotionService {
    config: MachineConfig,
    transform: Transform,
    state: MotionState,
}

impl MotionService {
    /// Build the service from a validated profile.
    pub fn new(config: MachineConfig) -> Result<Self> {
        config.validate()?;
        let transform = Transform::from_config(&config);
        info!(
            "motion core ready: {:?}, L1={:.1} L2={:.1}",
            config.geometry, config.kinematics.l1_mm, config.kinematics.l2_mm
        );
        Ok(Self {
            config,
            transform,
            state: MotionState::new(),
        })
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn position(&self) -> CartesianPose {
        self.state.current
    }

    pub fn homing_needed(&self) -> bool {
        self.state.homing_needed()
    }

    /// Forget every axis position, e.g. after the steppers were disabled.
    pub fn invalidate_position(&mut self) {
        self.state.forget_all();
    }

    // ── Operations ────────────────────────────────────────────

    pub fn home<H, S>(&mut self, cmd: &HomeCommand, hw: &mut H, sink: &mut S) -> Result<HomingReport>
    where
        H: MachinePort + ?Sized,
        S: EventSink + ?Sized,
    {
        let sequencer = HomingSequencer::new(&self.config, &self.transform);
        Ok(sequencer.home(cmd, &mut self.state, hw, sink)?)
    }

    /// Straight move to `target`.  Arm targets outside the reachable
    /// annulus are rejected before anything is queued.
    pub fn move_to<H, S>(
        &mut self,
        target: &CartesianPose,
        feed_mm_s: f32,
        hw: &mut H,
        sink: &mut S,
    ) -> Result<()>
    where
        H: MachinePort + ?Sized,
        S: EventSink + ?Sized,
    {
        let joints = match self.transform.inverse(target) {
            Ok(joints) => joints,
            Err(e) => {
                warn!("move rejected: {e}");
                return Err(e.into());
            }
        };
        hw.enqueue_linear_move(target, feed_mm_s);
        self.state.current = *target;
        self.state.joints = joints;
        sink.emit(&MotionEvent::PositionReport(self.state.current));
        Ok(())
    }

    /// Rotate the arm joints by the given deltas and track the resulting
    /// Cartesian position.
    pub fn jog_joints<H, S>(
        &mut self,
        d_theta: f32,
        d_psi: f32,
        feed_deg_s: f32,
        hw: &mut H,
        sink: &mut S,
    ) -> Result<()>
    where
        H: MachinePort + ?Sized,
        S: EventSink + ?Sized,
    {
        let joints = JointPose::new(
            self.state.joints.theta + d_theta,
            self.state.joints.psi + d_psi,
            self.state.joints.z,
        );
        if !joints.is_finite() {
            return Err(Error::InvalidCommand("jog deltas must be finite"));
        }
        let pose = self.transform.forward(&joints);
        debug!("jog -> theta={:.3} psi={:.3}", joints.theta, joints.psi);

        hw.enqueue_joint_move(&joints, feed_deg_s);
        self.state.joints = joints;
        self.state.current = pose;
        sink.emit(&MotionEvent::JointReport(joints));
        sink.emit(&MotionEvent::PositionReport(pose));
        Ok(())
    }

    /// Emit and return the planner's current actuator angles.
    pub fn report_joint_positions<H, S>(&self, hw: &H, sink: &mut S) -> JointPose
    where
        H: MachinePort + ?Sized,
        S: EventSink + ?Sized,
    {
        let joints = report_joint_positions(hw);
        sink.emit(&MotionEvent::JointReport(joints));
        joints
    }

    pub fn report_position<S: EventSink + ?Sized>(&self, sink: &mut S) {
        sink.emit(&MotionEvent::PositionReport(self.state.current));
    }

    // ── Command handling ──────────────────────────────────────

    /// Dispatch one command from the G-code layer.
    pub fn handle_command<H, S>(&mut self, cmd: MotionCommand, hw: &mut H, sink: &mut S) -> Result<()>
    where
        H: MachinePort + ?Sized,
        S: EventSink + ?Sized,
    {
        match cmd {
            MotionCommand::Home(home) => self.home(&home, hw, sink).map(|_| ()),
            MotionCommand::ReportJointPositions => {
                self.report_joint_positions(&*hw, sink);
                Ok(())
            }
            MotionCommand::ReportPosition => {
                self.report_position(sink);
                Ok(())
            }
            MotionCommand::JogJoints {
                d_theta,
                d_psi,
                feed_deg_s,
            } => self.jog_joints(d_theta, d_psi, feed_deg_s, hw, sink),
            MotionCommand::MoveTo { target, feed_mm_s } => self.move_to(&target, feed_mm_s, hw, sink),
        }
    }
}
