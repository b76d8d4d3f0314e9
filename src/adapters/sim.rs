//! Simulated machine for host runs.
//!
//! Implements every machine port with instantaneous moves.  The simulated
//! mechanism has a physical position per actuator; the planner's logical
//! position is that plus an offset which `set_position` /
//! `set_joint_position` redefine, the way a real stepper layer re-zeroes
//! its counters.
//!
//! Switches are modelled as [`SimPin`]s read through the real
//! [`EndstopMonitor`](crate::drivers::endstop::EndstopMonitor):
//!
//! | Actuator          | Switch position                               |
//! |-------------------|-----------------------------------------------|
//! | linear X / Y / Z  | travel end on the `home_dir` side             |
//! | arm theta         | physical theta ≡ home theta (mod 360)         |
//! | arm psi           | elbow (psi − theta) ≡ home elbow (mod 360)    |
//!
//! A linear axis stops at either end of its travel.  An arm move stops as
//! a whole at the first switch it crosses.

use core::cell::Cell;
use core::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin};
use log::{debug, warn};

use crate::app::ports::{ClockPort, CurrentPort, EndstopPort, MotionPort};
use crate::config::MachineConfig;
use crate::drivers::endstop::{EndstopMonitor, Polarity, SwitchEndstop};
use crate::kinematics::Transform;
use crate::motion::{Axis, CartesianPose, HomeDirection, JointAxis, JointPose, PerAxis};

/// Positions closer than this count as "at the switch".
const AT_SWITCH_EPSILON: f32 = 1e-4;
/// Simulated time that passes per `idle()` call.
const IDLE_TICK_MS: u64 = 1;
const DEFAULT_CURRENT_MA: u16 = 800;

/// Digital input whose level the simulation drives.
#[derive(Debug, Clone, Default)]
pub struct SimPin(Rc<Cell<bool>>);

impl SimPin {
    pub fn set(&self, pressed: bool) {
        self.0.set(pressed);
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }
}

pub struct SimulatedMachine {
    cfg: MachineConfig,
    transform: Transform,
    /// Physical actuator positions.  Cartesian machines store X/Y in
    /// theta/psi.
    phys: JointPose,
    /// Logical = physical + offset, per actuator.
    offset: JointPose,
    pins: PerAxis<SimPin>,
    endstops: EndstopMonitor<SimPin>,
    currents: PerAxis<u16>,
    feedrate_percent: u16,
    now_ms: u64,
    moves: usize,
}

impl SimulatedMachine {
    /// Machine powered on with every actuator at `phys`.  The planner
    /// starts at logical zero wherever the mechanism happens to be.
    pub fn new(cfg: MachineConfig, phys: JointPose) -> Self {
        let pins = PerAxis::new(SimPin::default(), SimPin::default(), SimPin::default());
        let endstops = EndstopMonitor::new(PerAxis::new(
            SwitchEndstop::new(pins.x.clone(), Polarity::ActiveHigh),
            SwitchEndstop::new(pins.y.clone(), Polarity::ActiveHigh),
            SwitchEndstop::new(pins.z.clone(), Polarity::ActiveHigh),
        ));
        let transform = Transform::from_config(&cfg);
        Self {
            cfg,
            transform,
            phys,
            offset: JointPose::new(-phys.theta, -phys.psi, -phys.z),
            pins,
            endstops,
            currents: PerAxis::splat(DEFAULT_CURRENT_MA),
            feedrate_percent: 100,
            now_ms: 0,
            moves: 0,
        }
    }

    /// Logical actuator positions.
    pub fn joints(&self) -> JointPose {
        JointPose::new(
            self.phys.theta + self.offset.theta,
            self.phys.psi + self.offset.psi,
            self.phys.z + self.offset.z,
        )
    }

    /// Logical Cartesian position of the tool.
    pub fn position(&self) -> CartesianPose {
        self.transform.forward(&self.joints())
    }

    pub fn physical(&self) -> JointPose {
        self.phys
    }

    /// Number of moves executed so far.
    pub fn moves(&self) -> usize {
        self.moves
    }

    // ── Motion model ──────────────────────────────────────────

    fn run_joint_move(&mut self, logical: &JointPose) {
        self.moves += 1;
        let start = self.phys;
        let mut end = JointPose::new(
            logical.theta - self.offset.theta,
            logical.psi - self.offset.psi,
            logical.z - self.offset.z,
        );
        let mut hits = PerAxis::splat(false);

        if self.transform.is_articulated() {
            let home = &self.cfg.kinematics;
            let elbow0 = start.psi - start.theta;
            let elbow1 = end.psi - end.theta;
            let theta_t = crossing(start.theta, end.theta, home.home_theta_deg);
            let elbow_t = crossing(elbow0, elbow1, home.home_psi_deg - home.home_theta_deg);
            let first = match (theta_t, elbow_t) {
                (Some(a), Some(b)) if b < a => Some((b, Axis::Y)),
                (Some(a), _) => Some((a, Axis::X)),
                (None, Some(b)) => Some((b, Axis::Y)),
                (None, None) => None,
            };
            if let Some((t, axis)) = first {
                end.theta = start.theta + t * (end.theta - start.theta);
                end.psi = start.psi + t * (end.psi - start.psi);
                *hits.get_mut(axis) = true;
                debug!("sim: {axis} switch at t={t:.4}");
            }
        } else {
            hits.x = self.run_linear(Axis::X, start.theta, &mut end.theta);
            hits.y = self.run_linear(Axis::Y, start.psi, &mut end.psi);
        }
        hits.z = self.run_linear(Axis::Z, start.z, &mut end.z);

        self.phys = end;
        for axis in Axis::ALL {
            self.pins.get(axis).set(*hits.get(axis));
        }
        // The stepping loop samples the switches; hits latch while armed.
        self.endstops.sample();
    }

    /// Clamp a linear actuator to its travel.  Returns whether the move
    /// was commanded and ended on the switch.
    fn run_linear(&self, axis: Axis, start: f32, end: &mut f32) -> bool {
        let commanded = (*end - start).abs() > AT_SWITCH_EPSILON;
        *end = end.clamp(0.0, self.cfg.axis(axis).max_length_mm);
        commanded && self.linear_at_switch(axis, *end)
    }

    fn linear_at_switch(&self, axis: Axis, v: f32) -> bool {
        let a = self.cfg.axis(axis);
        let switch = match a.home_dir {
            HomeDirection::Min => 0.0,
            HomeDirection::Max => a.max_length_mm,
        };
        (v - switch).abs() < AT_SWITCH_EPSILON
    }
}

/// Fraction `t ∈ (0, 1]` along `from → to` at which the value first
/// reaches `switch` modulo a full turn, excluding a start already on it.
fn crossing(from: f32, to: f32, switch: f32) -> Option<f32> {
    let d = to - from;
    if d.abs() < AT_SWITCH_EPSILON {
        return None;
    }
    let mut hit = if d > 0.0 {
        switch + 360.0 * ((from - switch) / 360.0).ceil()
    } else {
        switch + 360.0 * ((from - switch) / 360.0).floor()
    };
    if (hit - from).abs() < AT_SWITCH_EPSILON {
        hit += 360.0 * d.signum();
    }
    let t = (hit - from) / d;
    (t > 0.0 && t <= 1.0).then_some(t)
}

impl MotionPort for SimulatedMachine {
    fn synchronize(&mut self) {}

    // Moves complete on enqueue, so there is never anything left to abort.
    fn quick_stop(&mut self) {
        debug!("sim: quick stop");
    }

    fn enqueue_linear_move(&mut self, target: &CartesianPose, _feed_mm_s: f32) {
        match self.transform.inverse(target) {
            Ok(joints) => self.run_joint_move(&joints),
            Err(e) => {
                warn!("sim: {e}, moving Z only");
                let mut joints = self.joints();
                joints.z = target.z;
                self.run_joint_move(&joints);
            }
        }
    }

    fn enqueue_joint_move(&mut self, target: &JointPose, _feed_deg_s: f32) {
        self.run_joint_move(target);
    }

    fn set_position(&mut self, pose: &CartesianPose) {
        if self.transform.is_articulated() {
            self.offset.z = pose.z - self.phys.z;
        } else {
            self.offset = JointPose::new(
                pose.x - self.phys.theta,
                pose.y - self.phys.psi,
                pose.z - self.phys.z,
            );
        }
    }

    fn set_joint_position(&mut self, joints: &JointPose) {
        self.offset = JointPose::new(
            joints.theta - self.phys.theta,
            joints.psi - self.phys.psi,
            joints.z - self.phys.z,
        );
    }

    fn joint_position(&self, joint: JointAxis) -> f32 {
        self.joints().get(joint)
    }

    fn feedrate_percent(&self) -> u16 {
        self.feedrate_percent
    }

    fn set_feedrate_percent(&mut self, percent: u16) {
        self.feedrate_percent = percent;
    }
}

impl EndstopPort for SimulatedMachine {
    fn arm(&mut self, enabled: bool) {
        self.endstops.arm(enabled);
    }

    fn check_triggered(&mut self) -> bool {
        self.endstops.check_triggered()
    }

    fn validate_homing_move(&mut self, axis: Axis) -> bool {
        self.endstops.validate(axis)
    }
}

impl CurrentPort for SimulatedMachine {
    fn current_ma(&self, axis: Axis) -> u16 {
        *self.currents.get(axis)
    }

    fn set_current_ma(&mut self, axis: Axis, milliamps: u16) {
        *self.currents.get_mut(axis) = milliamps;
    }
}

impl ClockPort for SimulatedMachine {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn idle(&mut self) {
        self.now_ms += IDLE_TICK_MS;
    }
}
