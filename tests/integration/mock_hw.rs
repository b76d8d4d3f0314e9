//! Mock machine adapter for integration tests.
//!
//! Records every planner, endstop and driver call so tests can assert on
//! the full command history without a stepper loop.  Endstop outcomes are
//! scripted per axis; the clock only advances when the domain idles.

use scarafw::app::events::MotionEvent;
use scarafw::app::ports::{ClockPort, CurrentPort, EndstopPort, EventSink, MotionPort};
use scarafw::motion::{Axis, AxisFlags, CartesianPose, JointAxis, JointPose, PerAxis};

// ── Machine call record ───────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum MachineCall {
    Synchronize,
    LinearMove { target: CartesianPose, feed: f32 },
    JointMove { target: JointPose, feed: f32 },
    QuickStop,
    SetPosition(CartesianPose),
    SetJointPosition(JointPose),
    SetFeedrate(u16),
    SetCurrent { axis: Axis, ma: u16 },
    Arm(bool),
    Validate(Axis),
}

// ── MockMachine ───────────────────────────────────────────────

pub struct MockMachine {
    pub calls: Vec<MachineCall>,
    pub currents: PerAxis<u16>,
    pub feedrate_percent: u16,
    pub armed: bool,
    /// Actuator positions as the stepper layer would report them.
    pub joints: JointPose,
    /// Axes whose homing moves never find the switch.
    pub missing: AxisFlags,
    /// Polls after a joint move before `check_triggered` reports a hit;
    /// `None` never reports one.
    pub trigger_after_polls: Option<u32>,
    /// Joint moves reach their target immediately; otherwise they stall.
    pub joints_arrive: bool,
    pub now_ms: u64,
    pub idle_step_ms: u64,
    polls: u32,
}

#[allow(dead_code)]
impl MockMachine {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            currents: PerAxis::splat(800),
            feedrate_percent: 100,
            armed: false,
            joints: JointPose::default(),
            missing: AxisFlags::NONE,
            trigger_after_polls: Some(3),
            joints_arrive: true,
            now_ms: 0,
            idle_step_ms: 10,
            polls: 0,
        }
    }

    /// A machine whose `axis` switch never triggers.
    pub fn missing(axis: Axis) -> Self {
        let mut hw = Self::new();
        hw.missing.insert(axis);
        hw
    }

    pub fn linear_moves(&self) -> Vec<(CartesianPose, f32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                MachineCall::LinearMove { target, feed } => Some((*target, *feed)),
                _ => None,
            })
            .collect()
    }

    pub fn joint_moves(&self) -> Vec<(JointPose, f32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                MachineCall::JointMove { target, feed } => Some((*target, *feed)),
                _ => None,
            })
            .collect()
    }

    pub fn validations(&self) -> Vec<Axis> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                MachineCall::Validate(axis) => Some(*axis),
                _ => None,
            })
            .collect()
    }

    pub fn current_sets(&self, axis: Axis) -> Vec<u16> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                MachineCall::SetCurrent { axis: a, ma } if *a == axis => Some(*ma),
                _ => None,
            })
            .collect()
    }

    /// Index of the first call matching `pred`.
    pub fn position_of(&self, pred: impl Fn(&MachineCall) -> bool) -> Option<usize> {
        self.calls.iter().position(pred)
    }
}

impl Default for MockMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionPort for MockMachine {
    fn synchronize(&mut self) {
        self.calls.push(MachineCall::Synchronize);
    }

    fn enqueue_linear_move(&mut self, target: &CartesianPose, feed_mm_s: f32) {
        self.calls.push(MachineCall::LinearMove {
            target: *target,
            feed: feed_mm_s,
        });
        self.joints.z = target.z;
    }

    fn enqueue_joint_move(&mut self, target: &JointPose, feed_deg_s: f32) {
        self.calls.push(MachineCall::JointMove {
            target: *target,
            feed: feed_deg_s,
        });
        self.polls = 0;
        if self.joints_arrive {
            self.joints = *target;
        }
    }

    fn quick_stop(&mut self) {
        self.calls.push(MachineCall::QuickStop);
    }

    fn set_position(&mut self, pose: &CartesianPose) {
        self.calls.push(MachineCall::SetPosition(*pose));
    }

    fn set_joint_position(&mut self, joints: &JointPose) {
        self.calls.push(MachineCall::SetJointPosition(*joints));
        self.joints = *joints;
    }

    fn joint_position(&self, joint: JointAxis) -> f32 {
        self.joints.get(joint)
    }

    fn feedrate_percent(&self) -> u16 {
        self.feedrate_percent
    }

    fn set_feedrate_percent(&mut self, percent: u16) {
        self.calls.push(MachineCall::SetFeedrate(percent));
        self.feedrate_percent = percent;
    }
}

impl EndstopPort for MockMachine {
    fn arm(&mut self, enabled: bool) {
        self.calls.push(MachineCall::Arm(enabled));
        self.armed = enabled;
    }

    fn check_triggered(&mut self) -> bool {
        self.polls += 1;
        matches!(self.trigger_after_polls, Some(n) if self.polls >= n)
    }

    fn validate_homing_move(&mut self, axis: Axis) -> bool {
        self.calls.push(MachineCall::Validate(axis));
        !self.missing.contains(axis)
    }
}

impl CurrentPort for MockMachine {
    fn current_ma(&self, axis: Axis) -> u16 {
        *self.currents.get(axis)
    }

    fn set_current_ma(&mut self, axis: Axis, milliamps: u16) {
        self.calls.push(MachineCall::SetCurrent { axis, ma: milliamps });
        *self.currents.get_mut(axis) = milliamps;
    }
}

impl ClockPort for MockMachine {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn idle(&mut self) {
        self.now_ms += self.idle_step_ms;
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<MotionEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn contains(&self, event: &MotionEvent) -> bool {
        self.events.contains(event)
    }

    pub fn last(&self) -> Option<&MotionEvent> {
        self.events.last()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &MotionEvent) {
        self.events.push(event.clone());
    }
}
