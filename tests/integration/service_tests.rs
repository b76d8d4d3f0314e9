//! MotionService dispatch, moves, jogs and reports.

use scarafw::adapters::config_store::MemoryConfigStore;
use scarafw::app::commands::{HomeCommand, MotionCommand};
use scarafw::app::events::MotionEvent;
use scarafw::app::ports::ConfigPort;
use scarafw::app::service::MotionService;
use scarafw::config::{Geometry, MachineConfig};
use scarafw::error::{Error, KinematicsError};
use scarafw::motion::{CartesianPose, JointPose};

use crate::mock_hw::{MachineCall, MockMachine, RecordingSink};

fn near(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

fn homed_arm() -> (MotionService, MockMachine, RecordingSink) {
    let mut svc = MotionService::new(MachineConfig::default()).unwrap();
    let mut hw = MockMachine::new();
    let mut sink = RecordingSink::new();
    let cmd = HomeCommand {
        simulate: true,
        ..HomeCommand::all()
    };
    svc.home(&cmd, &mut hw, &mut sink).unwrap();
    hw.calls.clear();
    sink.events.clear();
    (svc, hw, sink)
}

// ── Construction ──────────────────────────────────────────────

#[test]
fn new_rejects_invalid_profile() {
    let mut cfg = MachineConfig::default();
    cfg.kinematics.l1_mm = -1.0;
    assert!(matches!(MotionService::new(cfg), Err(Error::Config(_))));
}

#[test]
fn service_starts_from_stored_profile() {
    let mut store = MemoryConfigStore::new();
    let mut cfg = MachineConfig::default();
    cfg.geometry = Geometry::MpScara;
    cfg.kinematics.l2_mm = 120.0;
    store.save(&cfg).unwrap();

    let svc = MotionService::new(store.load().unwrap()).unwrap();
    assert_eq!(svc.config(), &cfg);
    assert!(svc.transform().is_articulated());
    assert!(svc.homing_needed());
}

// ── Moves ─────────────────────────────────────────────────────

#[test]
fn unreachable_move_is_rejected_before_queueing() {
    let (mut svc, mut hw, mut sink) = homed_arm();
    let before = svc.position();

    let err = svc
        .move_to(&CartesianPose::new(1000.0, 0.0, 0.0), 50.0, &mut hw, &mut sink)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Kinematics(KinematicsError::Unreachable { .. })
    ));
    assert!(hw.calls.is_empty());
    assert!(sink.events.is_empty());
    assert_eq!(svc.position(), before);
}

#[test]
fn move_to_arm_origin_is_rejected() {
    let (mut svc, mut hw, mut sink) = homed_arm();
    let origin = CartesianPose::new(100.0, -56.0, 5.0);
    assert!(svc.move_to(&origin, 50.0, &mut hw, &mut sink).is_err());
    assert!(hw.linear_moves().is_empty());
}

#[test]
fn reachable_move_tracks_pose_and_joints() {
    let (mut svc, mut hw, mut sink) = homed_arm();
    let target = svc.transform().forward(&JointPose::new(60.0, 120.0, 7.0));

    svc.move_to(&target, 30.0, &mut hw, &mut sink).unwrap();

    assert_eq!(hw.linear_moves(), vec![(target, 30.0)]);
    assert_eq!(svc.position(), target);
    let back = svc.transform().forward(&svc.state().joints);
    assert!(near(back.x, target.x, 1e-2) && near(back.y, target.y, 1e-2));
    assert!(sink.contains(&MotionEvent::PositionReport(target)));
}

// ── Jogs ──────────────────────────────────────────────────────

#[test]
fn jog_rotates_from_home_angles() {
    let (mut svc, mut hw, mut sink) = homed_arm();
    let start = svc.state().joints;

    svc.jog_joints(10.0, -5.0, 20.0, &mut hw, &mut sink).unwrap();

    let (target, feed) = hw.joint_moves()[0];
    assert!(near(target.theta, start.theta + 10.0, 1e-4));
    assert!(near(target.psi, start.psi - 5.0, 1e-4));
    assert_eq!(feed, 20.0);

    let expected = svc.transform().forward(&target);
    assert_eq!(svc.position(), expected);
    assert!(sink.contains(&MotionEvent::JointReport(target)));
    assert!(sink.contains(&MotionEvent::PositionReport(expected)));
}

#[test]
fn jog_rejects_non_finite_deltas() {
    let (mut svc, mut hw, mut sink) = homed_arm();
    let err = svc
        .jog_joints(f32::NAN, 0.0, 20.0, &mut hw, &mut sink)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCommand(_)));
    assert!(hw.calls.is_empty());
}

// ── Reports ───────────────────────────────────────────────────

#[test]
fn joint_report_reads_planner_positions() {
    let (svc, mut hw, mut sink) = homed_arm();
    hw.joints = JointPose::new(12.0, 34.0, 5.0);

    let joints = svc.report_joint_positions(&hw, &mut sink);
    assert_eq!(joints, JointPose::new(12.0, 34.0, 5.0));
    assert_eq!(sink.last(), Some(&MotionEvent::JointReport(joints)));
}

#[test]
fn commands_dispatch_to_operations() {
    let (mut svc, mut hw, mut sink) = homed_arm();

    svc.handle_command(MotionCommand::ReportPosition, &mut hw, &mut sink)
        .unwrap();
    assert_eq!(sink.last(), Some(&MotionEvent::PositionReport(svc.position())));

    svc.handle_command(MotionCommand::ReportJointPositions, &mut hw, &mut sink)
        .unwrap();
    assert!(matches!(sink.last(), Some(MotionEvent::JointReport(_))));

    svc.handle_command(
        MotionCommand::JogJoints {
            d_theta: 1.0,
            d_psi: 1.0,
            feed_deg_s: 10.0,
        },
        &mut hw,
        &mut sink,
    )
    .unwrap();
    assert_eq!(hw.joint_moves().len(), 1);

    let far = MotionCommand::MoveTo {
        target: CartesianPose::new(-900.0, 0.0, 0.0),
        feed_mm_s: 10.0,
    };
    assert!(svc.handle_command(far, &mut hw, &mut sink).is_err());
    assert!(!hw.calls.iter().any(|c| matches!(c, MachineCall::LinearMove { .. })));
}

#[test]
fn home_command_through_dispatcher_clears_homing_needed() {
    let mut svc = MotionService::new(MachineConfig {
        geometry: Geometry::Cartesian,
        ..MachineConfig::default()
    })
    .unwrap();
    let mut hw = MockMachine::new();
    let mut sink = RecordingSink::new();

    assert!(svc.homing_needed());
    svc.handle_command(MotionCommand::Home(HomeCommand::all()), &mut hw, &mut sink)
        .unwrap();
    assert!(!svc.homing_needed());
}
