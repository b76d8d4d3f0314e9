//! Fuzz target: `Transform::inverse`
//!
//! Drives arbitrary link lengths, offsets and targets (including NaN and infinities)
//! through both arm solvers and asserts that a successful solve always
//! carries finite angles.
//!
//! cargo fuzz run fuzz_inverse_kinematics

#![no_main]

use libfuzzer_sys::fuzz_target;
use scarafw::config::KinematicsConfig;
use scarafw::kinematics::ScaraArm;
use scarafw::motion::CartesianPose;

fn f32_at(data: &[u8], i: usize) -> f32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&data[i * 4..i * 4 + 4]);
    f32::from_le_bytes(b)
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 20 {
        return;
    }
    // Links from a micron to ten metres; beyond that the squared lengths
    // leave f32 range.
    let (l1, l2) = (f32_at(data, 0), f32_at(data, 1));
    if !((1e-3..=1e4).contains(&l1) && (1e-3..=1e4).contains(&l2)) {
        return;
    }
    let arm = ScaraArm::new(KinematicsConfig {
        l1_mm: l1,
        l2_mm: l2,
        offset_x_mm: f32_at(data, 2),
        ..KinematicsConfig::default()
    });
    let target = CartesianPose::new(f32_at(data, 3), f32_at(data, 4), 0.0);

    if let Ok(j) = arm.inverse_morgan(&target) {
        assert!(j.is_finite(), "morgan solve returned {j:?} for {target:?}");
    }
    if let Ok(j) = arm.inverse_mp(&target) {
        assert!(j.is_finite(), "mp solve returned {j:?} for {target:?}");
    }
});
