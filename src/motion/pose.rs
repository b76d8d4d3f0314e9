//! Cartesian and joint-space poses.

use serde::{Deserialize, Serialize};

use super::Axis;

/// Logical tool position in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CartesianPose {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl CartesianPose {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }

    /// Same pose with X and Y replaced.
    pub const fn with_xy(self, x: f32, y: f32) -> Self {
        Self { x, y, z: self.z }
    }
}

/// Actuator identity in joint space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointAxis {
    /// Shoulder actuator (drives X in Cartesian geometry).
    Theta,
    /// Elbow actuator (drives Y in Cartesian geometry).
    Psi,
    /// Vertical actuator, passed through unchanged.
    Z,
}

impl JointAxis {
    /// Joint whose endstop stands in for `axis` during articulated homing.
    pub const fn for_axis(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::Theta,
            Axis::Y => Self::Psi,
            Axis::Z => Self::Z,
        }
    }
}

/// Actuator targets: arm angles in degrees plus a pass-through Z.
///
/// For the Morgan arm `psi` is the absolute angle of the second link
/// (shoulder angle plus elbow deflection), not the elbow angle itself.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointPose {
    pub theta: f32,
    pub psi: f32,
    pub z: f32,
}

impl JointPose {
    pub const fn new(theta: f32, psi: f32, z: f32) -> Self {
        Self { theta, psi, z }
    }

    pub fn get(&self, joint: JointAxis) -> f32 {
        match joint {
            JointAxis::Theta => self.theta,
            JointAxis::Psi => self.psi,
            JointAxis::Z => self.z,
        }
    }

    pub fn set(&mut self, joint: JointAxis, value: f32) {
        match joint {
            JointAxis::Theta => self.theta = value,
            JointAxis::Psi => self.psi = value,
            JointAxis::Z => self.z = value,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.theta.is_finite() && self.psi.is_finite() && self.z.is_finite()
    }
}
