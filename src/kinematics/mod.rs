//! Joint-space ↔ Cartesian transforms.
//!
//! [`Transform`] is built once from the [`MachineConfig`] and is read-only
//! afterwards.  Cartesian machines use the identity mapping (theta drives X,
//! psi drives Y); both arm geometries delegate to [`scara::ScaraArm`].

pub mod scara;

pub use scara::{ElbowConfig, ScaraArm};

use crate::app::ports::MotionPort;
use crate::config::{Geometry, MachineConfig};
use crate::error::KinematicsError;
use crate::motion::{CartesianPose, JointAxis, JointPose};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Cartesian,
    Morgan(ScaraArm),
    Mp(ScaraArm),
}

impl Transform {
    pub fn from_config(cfg: &MachineConfig) -> Self {
        match cfg.geometry {
            Geometry::Cartesian => Self::Cartesian,
            Geometry::MorganScara => Self::Morgan(ScaraArm::new(cfg.kinematics)),
            Geometry::MpScara => Self::Mp(ScaraArm::new(cfg.kinematics)),
        }
    }

    pub const fn is_articulated(&self) -> bool {
        !matches!(self, Self::Cartesian)
    }

    /// Joint angles to Cartesian.  Never fails; non-finite input yields
    /// non-finite output.
    pub fn forward(&self, joints: &JointPose) -> CartesianPose {
        match self {
            Self::Cartesian => CartesianPose::new(joints.theta, joints.psi, joints.z),
            Self::Morgan(arm) | Self::Mp(arm) => arm.forward(joints),
        }
    }

    /// Cartesian to joint angles, or [`KinematicsError::Unreachable`].
    /// An `Ok` result always carries finite angles.
    pub fn inverse(&self, raw: &CartesianPose) -> Result<JointPose, KinematicsError> {
        match self {
            Self::Cartesian => Ok(JointPose::new(raw.x, raw.y, raw.z)),
            Self::Morgan(arm) => arm.inverse_morgan(raw),
            Self::Mp(arm) => arm.inverse_mp(raw),
        }
    }

    /// Cartesian XY and joint angles the arm takes at its home switches.
    ///
    /// The Morgan home pose is computed from the home angles and then sent
    /// back through the inverse, so the returned joints are the ones the
    /// planner would derive for that Cartesian point.  The MP arm homes to
    /// a Cartesian position, given here by the per-axis home positions.
    pub fn home_pose(
        &self,
        cfg: &MachineConfig,
        z: f32,
    ) -> Result<(CartesianPose, JointPose), KinematicsError> {
        let k = &cfg.kinematics;
        match self {
            Self::Cartesian => {
                let pose = CartesianPose::new(cfg.axes.x.home_pos_mm, cfg.axes.y.home_pos_mm, z);
                Ok((pose, self.inverse(&pose)?))
            }
            Self::Morgan(arm) => {
                let homed = arm.forward(&JointPose::new(k.home_theta_deg, k.home_psi_deg, z));
                let joints = arm.inverse_morgan(&homed)?;
                Ok((arm.forward(&joints), joints))
            }
            Self::Mp(arm) => {
                let pose = CartesianPose::new(cfg.axes.x.home_pos_mm, cfg.axes.y.home_pos_mm, z);
                Ok((pose, arm.inverse_mp(&pose)?))
            }
        }
    }
}

/// Read-only projection of the planner's current actuator positions.
pub fn report_joint_positions<M: MotionPort + ?Sized>(motion: &M) -> JointPose {
    JointPose::new(
        motion.joint_position(JointAxis::Theta),
        motion.joint_position(JointAxis::Psi),
        motion.joint_position(JointAxis::Z),
    )
}
