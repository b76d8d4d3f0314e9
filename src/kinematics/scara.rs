//! Two-link (SCARA) arm transforms.
//!
//! ```text
//!              tool
//!               *
//!         L2   /
//!             /  psi (absolute)
//!   elbow    *----------
//!           /
//!      L1  /  theta
//!         /
//!  origin *------------      origin = (offset_x, offset_y)
//! ```
//!
//! Both link angles are measured from the +X axis.  The Morgan arm names
//! the second actuator position `psi = theta + elbow`; the MP arm solves the
//! same triangle from the tool side.

use crate::config::KinematicsConfig;
use crate::error::KinematicsError;
use crate::motion::{CartesianPose, JointPose};

/// Slack on the reachable annulus so targets placed exactly on the
/// boundary by forward kinematics are not rejected for rounding.
const REACH_EPSILON_MM: f32 = 1e-3;

/// Which of the two triangle solutions the inverse transform returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElbowConfig {
    /// Elbow angle and shoulder auxiliary angle both positive.
    Up,
    /// Both negated; keeps the arm from folding through the base when
    /// reaching into the `+X, -Y` quadrant.
    Down,
}

impl ElbowConfig {
    /// Quadrant predicate used by the Morgan arm.
    ///
    /// Evaluated on the *raw* target, before the arm offset is removed.
    /// This only matches first principles for offsets that keep the arm
    /// origin near the Cartesian origin; machines with large offsets should
    /// be checked against their own envelope.
    pub fn for_target(raw: &CartesianPose) -> Self {
        if raw.x > 0.0 && raw.y < 0.0 {
            Self::Down
        } else {
            Self::Up
        }
    }

    const fn sign(self) -> f32 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
        }
    }
}

/// Two-link arm solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaraArm {
    cfg: KinematicsConfig,
}

impl ScaraArm {
    pub fn new(cfg: KinematicsConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &KinematicsConfig {
        &self.cfg
    }

    /// Radii `(min, max)` of the reachable annulus around the arm origin.
    pub fn reach(&self) -> (f32, f32) {
        let (l1, l2) = (self.cfg.l1_mm, self.cfg.l2_mm);
        ((l1 - l2).abs(), l1 + l2)
    }

    /// Whether `raw` can be reached by any elbow configuration.
    pub fn is_reachable(&self, raw: &CartesianPose) -> bool {
        self.check_reach(raw).is_ok()
    }

    /// Joint angles (degrees) to Cartesian XY.  Z passes through.
    pub fn forward(&self, joints: &JointPose) -> CartesianPose {
        let (a_sin, a_cos) = joints.theta.to_radians().sin_cos();
        let (b_sin, b_cos) = joints.psi.to_radians().sin_cos();
        CartesianPose::new(
            a_cos * self.cfg.l1_mm + b_cos * self.cfg.l2_mm + self.cfg.offset_x_mm,
            a_sin * self.cfg.l1_mm + b_sin * self.cfg.l2_mm + self.cfg.offset_y_mm,
            joints.z,
        )
    }

    /// Morgan inverse: law of cosines with the elbow branch picked by
    /// [`ElbowConfig::for_target`].
    pub fn inverse_morgan(&self, raw: &CartesianPose) -> Result<JointPose, KinematicsError> {
        self.inverse_morgan_with(raw, ElbowConfig::for_target(raw))
    }

    /// Morgan inverse with an explicit elbow configuration.
    pub fn inverse_morgan_with(
        &self,
        raw: &CartesianPose,
        elbow: ElbowConfig,
    ) -> Result<JointPose, KinematicsError> {
        let (sx, sy, h2) = self.check_reach(raw)?;
        let (l1, l2) = (self.cfg.l1_mm, self.cfg.l2_mm);

        let e = elbow.sign() * acos_clamped((h2 - l1 * l1 - l2 * l2) / (2.0 * l1 * l2));
        let q = elbow.sign() * acos_clamped((h2 + l1 * l1 - l2 * l2) / (2.0 * l1 * h2.sqrt()));
        let s = sy.atan2(sx) - q;

        let theta = s.to_degrees();
        Ok(JointPose::new(theta, theta + e.to_degrees(), raw.z))
    }

    /// MP inverse: both link angles absolute, solved from the shoulder and
    /// tool corners of the triangle.
    pub fn inverse_mp(&self, raw: &CartesianPose) -> Result<JointPose, KinematicsError> {
        let (sx, sy, h2) = self.check_reach(raw)?;
        let (l1, l2) = (self.cfg.l1_mm, self.cfg.l2_mm);
        let c = h2.sqrt();

        let theta3 = sy.atan2(sx);
        let theta1 = theta3 + acos_clamped((h2 + l1 * l1 - l2 * l2) / (2.0 * c * l1));
        let theta2 = theta3 - acos_clamped((h2 + l2 * l2 - l1 * l1) / (2.0 * c * l2));

        Ok(JointPose::new(theta1.to_degrees(), theta2.to_degrees(), raw.z))
    }

    /// Offset-corrected target and its squared radius, or `Unreachable`.
    fn check_reach(&self, raw: &CartesianPose) -> Result<(f32, f32, f32), KinematicsError> {
        let sx = raw.x - self.cfg.offset_x_mm;
        let sy = raw.y - self.cfg.offset_y_mm;
        let h2 = sx * sx + sy * sy;
        let radius = h2.sqrt();
        let (min, max) = self.reach();

        let unreachable = || KinematicsError::Unreachable {
            radius_mm: radius,
            min_mm: min,
            max_mm: max,
        };

        // NaN fails every comparison, so it lands here too.
        if !(radius > REACH_EPSILON_MM) {
            return Err(unreachable());
        }
        if !(radius >= min - REACH_EPSILON_MM && radius <= max + REACH_EPSILON_MM) {
            return Err(unreachable());
        }
        Ok((sx, sy, h2))
    }
}

/// `acos` restricted to its domain; callers have already rejected targets
/// outside the annulus, so clamping only absorbs rounding.
fn acos_clamped(v: f32) -> f32 {
    v.clamp(-1.0, 1.0).acos()
}
