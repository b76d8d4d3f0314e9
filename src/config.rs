//! Machine configuration parameters
//!
//! Every build-time toggle of classic printer firmware (geometry, homing
//! order, quick home, codependent XY, ...) is a runtime field here, so a
//! single binary serves several machine profiles.  Loaded once at startup
//! through [`ConfigPort`](crate::app::ports::ConfigPort) and read-only
//! afterwards.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::motion::{Axis, HomeDirection, PerAxis};

/// Arm geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Geometry {
    /// Independent linear X/Y/Z.
    Cartesian,
    /// Two-link arm, second angle absolute (shoulder + elbow). Homes by
    /// joint angle.
    MorganScara,
    /// Two-link arm with a Cartesian XY home position.
    MpScara,
}

impl Geometry {
    pub const fn is_scara(self) -> bool {
        matches!(self, Self::MorganScara | Self::MpScara)
    }
}

/// Two-link arm parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicsConfig {
    /// Shoulder-to-elbow link length (mm).
    pub l1_mm: f32,
    /// Elbow-to-tool link length (mm).
    pub l2_mm: f32,
    /// Cartesian position of the arm origin (mm).
    pub offset_x_mm: f32,
    pub offset_y_mm: f32,
    /// Shoulder angle at the home switch (degrees).
    pub home_theta_deg: f32,
    /// Absolute second-link angle at the home switch (degrees).
    pub home_psi_deg: f32,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            l1_mm: 150.0,
            l2_mm: 150.0,
            offset_x_mm: 100.0,
            offset_y_mm: -56.0,
            home_theta_deg: 90.0,
            home_psi_deg: 180.0,
        }
    }
}

/// Per-axis homing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    /// Which end of travel the endstop sits on.
    pub home_dir: HomeDirection,
    /// Usable travel (mm).  Homing moves overshoot this by 50 %.
    pub max_length_mm: f32,
    /// Logical coordinate assigned when the endstop triggers (mm).
    pub home_pos_mm: f32,
    /// Fast approach feedrate (mm/s, or deg/s for articulated joints).
    pub homing_feedrate_mm_s: f32,
    /// Driver current to use while homing (mA); `None` leaves it alone.
    pub homing_current_ma: Option<u16>,
    /// Retract distance before the slow re-approach; `0` disables the bump.
    pub home_bump_mm: f32,
    /// Slow re-approach runs at `homing_feedrate / bump_divisor`.
    pub bump_divisor: f32,
}

impl AxisConfig {
    const fn linear(max_length_mm: f32, homing_feedrate_mm_s: f32, home_bump_mm: f32) -> Self {
        Self {
            home_dir: HomeDirection::Min,
            max_length_mm,
            home_pos_mm: 0.0,
            homing_feedrate_mm_s,
            homing_current_ma: None,
            home_bump_mm,
            bump_divisor: 2.0,
        }
    }
}

/// Homing sequence policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomingConfig {
    /// Raise Z by this much before horizontal homing (mm). `0` disables.
    pub z_homing_height_mm: f32,
    /// With Z unknown, skip the pre-raise entirely.
    pub unknown_z_no_raise: bool,
    /// Pre-raise even when only Z is requested.
    pub z_safe_homing: bool,
    /// Home X and Y together with one combined move.
    pub quick_home: bool,
    /// Home Y before X when homing them individually.
    pub home_y_before_x: bool,
    /// Requesting either horizontal axis homes both.
    pub codependent_xy: bool,
    /// Deadline check period while polling the articulated rotation (ms).
    pub quick_home_poll_interval_ms: u32,
    /// Hard bound on one articulated rotation (ms).
    pub quick_home_timeout_ms: u32,
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            z_homing_height_mm: 10.0,
            unknown_z_no_raise: false,
            z_safe_homing: false,
            quick_home: true,
            home_y_before_x: false,
            codependent_xy: false,
            quick_home_poll_interval_ms: 1000,
            quick_home_timeout_ms: 30_000,
        }
    }
}

/// Complete machine profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig {
    pub geometry: Geometry,
    pub kinematics: KinematicsConfig,
    pub axes: PerAxis<AxisConfig>,
    pub homing: HomingConfig,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            geometry: Geometry::MorganScara,
            kinematics: KinematicsConfig::default(),
            axes: PerAxis::new(
                AxisConfig::linear(300.0, 50.0, 5.0),
                AxisConfig::linear(300.0, 50.0, 5.0),
                AxisConfig::linear(200.0, 4.0, 2.0),
            ),
            homing: HomingConfig::default(),
        }
    }
}

impl MachineConfig {
    pub fn axis(&self, axis: Axis) -> &AxisConfig {
        self.axes.get(axis)
    }

    /// Z homes away from the bed (toward Z max).
    pub fn z_homes_away_from_bed(&self) -> bool {
        self.axes.z.home_dir == HomeDirection::Max
    }

    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let k = &self.kinematics;
        if self.geometry.is_scara() {
            if !(k.l1_mm > 0.0 && k.l1_mm.is_finite()) {
                return Err(ConfigError::ValidationFailed("l1_mm must be > 0"));
            }
            if !(k.l2_mm > 0.0 && k.l2_mm.is_finite()) {
                return Err(ConfigError::ValidationFailed("l2_mm must be > 0"));
            }
            if !(k.offset_x_mm.is_finite() && k.offset_y_mm.is_finite()) {
                return Err(ConfigError::ValidationFailed("arm offset must be finite"));
            }
            if !(k.home_theta_deg.is_finite() && k.home_psi_deg.is_finite()) {
                return Err(ConfigError::ValidationFailed("home angles must be finite"));
            }
        }

        for axis in Axis::ALL {
            let a = self.axis(axis);
            if !(a.max_length_mm > 0.0 && a.max_length_mm.is_finite()) {
                return Err(ConfigError::ValidationFailed("max_length_mm must be > 0"));
            }
            if !(a.homing_feedrate_mm_s > 0.0 && a.homing_feedrate_mm_s.is_finite()) {
                return Err(ConfigError::ValidationFailed(
                    "homing_feedrate_mm_s must be > 0",
                ));
            }
            if !a.home_pos_mm.is_finite() {
                return Err(ConfigError::ValidationFailed("home_pos_mm must be finite"));
            }
            if !(0.0..=a.max_length_mm).contains(&a.home_bump_mm) {
                return Err(ConfigError::ValidationFailed(
                    "home_bump_mm must be 0..=max_length_mm",
                ));
            }
            if !(a.bump_divisor >= 1.0 && a.bump_divisor.is_finite()) {
                return Err(ConfigError::ValidationFailed("bump_divisor must be >= 1"));
            }
            if a.homing_current_ma == Some(0) {
                return Err(ConfigError::ValidationFailed(
                    "homing_current_ma must be > 0 when set",
                ));
            }
        }

        let h = &self.homing;
        if !(h.z_homing_height_mm >= 0.0 && h.z_homing_height_mm <= self.axes.z.max_length_mm) {
            return Err(ConfigError::ValidationFailed(
                "z_homing_height_mm must be 0..=z max_length_mm",
            ));
        }
        if h.quick_home_poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "quick_home_poll_interval_ms must be > 0",
            ));
        }
        if h.quick_home_poll_interval_ms >= h.quick_home_timeout_ms {
            return Err(ConfigError::ValidationFailed(
                "quick_home_poll_interval_ms must be < quick_home_timeout_ms",
            ));
        }
        Ok(())
    }
}
