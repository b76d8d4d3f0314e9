//! Shared motion data model: axes, per-axis maps, axis sets and poses.
//!
//! Everything here is plain `Copy` data.  The only mutable machine state
//! lives in [`state::MotionState`], which is passed by `&mut` to whichever
//! component currently owns motion.

pub mod pose;
pub mod state;

use core::fmt;

use serde::{Deserialize, Serialize};

pub use pose::{CartesianPose, JointAxis, JointPose};
pub use state::MotionState;

// ---------------------------------------------------------------------------
// Axis identity
// ---------------------------------------------------------------------------

/// The machine's linear axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    /// Total number of linear axes.
    pub const COUNT: usize = 3;

    /// All axes in index order.
    pub const ALL: [Axis; Axis::COUNT] = [Axis::X, Axis::Y, Axis::Z];

    /// Bit used for this axis in [`AxisFlags`].
    pub const fn mask(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
            Self::Z => write!(f, "Z"),
        }
    }
}

/// Direction an axis travels to reach its endstop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HomeDirection {
    /// Toward the axis minimum (for Z: toward the bed).
    Min,
    /// Toward the axis maximum (for Z: away from the bed).
    Max,
}

impl HomeDirection {
    /// `-1.0` for [`Min`](Self::Min), `+1.0` for [`Max`](Self::Max).
    pub const fn sign(self) -> f32 {
        match self {
            Self::Min => -1.0,
            Self::Max => 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-axis map
// ---------------------------------------------------------------------------

/// One value per linear axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerAxis<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T> PerAxis<T> {
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, axis: Axis) -> &T {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    pub fn get_mut(&mut self, axis: Axis) -> &mut T {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }
}

impl<T: Copy> PerAxis<T> {
    pub const fn splat(v: T) -> Self {
        Self { x: v, y: v, z: v }
    }
}

// ---------------------------------------------------------------------------
// Axis flag set
// ---------------------------------------------------------------------------

/// Compact bitset over [`Axis`] (used for "position known" and "homed in
/// this pass").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisFlags(u8);

impl AxisFlags {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b111);

    pub const fn contains(self, axis: Axis) -> bool {
        self.0 & axis.mask() != 0
    }

    pub fn insert(&mut self, axis: Axis) {
        self.0 |= axis.mask();
    }

    pub fn remove(&mut self, axis: Axis) {
        self.0 &= !axis.mask();
    }

    pub const fn is_all(self) -> bool {
        self.0 & Self::ALL.0 == Self::ALL.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl fmt::Display for AxisFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for axis in Axis::ALL {
            if self.contains(axis) {
                write!(f, "{axis}")?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Requested axis set
// ---------------------------------------------------------------------------

/// The axes named by the caller of a homing command.
///
/// Only the raw "requested" flags are stored.  [`home_all`](Self::home_all)
/// and [`do_axis`](Self::do_axis) are always derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisSet {
    requested: AxisFlags,
}

impl AxisSet {
    /// No axis named: the all-or-none rule homes everything.
    pub const fn none() -> Self {
        Self {
            requested: AxisFlags::NONE,
        }
    }

    pub fn of(axes: &[Axis]) -> Self {
        let mut requested = AxisFlags::NONE;
        for &axis in axes {
            requested.insert(axis);
        }
        Self { requested }
    }

    pub fn with(mut self, axis: Axis) -> Self {
        self.requested.insert(axis);
        self
    }

    pub const fn is_requested(&self, axis: Axis) -> bool {
        self.requested.contains(axis)
    }

    /// True iff every flag is equal, i.e. either no axis or every axis was
    /// named.
    pub const fn home_all(&self) -> bool {
        let bits = self.requested.bits();
        bits == 0 || bits == AxisFlags::ALL.bits()
    }

    /// `home_all || requested[axis]`.
    pub const fn do_axis(&self, axis: Axis) -> bool {
        self.home_all() || self.is_requested(axis)
    }

    /// The derived `do_axis` flags as a set.
    pub fn effective(&self) -> AxisFlags {
        let mut flags = AxisFlags::NONE;
        for axis in Axis::ALL {
            if self.do_axis(axis) {
                flags.insert(axis);
            }
        }
        flags
    }
}
