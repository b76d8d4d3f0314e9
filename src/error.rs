//! Unified error types for the motion core.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! dispatcher's error handling uniform.  All variants are `Copy` so they can
//! be carried through the homing session and emitted as events without
//! allocation.

use core::fmt;

use crate::motion::Axis;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the motion core funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// A homing pass failed.
    Homing(HomingError),
    /// A coordinate transform could not be solved.
    Kinematics(KinematicsError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
    /// A command carried arguments that cannot be executed.
    InvalidCommand(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Homing(e) => write!(f, "homing: {e}"),
            Self::Kinematics(e) => write!(f, "kinematics: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::InvalidCommand(msg) => write!(f, "invalid command: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Kinematics errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KinematicsError {
    /// The target lies outside the annulus `[|L1-L2|, L1+L2]` around the
    /// arm origin (or on the origin itself, where the shoulder angle is
    /// undefined).
    Unreachable {
        /// Distance from the arm origin to the (offset-corrected) target.
        radius_mm: f32,
        min_mm: f32,
        max_mm: f32,
    },
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable {
                radius_mm,
                min_mm,
                max_mm,
            } => write!(
                f,
                "target unreachable: radius {radius_mm:.3}mm outside [{min_mm:.3}, {max_mm:.3}]"
            ),
        }
    }
}

impl From<KinematicsError> for Error {
    fn from(e: KinematicsError) -> Self {
        Self::Kinematics(e)
    }
}

// ---------------------------------------------------------------------------
// Homing errors
// ---------------------------------------------------------------------------

/// Homing failures.  Every variant aborts the current pass; the sequencer
/// restores motor currents and disarms the endstops before returning it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HomingError {
    /// The homing move completed without the axis endstop triggering.
    /// Treated as a mechanical fault and never retried.
    EndstopNotTriggered(Axis),
    /// The articulated quick-home rotation polled past its hard deadline.
    QuickHomeTimeout { axis: Axis, elapsed_ms: u64 },
    /// The configured home position could not be mapped through the arm.
    Kinematics(KinematicsError),
}

impl fmt::Display for HomingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndstopNotTriggered(axis) => write!(f, "{axis} endstop not triggered"),
            Self::QuickHomeTimeout { axis, elapsed_ms } => {
                write!(f, "{axis} quick-home rotation timed out after {elapsed_ms}ms")
            }
            Self::Kinematics(e) => write!(f, "home position: {e}"),
        }
    }
}

impl From<KinematicsError> for HomingError {
    fn from(e: KinematicsError) -> Self {
        Self::Kinematics(e)
    }
}

impl From<HomingError> for Error {
    fn from(e: HomingError) -> Self {
        Self::Homing(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from [`ConfigPort`](crate::app::ports::ConfigPort) operations and
/// [`MachineConfig::validate`](crate::config::MachineConfig::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Corrupted => Self::Config("corrupted"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
            ConfigError::IoError => Self::Config("I/O error"),
        }
    }
}

impl core::error::Error for Error {}
impl core::error::Error for HomingError {}
impl core::error::Error for KinematicsError {}
impl core::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
