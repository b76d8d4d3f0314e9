//! Application core: pure domain logic, zero I/O.
//!
//! Homing orchestration and kinematic moves live behind the
//! [`MotionService`](service::MotionService).  All interaction with the
//! planner, endstops and drivers happens through the **port traits** in
//! [`ports`], so this layer runs unchanged against mock hardware.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
