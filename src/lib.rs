//! SCARA motion core: homing sequencer and arm kinematics.
//!
//! Exposes the pure-logic modules for integration testing and for the host
//! simulation binary.  All hardware access goes through the port traits in
//! [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod homing;
pub mod kinematics;
pub mod motion;

pub use error::{Error, Result};
