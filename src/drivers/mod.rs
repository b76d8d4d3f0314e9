//! Peripheral drivers.

pub mod endstop;
