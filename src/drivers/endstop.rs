//! Endstop switch driver over `embedded-hal` digital inputs.
//!
//! ## Hardware
//!
//! One mechanical (or sensorless DIAG) switch per axis.  Normally-open
//! switches with a pull-up read low when pressed; normally-closed ones read
//! high.  [`Polarity`] maps the pin level to "triggered".
//!
//! ## Latching
//!
//! Whatever drives the steppers calls [`EndstopMonitor::sample`] while
//! motion runs.  While armed, every sample ORs triggered axes into a latch.
//! A hit stays latched until [`EndstopMonitor::validate`] consumes it, so a
//! short press is not lost once it has been seen, and a switch that is
//! merely resting pressed between moves does not re-latch on its own.

use embedded_hal::digital::InputPin;
use log::warn;

use crate::motion::{Axis, AxisFlags, PerAxis};

/// Pin level that means "switch pressed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

pub struct SwitchEndstop<P> {
    pin: P,
    polarity: Polarity,
}

impl<P: InputPin> SwitchEndstop<P> {
    pub fn new(pin: P, polarity: Polarity) -> Self {
        Self { pin, polarity }
    }

    pub fn is_triggered(&mut self) -> Result<bool, P::Error> {
        let high = self.pin.is_high()?;
        Ok(match self.polarity {
            Polarity::ActiveHigh => high,
            Polarity::ActiveLow => !high,
        })
    }
}

/// All axis switches plus the homing latch.
pub struct EndstopMonitor<P> {
    switches: PerAxis<SwitchEndstop<P>>,
    armed: bool,
    latched: AxisFlags,
}

impl<P: InputPin> EndstopMonitor<P> {
    pub fn new(switches: PerAxis<SwitchEndstop<P>>) -> Self {
        Self {
            switches,
            armed: false,
            latched: AxisFlags::NONE,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Arming or disarming clears any stale latch.
    pub fn arm(&mut self, enabled: bool) {
        self.armed = enabled;
        self.latched = AxisFlags::NONE;
    }

    /// Read every switch; latch hits while armed.  Returns the live
    /// (unlatched) state.
    ///
    /// A pin read error counts as triggered so a broken input stops motion
    /// instead of letting it run into the frame.
    pub fn sample(&mut self) -> AxisFlags {
        let mut live = AxisFlags::NONE;
        for axis in Axis::ALL {
            let hit = self.switches.get_mut(axis).is_triggered().unwrap_or_else(|_| {
                warn!("{axis} endstop read failed, treating as triggered");
                true
            });
            if hit {
                live.insert(axis);
            }
        }
        if self.armed {
            for axis in Axis::ALL {
                if live.contains(axis) {
                    self.latched.insert(axis);
                }
            }
        }
        live
    }

    /// Any axis latched since it was last validated.
    pub fn check_triggered(&self) -> bool {
        !self.latched.is_empty()
    }

    pub fn latched(&self) -> AxisFlags {
        self.latched
    }

    /// Whether `axis` latched; consumes that axis's latch.
    pub fn validate(&mut self, axis: Axis) -> bool {
        let hit = self.latched.contains(axis);
        self.latched.remove(axis);
        hit
    }
}
