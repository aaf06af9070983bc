//! Hardware abstraction traits
//!
//! The vendor platform owns the hard parts (wireless pairing, PWM, device
//! firmware); these traits are the seam the control logic talks through,
//! so the same loop runs against real hardware or the mock suite.

use crate::core::types::{ButtonSet, Color};
use crate::error::Result;
use std::time::Duration;

/// Onboard hub controller
pub trait HubDevice {
    /// Battery charge level (0-100%), read once at startup
    fn battery_level(&mut self) -> Result<u8>;

    /// Currently held hub buttons
    fn pressed_buttons(&mut self) -> Result<ButtonSet>;

    /// Set the status light to a steady color
    fn set_light(&mut self, color: Color) -> Result<()>;

    /// Start a blink pattern on the status light
    ///
    /// `pattern_ms` alternates on/off durations in milliseconds. The pattern
    /// runs on the hub itself and does not block the caller.
    fn blink_light(&mut self, color: Color, pattern_ms: &[u64]) -> Result<()>;

    /// Power the hub down
    fn shutdown(&mut self) -> Result<()>;
}

/// Single drive motor channel
pub trait DriveMotor {
    /// Command a signed duty cycle, -100..=100 percent
    fn set_duty(&mut self, duty: i8) -> Result<()>;

    /// Stop the motor
    fn stop(&mut self) -> Result<()>;
}

/// Distance sensor returning samples in sensor units
pub trait DistanceSensor {
    /// Read the current distance
    fn distance(&mut self) -> Result<u32>;
}

/// Paired handheld remote
pub trait RemoteDevice {
    /// Currently held remote buttons
    fn pressed_buttons(&mut self) -> Result<ButtonSet>;

    /// Set the indicator light to a steady color
    fn set_light(&mut self, color: Color) -> Result<()>;

    /// Turn the indicator light off
    fn light_off(&mut self) -> Result<()>;
}

/// Connection factory for the remote
///
/// A successful `connect` hands ownership of the paired remote to the
/// caller; failure surfaces as an error after the platform's own bounded
/// search timeout.
pub trait RemoteConnector {
    /// Remote handle type produced on success
    type Remote: RemoteDevice;

    /// Attempt to pair with exactly one remote
    fn connect(&mut self) -> Result<Self::Remote>;
}

/// Fixed-duration wait primitive
///
/// The only suspension point in the system: loop pacing, pairing retry
/// spacing, and light sequencing all go through it, which lets tests
/// observe every wait.
pub trait Clock {
    /// Sleep for the given duration
    fn sleep(&mut self, duration: Duration);
}

/// Real wall-clock implementation of [`Clock`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
