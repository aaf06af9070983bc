//! YantraIO - Teleoperation control for a two-motor robot hub
//!
//! This library provides the control layer for a small battery-powered hub
//! with two drive motors, an optional distance sensor, and a wireless
//! handheld remote: bounded-retry pairing, a fixed-tick polling loop that
//! maps held buttons to motor duty-cycle commands, and a mock device suite
//! for hardware-free testing.
//!
//! ## Features
//!
//! - `mock`: Enable mock device simulation for hardware-free runs

pub mod app;
pub mod config;
pub mod core;
pub mod devices;
pub mod error;
pub mod pairing;
pub mod teleop;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use pairing::{PairingOutcome, PairingSequencer};
pub use teleop::{LoopState, TeleopLoop};
