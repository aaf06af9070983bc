//! Configuration for the YantraIO teleop application
//!
//! Loads configuration from a TOML file. Every section and field has a
//! default, so a partial file (or no file at all) yields a runnable
//! configuration matching the stock robot behavior.

use crate::core::types::Color;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub pairing: PairingConfig,
    #[serde(default)]
    pub teleop: TeleopConfig,
    #[serde(default)]
    pub drive: DriveConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub mock: MockConfig,
}

/// Remote pairing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PairingConfig {
    /// Maximum number of connection attempts
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    /// Wait before each attempt, milliseconds
    #[serde(default = "default_retry_wait_ms")]
    pub retry_wait_ms: u64,
    /// Wait after declaring the remote unreachable, before exiting
    #[serde(default = "default_failure_cooldown_ms")]
    pub failure_cooldown_ms: u64,
}

/// Control loop timing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TeleopConfig {
    /// Polling period, milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Delay between the farewell and the hub power-off
    #[serde(default = "default_shutdown_delay_ms")]
    pub shutdown_delay_ms: u64,
}

/// Drive power configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DriveConfig {
    /// Power level at startup, percent (20-100)
    #[serde(default = "default_initial_power")]
    pub initial_power: u8,
    /// Ratchet increment per boost press
    #[serde(default = "default_power_step")]
    pub power_step: u8,
    /// Power level the ratchet wraps back to
    #[serde(default = "default_power_wrap")]
    pub power_wrap: u8,
    /// Ceiling above which the ratchet wraps
    #[serde(default = "default_power_max")]
    pub power_max: u8,
    /// Color flashed during the boost feedback sequence
    ///
    /// Violet on current remotes; older revisions used blue.
    #[serde(default = "default_boost_flash_color")]
    pub boost_flash_color: Color,
    /// On/off duration of each boost feedback blink, milliseconds
    #[serde(default = "default_boost_blink_ms")]
    pub boost_blink_ms: u64,
}

/// Distance sensor configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SensorConfig {
    /// Whether a distance sensor is fitted
    #[serde(default = "default_sensor_enabled")]
    pub enabled: bool,
    /// Re-sample the sensor every N ticks; cached in between
    #[serde(default = "default_sample_every_ticks")]
    pub sample_every_ticks: u64,
    /// Forward motion is cut when the cached sample drops below this
    #[serde(default = "default_stop_threshold")]
    pub stop_threshold: u32,
    /// Duration of the danger flash on the remote light, milliseconds
    #[serde(default = "default_danger_flash_ms")]
    pub danger_flash_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Mock device suite configuration (used when running with the `mock` feature)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MockConfig {
    /// Simulated battery charge level, percent
    #[serde(default = "default_mock_battery")]
    pub battery_level: u8,
    /// Connection attempts that fail before the mock remote pairs
    #[serde(default)]
    pub connect_failures: u32,
    /// Steady distance reading of the mock sensor, sensor units
    #[serde(default = "default_mock_distance")]
    pub distance: u32,
}

fn default_attempts() -> u32 {
    5
}
fn default_retry_wait_ms() -> u64 {
    1000
}
fn default_failure_cooldown_ms() -> u64 {
    3000
}
fn default_tick_ms() -> u64 {
    100
}
fn default_shutdown_delay_ms() -> u64 {
    500
}
fn default_initial_power() -> u8 {
    60
}
fn default_power_step() -> u8 {
    20
}
fn default_power_wrap() -> u8 {
    40
}
fn default_power_max() -> u8 {
    100
}
fn default_boost_flash_color() -> Color {
    Color::Violet
}
fn default_boost_blink_ms() -> u64 {
    100
}
fn default_sensor_enabled() -> bool {
    false
}
fn default_sample_every_ticks() -> u64 {
    5
}
fn default_stop_threshold() -> u32 {
    50
}
fn default_danger_flash_ms() -> u64 {
    100
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_mock_battery() -> u8 {
    85
}
fn default_mock_distance() -> u32 {
    200
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            retry_wait_ms: default_retry_wait_ms(),
            failure_cooldown_ms: default_failure_cooldown_ms(),
        }
    }
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            shutdown_delay_ms: default_shutdown_delay_ms(),
        }
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            initial_power: default_initial_power(),
            power_step: default_power_step(),
            power_wrap: default_power_wrap(),
            power_max: default_power_max(),
            boost_flash_color: default_boost_flash_color(),
            boost_blink_ms: default_boost_blink_ms(),
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            enabled: default_sensor_enabled(),
            sample_every_ticks: default_sample_every_ticks(),
            stop_threshold: default_stop_threshold(),
            danger_flash_ms: default_danger_flash_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            battery_level: default_mock_battery(),
            connect_failures: 0,
            distance: default_mock_distance(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints the type system cannot express
    pub fn validate(&self) -> Result<()> {
        if self.pairing.attempts == 0 {
            return Err(Error::InvalidParameter(
                "pairing.attempts must be at least 1".to_string(),
            ));
        }
        if self.teleop.tick_ms == 0 {
            return Err(Error::InvalidParameter(
                "teleop.tick_ms must be nonzero".to_string(),
            ));
        }
        if self.sensor.sample_every_ticks == 0 {
            return Err(Error::InvalidParameter(
                "sensor.sample_every_ticks must be nonzero".to_string(),
            ));
        }
        if self.drive.power_step == 0 {
            return Err(Error::InvalidParameter(
                "drive.power_step must be nonzero".to_string(),
            ));
        }
        if !(20..=100).contains(&self.drive.initial_power) {
            return Err(Error::InvalidParameter(format!(
                "drive.initial_power must be in 20..=100, got {}",
                self.drive.initial_power
            )));
        }
        if self.drive.power_max > 100 || self.drive.power_wrap < 20 {
            return Err(Error::InvalidParameter(
                "drive power range must stay within 20..=100".to_string(),
            ));
        }
        if self.drive.power_wrap > self.drive.power_max {
            return Err(Error::InvalidParameter(
                "drive.power_wrap must not exceed drive.power_max".to_string(),
            ));
        }
        Ok(())
    }
}
