//! Fixed-tick teleoperation control loop
//!
//! Polls the remote and hub button sets every tick, applies exactly one
//! movement branch per tick, ratchets the shared power level on the boost
//! button, and shuts the hub down on the center-button gesture. All mutable
//! loop state lives on the loop struct itself.

pub mod drive;

use crate::config::Config;
use crate::core::hal::{Clock, DistanceSensor, DriveMotor, HubDevice, RemoteDevice};
use crate::core::types::{Button, Color, DriveCommand};
use crate::error::Result;
use self::drive::{resolve_drive, Ratchet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Control loop state; `Shutdown` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Shutdown,
}

/// Timing and threshold settings extracted from [`Config`]
#[derive(Debug, Clone)]
struct LoopSettings {
    tick_period: Duration,
    shutdown_delay: Duration,
    sample_every_ticks: u64,
    stop_threshold: u32,
    danger_flash: Duration,
    boost_blink: Duration,
    boost_flash_color: Color,
}

impl LoopSettings {
    fn from_config(config: &Config) -> Self {
        Self {
            tick_period: Duration::from_millis(config.teleop.tick_ms),
            shutdown_delay: Duration::from_millis(config.teleop.shutdown_delay_ms),
            sample_every_ticks: config.sensor.sample_every_ticks,
            stop_threshold: config.sensor.stop_threshold,
            danger_flash: Duration::from_millis(config.sensor.danger_flash_ms),
            boost_blink: Duration::from_millis(config.drive.boost_blink_ms),
            boost_flash_color: config.drive.boost_flash_color,
        }
    }
}

/// Teleop control loop owning the device handles and all loop state
pub struct TeleopLoop<H, M, S, R, K>
where
    H: HubDevice,
    M: DriveMotor,
    S: DistanceSensor,
    R: RemoteDevice,
    K: Clock,
{
    hub: H,
    left_motor: M,
    right_motor: M,
    sensor: Option<S>,
    remote: R,
    clock: K,
    settings: LoopSettings,
    ratchet: Ratchet,
    power: u8,
    tick: u64,
    cached_distance: Option<u32>,
    stop_flag: Option<Arc<AtomicBool>>,
    state: LoopState,
}

impl<H, M, S, R, K> TeleopLoop<H, M, S, R, K>
where
    H: HubDevice,
    M: DriveMotor,
    S: DistanceSensor,
    R: RemoteDevice,
    K: Clock,
{
    /// Build a loop from connected devices and configuration
    pub fn new(
        hub: H,
        left_motor: M,
        right_motor: M,
        sensor: Option<S>,
        remote: R,
        clock: K,
        config: &Config,
    ) -> Self {
        Self {
            hub,
            left_motor,
            right_motor,
            sensor,
            remote,
            clock,
            settings: LoopSettings::from_config(config),
            ratchet: Ratchet::from_config(&config.drive),
            power: config.drive.initial_power,
            tick: 0,
            cached_distance: None,
            stop_flag: None,
            state: LoopState::Running,
        }
    }

    /// Observe an external stop flag each tick (set by the Ctrl-C handler)
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    /// Current power level, percent
    pub fn power(&self) -> u8 {
        self.power
    }

    /// Current loop state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of completed ticks
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Run until the shutdown gesture, pacing with the tick period
    pub fn run(&mut self) -> Result<()> {
        log::info!("Teleop loop running at {:?} per tick", self.settings.tick_period);
        while self.step()? == LoopState::Running {
            let period = self.settings.tick_period;
            self.clock.sleep(period);
        }
        Ok(())
    }

    /// Execute one tick of the loop
    ///
    /// Returns the state after the tick; once `Shutdown` is reached further
    /// calls are no-ops and no motor commands are issued.
    pub fn step(&mut self) -> Result<LoopState> {
        if self.state == LoopState::Shutdown {
            return Ok(LoopState::Shutdown);
        }

        let pressed = self.remote.pressed_buttons()?;
        let hub_pressed = self.hub.pressed_buttons()?;

        self.sample_distance()?;
        self.apply_drive(resolve_drive(pressed))?;

        if pressed.contains(Button::Left) {
            self.boost()?;
        }

        let stop_requested = self
            .stop_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed));

        if hub_pressed.contains(Button::Center) || stop_requested {
            log::info!("Bye bye!");
            self.clock.sleep(self.settings.shutdown_delay);
            if !stop_requested {
                // Center press powers the hub off; an external stop only
                // leaves the loop.
                self.hub.shutdown()?;
            }
            self.state = LoopState::Shutdown;
        }

        self.tick += 1;
        Ok(self.state)
    }

    /// Re-sample the distance sensor on tick indices divisible by N;
    /// the cached value is reused in between even if the sensor moves.
    fn sample_distance(&mut self) -> Result<()> {
        if let Some(sensor) = self.sensor.as_mut() {
            if self.tick % self.settings.sample_every_ticks == 0 {
                let distance = sensor.distance()?;
                log::debug!("Distance sample: {} units", distance);
                self.cached_distance = Some(distance);
            }
        }
        Ok(())
    }

    fn apply_drive(&mut self, command: DriveCommand) -> Result<()> {
        let duty = self.power as i8;
        match command {
            DriveCommand::TurnRight => {
                self.left_motor.set_duty(duty)?;
                self.right_motor.set_duty(-duty)?;
            }
            DriveCommand::TurnLeft => {
                self.left_motor.set_duty(-duty)?;
                self.right_motor.set_duty(duty)?;
            }
            DriveCommand::Forward => {
                if self.forward_blocked() {
                    self.left_motor.stop()?;
                    self.right_motor.stop()?;
                    self.flash_danger()?;
                } else {
                    self.left_motor.set_duty(duty)?;
                    self.right_motor.set_duty(duty)?;
                }
            }
            DriveCommand::Backward => {
                self.left_motor.set_duty(-duty)?;
                self.right_motor.set_duty(-duty)?;
            }
            DriveCommand::Idle => {
                self.left_motor.stop()?;
                self.right_motor.stop()?;
            }
        }
        Ok(())
    }

    /// Forward motion is gated by the cached sample, not a fresh read
    fn forward_blocked(&self) -> bool {
        matches!(self.cached_distance, Some(d) if d < self.settings.stop_threshold)
    }

    fn flash_danger(&mut self) -> Result<()> {
        log::warn!(
            "Obstacle below {} units, forward motion cut",
            self.settings.stop_threshold
        );
        self.remote.set_light(Color::Red)?;
        self.clock.sleep(self.settings.danger_flash);
        self.remote.set_light(Color::Green)?;
        Ok(())
    }

    /// Ratchet the power level and play the blink feedback on the remote
    fn boost(&mut self) -> Result<()> {
        self.power = self.ratchet.apply(self.power);
        log::info!("Motor power = {}", self.power);

        let blinks = self.power / self.ratchet.step;
        for _ in 0..blinks {
            self.clock.sleep(self.settings.boost_blink);
            self.remote.set_light(self.settings.boost_flash_color)?;
            self.clock.sleep(self.settings.boost_blink);
            self.remote.light_off()?;
        }
        self.remote.set_light(Color::Green)?;
        Ok(())
    }
}
