//! Mock devices for hardware-free simulation and unit tests
//!
//! Every mock is a cheap `Clone` over shared inner state, so a test can
//! hand one copy to the control loop and keep another to script inputs
//! and inspect what the loop did to it afterwards.

use crate::core::hal::{
    Clock, DistanceSensor, DriveMotor, HubDevice, RemoteConnector, RemoteDevice,
};
use crate::core::types::{ButtonSet, Color, MotorCommand};
use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded indicator light event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LightEvent {
    /// Steady color set
    On(Color),
    /// Light turned off
    Off,
    /// Blink pattern started
    Blink(Color, Vec<u64>),
}

// ---------------------------------------------------------------------------
// Hub
// ---------------------------------------------------------------------------

struct HubInner {
    battery: u8,
    buttons: VecDeque<ButtonSet>,
    lights: Vec<LightEvent>,
    shut_down: bool,
}

/// Simulated hub with scripted button polls and recorded light events
#[derive(Clone)]
pub struct MockHub {
    inner: Arc<Mutex<HubInner>>,
}

impl MockHub {
    /// Create a hub reporting the given battery level
    pub fn new(battery: u8) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HubInner {
                battery,
                buttons: VecDeque::new(),
                lights: Vec::new(),
                shut_down: false,
            })),
        }
    }

    /// Queue the button set returned by the next poll
    ///
    /// Polls past the end of the script return an empty set.
    pub fn push_buttons(&self, set: ButtonSet) {
        self.inner.lock().unwrap().buttons.push_back(set);
    }

    /// All light events recorded so far
    pub fn light_events(&self) -> Vec<LightEvent> {
        self.inner.lock().unwrap().lights.clone()
    }

    /// Has `shutdown` been invoked?
    pub fn is_shut_down(&self) -> bool {
        self.inner.lock().unwrap().shut_down
    }
}

impl HubDevice for MockHub {
    fn battery_level(&mut self) -> Result<u8> {
        Ok(self.inner.lock().unwrap().battery)
    }

    fn pressed_buttons(&mut self) -> Result<ButtonSet> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.buttons.pop_front().unwrap_or(ButtonSet::EMPTY))
    }

    fn set_light(&mut self, color: Color) -> Result<()> {
        self.inner.lock().unwrap().lights.push(LightEvent::On(color));
        Ok(())
    }

    fn blink_light(&mut self, color: Color, pattern_ms: &[u64]) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .lights
            .push(LightEvent::Blink(color, pattern_ms.to_vec()));
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.inner.lock().unwrap().shut_down = true;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Motor
// ---------------------------------------------------------------------------

/// Simulated drive motor recording every command it receives
#[derive(Clone, Default)]
pub struct MockMotor {
    commands: Arc<Mutex<Vec<MotorCommand>>>,
}

impl MockMotor {
    /// Create a motor with an empty command log
    pub fn new() -> Self {
        Self::default()
    }

    /// Full command log, oldest first
    pub fn commands(&self) -> Vec<MotorCommand> {
        self.commands.lock().unwrap().clone()
    }

    /// Most recent command, if any
    pub fn last_command(&self) -> Option<MotorCommand> {
        self.commands.lock().unwrap().last().copied()
    }

    /// Forget recorded commands
    pub fn clear(&self) {
        self.commands.lock().unwrap().clear();
    }
}

impl DriveMotor for MockMotor {
    fn set_duty(&mut self, duty: i8) -> Result<()> {
        self.commands.lock().unwrap().push(MotorCommand::Duty(duty));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.commands.lock().unwrap().push(MotorCommand::Stop);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Distance sensor
// ---------------------------------------------------------------------------

struct SensorInner {
    samples: VecDeque<u32>,
    last: u32,
    reads: u32,
}

/// Simulated distance sensor with a scripted sample sequence
///
/// Reads consume the script one value at a time; once exhausted, the final
/// value repeats. The read counter lets tests check sampling cadence.
#[derive(Clone)]
pub struct MockDistanceSensor {
    inner: Arc<Mutex<SensorInner>>,
}

impl MockDistanceSensor {
    /// Create a sensor that steadily reads `distance`
    pub fn new(distance: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SensorInner {
                samples: VecDeque::new(),
                last: distance,
                reads: 0,
            })),
        }
    }

    /// Queue the value returned by the next read
    pub fn push_sample(&self, distance: u32) {
        self.inner.lock().unwrap().samples.push_back(distance);
    }

    /// Number of reads performed so far
    pub fn reads(&self) -> u32 {
        self.inner.lock().unwrap().reads
    }
}

impl DistanceSensor for MockDistanceSensor {
    fn distance(&mut self) -> Result<u32> {
        let mut inner = self.inner.lock().unwrap();
        inner.reads += 1;
        if let Some(sample) = inner.samples.pop_front() {
            inner.last = sample;
        }
        Ok(inner.last)
    }
}

// ---------------------------------------------------------------------------
// Remote
// ---------------------------------------------------------------------------

struct RemoteInner {
    buttons: VecDeque<ButtonSet>,
    lights: Vec<LightEvent>,
}

/// Simulated remote with scripted button polls and recorded light events
#[derive(Clone)]
pub struct MockRemote {
    inner: Arc<Mutex<RemoteInner>>,
}

impl MockRemote {
    /// Create a remote with no buttons held
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RemoteInner {
                buttons: VecDeque::new(),
                lights: Vec::new(),
            })),
        }
    }

    /// Queue the button set returned by the next poll
    ///
    /// Polls past the end of the script return an empty set.
    pub fn push_buttons(&self, set: ButtonSet) {
        self.inner.lock().unwrap().buttons.push_back(set);
    }

    /// All light events recorded so far
    pub fn light_events(&self) -> Vec<LightEvent> {
        self.inner.lock().unwrap().lights.clone()
    }
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteDevice for MockRemote {
    fn pressed_buttons(&mut self) -> Result<ButtonSet> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.buttons.pop_front().unwrap_or(ButtonSet::EMPTY))
    }

    fn set_light(&mut self, color: Color) -> Result<()> {
        self.inner.lock().unwrap().lights.push(LightEvent::On(color));
        Ok(())
    }

    fn light_off(&mut self) -> Result<()> {
        self.inner.lock().unwrap().lights.push(LightEvent::Off);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Connector
// ---------------------------------------------------------------------------

/// Connector that fails a scripted number of times before pairing
pub struct FlakyConnector {
    failures_before_success: Option<u32>,
    attempts: u32,
    remote: MockRemote,
}

impl FlakyConnector {
    /// Fail `failures` attempts, then succeed
    pub fn succeed_after(failures: u32) -> Self {
        Self {
            failures_before_success: Some(failures),
            attempts: 0,
            remote: MockRemote::new(),
        }
    }

    /// Fail every attempt
    pub fn always_fail() -> Self {
        Self {
            failures_before_success: None,
            attempts: 0,
            remote: MockRemote::new(),
        }
    }

    /// Number of connection attempts made so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Handle on the remote this connector will (or would) produce
    pub fn remote(&self) -> MockRemote {
        self.remote.clone()
    }
}

impl RemoteConnector for FlakyConnector {
    type Remote = MockRemote;

    fn connect(&mut self) -> Result<MockRemote> {
        self.attempts += 1;
        match self.failures_before_success {
            Some(failures) if self.attempts > failures => Ok(self.remote.clone()),
            _ => Err(Error::Device("remote out of range".to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Virtual clock recording every sleep instead of waiting
#[derive(Clone, Default)]
pub struct MockClock {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl MockClock {
    /// Create a clock with no recorded sleeps
    pub fn new() -> Self {
        Self::default()
    }

    /// All sleeps recorded so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    /// Total virtual time slept
    pub fn total_slept(&self) -> Duration {
        self.sleeps.lock().unwrap().iter().sum()
    }
}

impl Clock for MockClock {
    fn sleep(&mut self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

// ---------------------------------------------------------------------------
// Suite
// ---------------------------------------------------------------------------

/// Complete mock device suite built from configuration
pub struct MockSuite {
    pub hub: MockHub,
    pub left_motor: MockMotor,
    pub right_motor: MockMotor,
    pub sensor: Option<MockDistanceSensor>,
    pub connector: FlakyConnector,
}

/// Build the full mock suite the binary runs against
pub fn create_suite(config: &crate::config::Config) -> MockSuite {
    let mock = &config.mock;
    MockSuite {
        hub: MockHub::new(mock.battery_level),
        left_motor: MockMotor::new(),
        right_motor: MockMotor::new(),
        sensor: config
            .sensor
            .enabled
            .then(|| MockDistanceSensor::new(mock.distance)),
        connector: FlakyConnector::succeed_after(mock.connect_failures),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Button;

    #[test]
    fn test_hub_button_script_then_empty() {
        let mut hub = MockHub::new(90);
        hub.push_buttons(ButtonSet::new().with(Button::Center));

        assert!(hub.pressed_buttons().unwrap().contains(Button::Center));
        assert!(hub.pressed_buttons().unwrap().is_empty());
    }

    #[test]
    fn test_motor_records_commands() {
        let mut motor = MockMotor::new();
        motor.set_duty(60).unwrap();
        motor.set_duty(-60).unwrap();
        motor.stop().unwrap();

        assert_eq!(
            motor.commands(),
            vec![
                MotorCommand::Duty(60),
                MotorCommand::Duty(-60),
                MotorCommand::Stop
            ]
        );
        assert_eq!(motor.last_command(), Some(MotorCommand::Stop));
    }

    #[test]
    fn test_sensor_repeats_last_sample_when_script_runs_out() {
        let mut sensor = MockDistanceSensor::new(100);
        sensor.push_sample(30);

        assert_eq!(sensor.distance().unwrap(), 30);
        assert_eq!(sensor.distance().unwrap(), 30);
        assert_eq!(sensor.reads(), 2);
    }

    #[test]
    fn test_flaky_connector_counts_attempts() {
        let mut connector = FlakyConnector::succeed_after(2);
        assert!(connector.connect().is_err());
        assert!(connector.connect().is_err());
        assert!(connector.connect().is_ok());
        assert_eq!(connector.attempts(), 3);
    }

    #[test]
    fn test_mock_clock_accumulates() {
        let mut clock = MockClock::new();
        clock.sleep(Duration::from_millis(100));
        clock.sleep(Duration::from_millis(250));
        assert_eq!(clock.total_slept(), Duration::from_millis(350));
    }
}
