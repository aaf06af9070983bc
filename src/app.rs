//! Application orchestration: startup, pairing, loop entry
//!
//! Mirrors the power-on sequence of the stock robot: read the battery once,
//! blink the hub light while searching for the remote, then either enter
//! the teleop loop or indicate failure and exit.

use crate::config::Config;
use crate::core::hal::{Clock, DistanceSensor, DriveMotor, HubDevice, RemoteConnector, RemoteDevice};
use crate::core::types::Color;
use crate::error::{Error, Result};
use crate::pairing::{PairingOutcome, PairingSequencer};
use crate::teleop::TeleopLoop;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Hub light pattern shown while searching for the remote (on/off ms)
pub const SEARCH_BLINK_PATTERN: [u64; 4] = [200, 100, 200, 1000];

/// Battery level below which the hub light shows yellow instead of green
const LOW_BATTERY_PERCENT: u8 = 20;

/// Run the full application against a set of devices
///
/// Returns once the teleop loop shuts down, or with
/// [`Error::RemoteNotConnected`] if pairing exhausts its budget.
pub fn run<H, M, S, C, K>(
    mut hub: H,
    left_motor: M,
    right_motor: M,
    sensor: Option<S>,
    mut connector: C,
    mut clock: K,
    config: &Config,
    stop_flag: Option<Arc<AtomicBool>>,
) -> Result<()>
where
    H: HubDevice,
    M: DriveMotor,
    S: DistanceSensor,
    C: RemoteConnector,
    K: Clock,
{
    let battery = hub.battery_level()?;
    log::info!("Current battery: {}%", battery);

    hub.blink_light(Color::White, &SEARCH_BLINK_PATTERN)?;

    let sequencer = PairingSequencer::from_config(&config.pairing);
    match sequencer.pair(&mut connector, &mut clock) {
        PairingOutcome::Connected(mut remote) => {
            let hub_color = if battery < LOW_BATTERY_PERCENT {
                Color::Yellow
            } else {
                Color::Green
            };
            hub.set_light(hub_color)?;
            remote.set_light(Color::Green)?;

            let mut teleop = TeleopLoop::new(
                hub,
                left_motor,
                right_motor,
                sensor,
                remote,
                clock,
                config,
            );
            if let Some(flag) = stop_flag {
                teleop = teleop.with_stop_flag(flag);
            }
            teleop.run()
        }
        PairingOutcome::ConnectionFailed => {
            log::error!("Remote not connected - exit app");
            hub.set_light(Color::Red)?;
            clock.sleep(Duration::from_millis(config.pairing.failure_cooldown_ms));
            Err(Error::RemoteNotConnected {
                attempts: config.pairing.attempts,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Button, ButtonSet};
    use crate::devices::mock::{
        FlakyConnector, LightEvent, MockClock, MockDistanceSensor, MockHub, MockMotor,
    };

    fn shutdown_immediately(hub: &MockHub) {
        hub.push_buttons(ButtonSet::new().with(Button::Center));
    }

    #[test]
    fn test_healthy_battery_startup_lights() {
        let hub = MockHub::new(85);
        shutdown_immediately(&hub);
        let connector = FlakyConnector::succeed_after(0);
        let remote = connector.remote();
        let clock = MockClock::new();

        run(
            hub.clone(),
            MockMotor::new(),
            MockMotor::new(),
            None::<MockDistanceSensor>,
            connector,
            clock,
            &Config::default(),
            None,
        )
        .unwrap();

        assert_eq!(
            hub.light_events(),
            vec![
                LightEvent::Blink(Color::White, SEARCH_BLINK_PATTERN.to_vec()),
                LightEvent::On(Color::Green),
            ]
        );
        assert_eq!(remote.light_events()[0], LightEvent::On(Color::Green));
        assert!(hub.is_shut_down());
    }

    #[test]
    fn test_low_battery_shows_yellow() {
        let hub = MockHub::new(15);
        shutdown_immediately(&hub);
        let connector = FlakyConnector::succeed_after(0);

        run(
            hub.clone(),
            MockMotor::new(),
            MockMotor::new(),
            None::<MockDistanceSensor>,
            connector,
            MockClock::new(),
            &Config::default(),
            None,
        )
        .unwrap();

        assert!(hub
            .light_events()
            .contains(&LightEvent::On(Color::Yellow)));
    }

    #[test]
    fn test_pairing_failure_never_enters_loop() {
        let hub = MockHub::new(85);
        let left = MockMotor::new();
        let right = MockMotor::new();
        let clock = MockClock::new();

        let result = run(
            hub.clone(),
            left.clone(),
            right.clone(),
            None::<MockDistanceSensor>,
            FlakyConnector::always_fail(),
            clock.clone(),
            &Config::default(),
            None,
        );

        assert!(matches!(
            result,
            Err(Error::RemoteNotConnected { attempts: 5 })
        ));
        // Error indication, then the fixed cooldown before exit
        assert_eq!(
            hub.light_events().last(),
            Some(&LightEvent::On(Color::Red))
        );
        assert!(clock.sleeps().contains(&Duration::from_millis(3000)));
        // No motor command was ever issued
        assert!(left.commands().is_empty());
        assert!(right.commands().is_empty());
        assert!(!hub.is_shut_down());
    }

    #[test]
    fn test_retry_budget_spacing() {
        let hub = MockHub::new(85);
        shutdown_immediately(&hub);
        let connector = FlakyConnector::succeed_after(3);
        let clock = MockClock::new();

        run(
            hub,
            MockMotor::new(),
            MockMotor::new(),
            None::<MockDistanceSensor>,
            connector,
            clock.clone(),
            &Config::default(),
            None,
        )
        .unwrap();

        // Four pairing waits of 1s before the connection succeeded
        let pairing_waits = clock
            .sleeps()
            .iter()
            .filter(|d| **d == Duration::from_secs(1))
            .count();
        assert_eq!(pairing_waits, 4);
    }
}
