//! Bounded-retry pairing sequencer for the remote
//!
//! Pairing either hands back a connected remote handle or reports failure
//! as a value; there is no nullable handle and no error-driven control
//! flow at this layer.

use crate::config::PairingConfig;
use crate::core::hal::{Clock, RemoteConnector};
use std::time::Duration;

/// Outcome of a pairing run
#[derive(Debug)]
pub enum PairingOutcome<R> {
    /// Remote paired; the handle is owned by the caller from here on
    Connected(R),
    /// Every attempt in the budget failed
    ConnectionFailed,
}

impl<R> PairingOutcome<R> {
    /// True when pairing succeeded
    pub fn is_connected(&self) -> bool {
        matches!(self, PairingOutcome::Connected(_))
    }
}

/// Retry policy for remote pairing
#[derive(Debug, Clone, Copy)]
pub struct PairingSequencer {
    attempts: u32,
    retry_wait: Duration,
}

impl PairingSequencer {
    /// Create a sequencer with an explicit budget and wait
    pub fn new(attempts: u32, retry_wait: Duration) -> Self {
        Self {
            attempts,
            retry_wait,
        }
    }

    /// Build from configuration
    pub fn from_config(config: &PairingConfig) -> Self {
        Self::new(config.attempts, Duration::from_millis(config.retry_wait_ms))
    }

    /// Run the pairing sequence
    ///
    /// Waits `retry_wait` before each attempt, stops on the first success
    /// even with budget remaining, and gives up after `attempts` failures.
    pub fn pair<C, K>(&self, connector: &mut C, clock: &mut K) -> PairingOutcome<C::Remote>
    where
        C: RemoteConnector,
        K: Clock,
    {
        for attempt in 1..=self.attempts {
            clock.sleep(self.retry_wait);
            log::info!("Connecting to remote ... {}/{}", attempt, self.attempts);
            match connector.connect() {
                Ok(remote) => {
                    log::info!("Remote connected");
                    return PairingOutcome::Connected(remote);
                }
                Err(e) => {
                    log::warn!("Failed to connect to remote: {}", e);
                }
            }
        }
        PairingOutcome::ConnectionFailed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::mock::{FlakyConnector, MockClock};

    fn sequencer() -> PairingSequencer {
        PairingSequencer::new(5, Duration::from_secs(1))
    }

    #[test]
    fn test_connects_first_try_with_one_attempt() {
        let mut connector = FlakyConnector::succeed_after(0);
        let mut clock = MockClock::new();

        let outcome = sequencer().pair(&mut connector, &mut clock);

        assert!(outcome.is_connected());
        assert_eq!(connector.attempts(), 1);
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(1)]);
    }

    #[test]
    fn test_k_failures_then_success_makes_k_plus_one_attempts() {
        for k in 0..5u32 {
            let mut connector = FlakyConnector::succeed_after(k);
            let mut clock = MockClock::new();

            let outcome = sequencer().pair(&mut connector, &mut clock);

            assert!(outcome.is_connected(), "k={}", k);
            assert_eq!(connector.attempts(), k + 1, "k={}", k);
            // One fixed wait before every attempt
            assert_eq!(clock.sleeps().len() as u32, k + 1, "k={}", k);
            assert!(clock
                .sleeps()
                .iter()
                .all(|d| *d == Duration::from_secs(1)));
        }
    }

    #[test]
    fn test_budget_exhausted_ends_not_connected() {
        let mut connector = FlakyConnector::always_fail();
        let mut clock = MockClock::new();

        let outcome = sequencer().pair(&mut connector, &mut clock);

        assert!(!outcome.is_connected());
        assert_eq!(connector.attempts(), 5);
        assert_eq!(clock.sleeps().len(), 5);
    }

    #[test]
    fn test_success_stops_retrying_with_budget_remaining() {
        let mut connector = FlakyConnector::succeed_after(2);
        let mut clock = MockClock::new();

        let outcome = sequencer().pair(&mut connector, &mut clock);

        assert!(outcome.is_connected());
        // Budget was 5 but only 3 attempts happen
        assert_eq!(connector.attempts(), 3);
    }
}
