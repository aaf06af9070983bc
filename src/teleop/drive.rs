//! Drive branch resolution and the power ratchet

use crate::config::DriveConfig;
use crate::core::types::{Button, ButtonSet, DriveCommand};

/// Wrapping increment rule applied to the power level on a boost press
#[derive(Debug, Clone, Copy)]
pub struct Ratchet {
    /// Increment per application
    pub step: u8,
    /// Level to wrap back to above `max`
    pub wrap: u8,
    /// Ceiling that triggers the wrap
    pub max: u8,
}

impl Ratchet {
    /// Build from drive configuration
    pub fn from_config(config: &DriveConfig) -> Self {
        Self {
            step: config.power_step,
            wrap: config.power_wrap,
            max: config.power_max,
        }
    }

    /// Apply the ratchet once: `power + step`, wrapping to `wrap` above `max`
    pub fn apply(&self, power: u8) -> u8 {
        let next = power.saturating_add(self.step);
        if next > self.max {
            self.wrap
        } else {
            next
        }
    }
}

/// Resolve the movement branch for a tick from the held remote buttons
///
/// Precedence: turn-right > turn-left > forward > backward > idle. Turning
/// always overrides straight-line motion, so at most one branch fires.
pub fn resolve_drive(pressed: ButtonSet) -> DriveCommand {
    if pressed.contains(Button::RightPlus) {
        DriveCommand::TurnRight
    } else if pressed.contains(Button::RightMinus) {
        DriveCommand::TurnLeft
    } else if pressed.contains(Button::LeftPlus) {
        DriveCommand::Forward
    } else if pressed.contains(Button::LeftMinus) {
        DriveCommand::Backward
    } else {
        DriveCommand::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock_ratchet() -> Ratchet {
        Ratchet {
            step: 20,
            wrap: 40,
            max: 100,
        }
    }

    #[test]
    fn test_ratchet_table() {
        let ratchet = stock_ratchet();
        assert_eq!(ratchet.apply(20), 40);
        assert_eq!(ratchet.apply(40), 60);
        assert_eq!(ratchet.apply(60), 80);
        assert_eq!(ratchet.apply(80), 100);
        assert_eq!(ratchet.apply(100), 40);
    }

    #[test]
    fn test_ratchet_never_below_wrap_after_first_application() {
        let ratchet = stock_ratchet();
        for power in [20u8, 40, 60, 80, 100] {
            let next = ratchet.apply(power);
            assert!((40..=100).contains(&next), "apply({}) = {}", power, next);
        }
    }

    #[test]
    fn test_precedence_turn_right_beats_everything() {
        let pressed: ButtonSet = [
            Button::RightPlus,
            Button::RightMinus,
            Button::LeftPlus,
            Button::LeftMinus,
        ]
        .into_iter()
        .collect();
        assert_eq!(resolve_drive(pressed), DriveCommand::TurnRight);
    }

    #[test]
    fn test_precedence_turn_left_beats_straight_motion() {
        let pressed: ButtonSet = [Button::RightMinus, Button::LeftPlus, Button::LeftMinus]
            .into_iter()
            .collect();
        assert_eq!(resolve_drive(pressed), DriveCommand::TurnLeft);
    }

    #[test]
    fn test_precedence_forward_beats_backward() {
        let pressed: ButtonSet = [Button::LeftPlus, Button::LeftMinus].into_iter().collect();
        assert_eq!(resolve_drive(pressed), DriveCommand::Forward);
    }

    #[test]
    fn test_single_branches() {
        let single = |b| ButtonSet::new().with(b);
        assert_eq!(resolve_drive(single(Button::RightPlus)), DriveCommand::TurnRight);
        assert_eq!(resolve_drive(single(Button::RightMinus)), DriveCommand::TurnLeft);
        assert_eq!(resolve_drive(single(Button::LeftPlus)), DriveCommand::Forward);
        assert_eq!(resolve_drive(single(Button::LeftMinus)), DriveCommand::Backward);
        assert_eq!(resolve_drive(ButtonSet::EMPTY), DriveCommand::Idle);
    }

    #[test]
    fn test_non_drive_buttons_are_idle() {
        let pressed: ButtonSet = [Button::Left, Button::Right, Button::Center]
            .into_iter()
            .collect();
        assert_eq!(resolve_drive(pressed), DriveCommand::Idle);
    }
}
