//! Core types shared by the control loop and the hardware seam.

use serde::{Deserialize, Serialize};

/// Buttons reported by the remote and hub polls.
///
/// The remote exposes all seven; the hub only ever reports [`Button::Center`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    LeftPlus,
    Left,
    LeftMinus,
    RightPlus,
    Right,
    RightMinus,
    Center,
}

impl Button {
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of currently held buttons, as returned by a single poll.
///
/// Polls are level-triggered: a button held across ticks appears in every
/// poll until released, re-triggering the same branch each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonSet(u8);

impl ButtonSet {
    /// No buttons held
    pub const EMPTY: ButtonSet = ButtonSet(0);

    /// Create an empty set
    pub fn new() -> Self {
        ButtonSet(0)
    }

    /// Builder-style insert
    pub fn with(mut self, button: Button) -> Self {
        self.insert(button);
        self
    }

    /// Add a button to the set
    pub fn insert(&mut self, button: Button) {
        self.0 |= button.bit();
    }

    /// Remove a button from the set
    pub fn remove(&mut self, button: Button) {
        self.0 &= !button.bit();
    }

    /// Is the button currently held?
    pub fn contains(&self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    /// True when no buttons are held
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Button> for ButtonSet {
    fn from_iter<I: IntoIterator<Item = Button>>(iter: I) -> Self {
        let mut set = ButtonSet::new();
        for button in iter {
            set.insert(button);
        }
        set
    }
}

/// Indicator light colors supported by the hub and remote lights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Green,
    Yellow,
    Red,
    Violet,
    Blue,
}

/// Command issued to a single drive motor.
///
/// Commands are fire-and-forget to the underlying drive electronics; the
/// motor holds no state beyond the last commanded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorCommand {
    /// Signed duty-cycle percentage, -100..=100
    Duty(i8),
    /// Explicit stop
    Stop,
}

/// The single movement branch selected for a tick.
///
/// Exactly one branch is active per tick; see
/// [`resolve_drive`](crate::teleop::drive::resolve_drive) for the precedence
/// order that picks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveCommand {
    TurnRight,
    TurnLeft,
    Forward,
    Backward,
    Idle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_set_insert_contains() {
        let mut set = ButtonSet::new();
        assert!(set.is_empty());

        set.insert(Button::LeftPlus);
        set.insert(Button::Center);
        assert!(set.contains(Button::LeftPlus));
        assert!(set.contains(Button::Center));
        assert!(!set.contains(Button::RightPlus));

        set.remove(Button::LeftPlus);
        assert!(!set.contains(Button::LeftPlus));
        assert!(set.contains(Button::Center));
    }

    #[test]
    fn test_button_set_from_iter() {
        let set: ButtonSet = [Button::RightPlus, Button::Left].into_iter().collect();
        assert!(set.contains(Button::RightPlus));
        assert!(set.contains(Button::Left));
        assert!(!set.contains(Button::LeftMinus));
    }

    #[test]
    fn test_button_bits_distinct() {
        let all = [
            Button::LeftPlus,
            Button::Left,
            Button::LeftMinus,
            Button::RightPlus,
            Button::Right,
            Button::RightMinus,
            Button::Center,
        ];
        for (i, a) in all.iter().enumerate() {
            let set = ButtonSet::new().with(*a);
            for (j, b) in all.iter().enumerate() {
                assert_eq!(set.contains(*b), i == j);
            }
        }
    }

    #[test]
    fn test_color_from_toml() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            color: Color,
        }
        let parsed: Wrapper = toml::from_str("color = \"violet\"").unwrap();
        assert_eq!(parsed.color, Color::Violet);
    }
}
