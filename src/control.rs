// Control laws for the single-axis DC motor
// Automatic (closed-loop positioning) and manual (open-loop speed) commands

pub mod automatic;
pub mod manual;

// Re-export main types for easier access
pub use automatic::AutomaticController;
pub use manual::ManualController;

/// Direction of rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    /// Direction for a signed quantity. Zero counts as forward.
    pub fn from_sign(value: i64) -> Self {
        if value >= 0 {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    /// Signed unit value (`1` forward, `-1` reverse) as printed on the
    /// command interface
    pub fn signum(self) -> i8 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }
}

/// A complete drive command: direction plus duty magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
pub struct MotorCommand {
    pub direction: Direction,
    pub magnitude: u32,
}

impl MotorCommand {
    /// Stop command (forward, zero duty)
    pub const STOP: Self = Self {
        direction: Direction::Forward,
        magnitude: 0,
    };

    pub const fn new(direction: Direction, magnitude: u32) -> Self {
        Self {
            direction,
            magnitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_forward() {
        assert_eq!(Direction::from_sign(0), Direction::Forward);
        assert_eq!(Direction::from_sign(-1), Direction::Reverse);
        assert_eq!(Direction::from_sign(i64::MAX), Direction::Forward);
    }

    #[test]
    fn test_signum() {
        assert_eq!(Direction::Forward.signum(), 1);
        assert_eq!(Direction::Reverse.signum(), -1);
    }
}
