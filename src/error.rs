//! Error types for configuration and command parsing.
//!
//! The control path itself has no failure modes; these only cover the
//! surfaces around it.

use core::fmt;

/// Rejected speed limit configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
pub enum ConfigError {
    /// The deadband floor is larger than the clamp.
    MinAboveMax { min: u16, max: u16 },

    /// The clamp exceeds the PWM driver resolution.
    MaxAboveResolution { max: u16, resolution: u16 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::MinAboveMax { min, max } => {
                write!(f, "min speed {} exceeds max speed {}", min, max)
            }
            ConfigError::MaxAboveResolution { max, resolution } => {
                write!(
                    f,
                    "max speed {} exceeds driver resolution {}",
                    max, resolution
                )
            }
        }
    }
}

/// Malformed line received from the command interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
pub enum ParseError {
    /// The line contained no integer.
    NoDigits,

    /// The integer does not fit in an `i32`.
    Overflow,

    /// The line did not fit in the receive buffer and was discarded.
    LineTooLong,

    /// Bytes of the line were lost by the receiver.
    Interrupted,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::NoDigits => write!(f, "no integer in line"),
            ParseError::Overflow => write!(f, "integer out of range"),
            ParseError::LineTooLong => write!(f, "line too long"),
            ParseError::Interrupted => write!(f, "line interrupted by receive error"),
        }
    }
}
