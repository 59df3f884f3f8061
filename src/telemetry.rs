// Status reporting toward the operator

use core::fmt::{self, Write};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Sender;

use crate::control::MotorCommand;
use crate::fmt::*;
use crate::mode::OperatingMode;

/// One fire-and-forget telemetry message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
pub enum TelemetryEvent {
    /// Waiting for the mode selection token
    ModePrompt,
    /// The mode was selected
    ModeSelected(OperatingMode),
    /// Waiting for a manual speed value
    SpeedPrompt,
    /// Command applied this cycle
    Command(MotorCommand),
    /// Current encoder position [ticks]
    Position(i32),
}

impl TelemetryEvent {
    /// Render as operator-facing text lines (CRLF terminated)
    pub fn write_to<W: Write>(&self, w: &mut W) -> fmt::Result {
        match self {
            TelemetryEvent::ModePrompt => {
                w.write_str("Please select operation mode: (1= automatic, 2=manual)\r\n")
            }
            TelemetryEvent::ModeSelected(OperatingMode::Automatic { .. }) => {
                w.write_str("Automatic operation mode selected\r\n")
            }
            TelemetryEvent::ModeSelected(OperatingMode::Manual) => {
                w.write_str("Manual operation mode selected\r\n")
            }
            TelemetryEvent::ModeSelected(OperatingMode::Unselected) => Ok(()),
            TelemetryEvent::SpeedPrompt => {
                w.write_str("Please select motor speed: (between -255 and 255)\r\n")
            }
            TelemetryEvent::Command(cmd) => {
                write!(w, "Motor Direction: {}\r\n", cmd.direction.signum())?;
                write!(w, "Motor Speed: {}\r\n", cmd.magnitude)
            }
            TelemetryEvent::Position(position) => {
                write!(w, "Current Position: {}\r\n", position)
            }
        }
    }
}

/// Sink for telemetry events
pub trait Telemetry {
    fn emit(&mut self, event: TelemetryEvent);
}

/// Queues events for the serial writer task. Never blocks; a full queue
/// drops the event.
impl<M: RawMutex, const N: usize> Telemetry for Sender<'_, M, TelemetryEvent, N> {
    fn emit(&mut self, event: TelemetryEvent) {
        if self.try_send(event).is_err() {
            warn!("Telemetry queue full, dropping {}", event);
        }
    }
}
