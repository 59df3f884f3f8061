//! Test doubles shared by the unit tests

use core::convert::Infallible;
use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};

use crate::motor_driver::MotorDriver;
use crate::telemetry::{Telemetry, TelemetryEvent};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ch {
    Fwd,
    Rvs,
}

pub type WriteLog = Rc<RefCell<Vec<(Ch, u16)>>>;

/// PWM channel that records every duty write into a shared log
pub struct RecordingChannel {
    pub id: Ch,
    pub max: u16,
    pub duty: u16,
    pub log: WriteLog,
}

impl ErrorType for RecordingChannel {
    type Error = Infallible;
}

impl SetDutyCycle for RecordingChannel {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty;
        self.log.borrow_mut().push((self.id, duty));
        Ok(())
    }
}

pub type TestDriver = MotorDriver<RecordingChannel, RecordingChannel>;

/// Driver over two recording channels; the log starts empty after
/// construction
pub fn recording_driver(max: u16) -> (TestDriver, WriteLog) {
    let log: WriteLog = Rc::new(RefCell::new(Vec::new()));
    let channel = |id| RecordingChannel {
        id,
        max,
        duty: 123,
        log: Rc::clone(&log),
    };
    let driver = MotorDriver::new(channel(Ch::Fwd), channel(Ch::Rvs)).unwrap();
    log.borrow_mut().clear();
    (driver, log)
}

/// Telemetry sink that keeps every event
#[derive(Default)]
pub struct RecordingTelemetry {
    pub events: Vec<TelemetryEvent>,
}

impl Telemetry for RecordingTelemetry {
    fn emit(&mut self, event: TelemetryEvent) {
        self.events.push(event);
    }
}
