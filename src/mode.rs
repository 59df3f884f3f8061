// Operating mode state machine and control-loop step
//
// The first value from the command source picks the mode for the rest of
// the run: the automatic token selects closed-loop positioning, anything
// else selects manual speed control.

use embedded_hal::pwm::SetDutyCycle;

use crate::command::CommandSource;
use crate::config::control::{AUTOMATIC_TOKEN, CONTROL_PERIOD_MS, MODE_SELECT_POLL_MS};
use crate::config::speed::MANUAL_SPEED_LIMIT;
use crate::config::SpeedLimits;
use crate::control::{AutomaticController, ManualController, MotorCommand};
use crate::fmt::*;
use crate::motor_driver::MotorDriver;
use crate::position::PositionCounter;
use crate::telemetry::{Telemetry, TelemetryEvent};

/// Operating mode. The automatic target lives inside its variant so it
/// only exists while positioning is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
pub enum OperatingMode {
    Unselected,
    Automatic { target: i32 },
    Manual,
}

/// Control-loop context: owns the mode and both controllers
pub struct ModeStateMachine {
    mode: OperatingMode,
    automatic: AutomaticController,
    manual: ManualController,
    prompted: bool,
}

impl ModeStateMachine {
    pub const fn new(limits: SpeedLimits) -> Self {
        Self {
            mode: OperatingMode::Unselected,
            automatic: AutomaticController::new(limits),
            manual: ManualController::new(),
            prompted: false,
        }
    }

    pub fn current_mode(&self) -> OperatingMode {
        self.mode
    }

    /// Select the operating mode from a token.
    ///
    /// Returns `false` without changing anything once a mode is selected.
    pub fn select_mode(&mut self, token: i32) -> bool {
        if self.mode != OperatingMode::Unselected {
            debug!("Mode already selected, ignoring token {}", token);
            return false;
        }

        self.mode = if token == AUTOMATIC_TOKEN {
            OperatingMode::Automatic { target: 0 }
        } else {
            OperatingMode::Manual
        };
        info!("Operating mode selected: {}", self.mode);
        true
    }

    /// Wait before the next `step` [ms]
    pub fn next_delay_ms(&self) -> u64 {
        match self.mode {
            OperatingMode::Unselected => MODE_SELECT_POLL_MS,
            _ => CONTROL_PERIOD_MS,
        }
    }

    /// Run one control cycle
    ///
    /// # Arguments
    /// * `position` - Encoder counter shared with the edge handler
    /// * `source` - Pending operator input, polled at most once
    /// * `driver` - Motor output
    /// * `telemetry` - Status sink
    pub fn step<S, T, F, R>(
        &mut self,
        position: &PositionCounter,
        source: &mut S,
        driver: &mut MotorDriver<F, R>,
        telemetry: &mut T,
    ) -> Result<(), F::Error>
    where
        S: CommandSource,
        T: Telemetry,
        F: SetDutyCycle,
        R: SetDutyCycle<Error = F::Error>,
    {
        match self.mode {
            OperatingMode::Unselected => {
                self.step_unselected(source, telemetry);
                Ok(())
            }
            OperatingMode::Automatic { target } => {
                let target = match source.poll() {
                    Some(new_target) => {
                        info!("New target position: {}", new_target);
                        self.mode = OperatingMode::Automatic { target: new_target };
                        new_target
                    }
                    None => target,
                };

                let command = self.automatic.compute(target, position.read());
                Self::drive(driver, command)?;

                telemetry.emit(TelemetryEvent::Command(command));
                telemetry.emit(TelemetryEvent::Position(position.read()));
                Ok(())
            }
            OperatingMode::Manual => {
                if let Some(speed) = source.poll() {
                    let command = self.manual.compute(Self::bound_manual_speed(speed));
                    Self::drive(driver, command)?;

                    telemetry.emit(TelemetryEvent::Command(command));
                    telemetry.emit(TelemetryEvent::SpeedPrompt);
                }

                telemetry.emit(TelemetryEvent::Position(position.read()));
                Ok(())
            }
        }
    }

    fn step_unselected<S, T>(&mut self, source: &mut S, telemetry: &mut T)
    where
        S: CommandSource,
        T: Telemetry,
    {
        match source.poll() {
            Some(token) => {
                self.select_mode(token);
                telemetry.emit(TelemetryEvent::ModeSelected(self.mode));
                if self.mode == OperatingMode::Manual {
                    telemetry.emit(TelemetryEvent::SpeedPrompt);
                }
            }
            None if !self.prompted => {
                self.prompted = true;
                telemetry.emit(TelemetryEvent::ModePrompt);
            }
            None => {}
        }
    }

    fn drive<F, R>(driver: &mut MotorDriver<F, R>, command: MotorCommand) -> Result<(), F::Error>
    where
        F: SetDutyCycle,
        R: SetDutyCycle<Error = F::Error>,
    {
        debug!(
            "Motor command: direction={}, speed={}",
            command.direction, command.magnitude
        );
        driver.apply(command)
    }

    /// Keep manual input inside the driver resolution
    fn bound_manual_speed(speed: i32) -> i32 {
        let limit = MANUAL_SPEED_LIMIT as i32;
        let bounded = speed.clamp(-limit, limit);
        if bounded != speed {
            warn!("Manual speed {} out of range, clamped to {}", speed, bounded);
        }
        bounded
    }
}

impl Default for ModeStateMachine {
    fn default() -> Self {
        Self::new(SpeedLimits::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Direction;
    use crate::testing::{recording_driver, Ch, RecordingTelemetry, TestDriver, WriteLog};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_sync::channel::Channel;

    type Commands = Channel<NoopRawMutex, i32, 8>;

    struct Rig {
        sm: ModeStateMachine,
        position: PositionCounter,
        commands: Commands,
        driver: TestDriver,
        log: WriteLog,
        telemetry: RecordingTelemetry,
    }

    impl Rig {
        fn new() -> Self {
            let (driver, log) = recording_driver(255);
            Self {
                sm: ModeStateMachine::default(),
                position: PositionCounter::new(),
                commands: Channel::new(),
                driver,
                log,
                telemetry: RecordingTelemetry::default(),
            }
        }

        fn send(&self, value: i32) {
            self.commands.try_send(value).unwrap();
        }

        fn step(&mut self) {
            let mut source = self.commands.receiver();
            self.sm
                .step(&self.position, &mut source, &mut self.driver, &mut self.telemetry)
                .unwrap();
        }

        fn move_by(&self, ticks: i32) {
            for _ in 0..ticks.unsigned_abs() {
                self.position.on_edge(ticks > 0);
            }
        }

        /// (forward, reverse) duty after replaying every write
        fn duties(&self) -> (u16, u16) {
            let mut duties = (0, 0);
            for &(ch, duty) in self.log.borrow().iter() {
                match ch {
                    Ch::Fwd => duties.0 = duty,
                    Ch::Rvs => duties.1 = duty,
                }
            }
            duties
        }
    }

    #[test]
    fn test_starts_unselected() {
        let sm = ModeStateMachine::default();
        assert_eq!(sm.current_mode(), OperatingMode::Unselected);
        assert_eq!(sm.next_delay_ms(), MODE_SELECT_POLL_MS);
    }

    #[test]
    fn test_token_one_selects_automatic() {
        let mut sm = ModeStateMachine::default();
        assert!(sm.select_mode(1));
        assert_eq!(sm.current_mode(), OperatingMode::Automatic { target: 0 });
        assert_eq!(sm.next_delay_ms(), CONTROL_PERIOD_MS);
    }

    #[test]
    fn test_other_token_selects_manual() {
        for token in [7, 2, 0, -1] {
            let mut sm = ModeStateMachine::default();
            assert!(sm.select_mode(token));
            assert_eq!(sm.current_mode(), OperatingMode::Manual);
        }
    }

    #[test]
    fn test_selection_is_terminal() {
        let mut sm = ModeStateMachine::default();
        sm.select_mode(7);
        assert!(!sm.select_mode(1));
        assert_eq!(sm.current_mode(), OperatingMode::Manual);

        let mut sm = ModeStateMachine::default();
        sm.select_mode(1);
        assert!(!sm.select_mode(7));
        assert_eq!(sm.current_mode(), OperatingMode::Automatic { target: 0 });
    }

    #[test]
    fn test_unselected_never_drives() {
        let mut rig = Rig::new();
        rig.move_by(500);
        for _ in 0..3 {
            rig.step();
        }
        assert!(rig.log.borrow().is_empty());
        assert_eq!(rig.driver.last_command(), MotorCommand::STOP);
        // prompt only once while waiting
        assert_eq!(rig.telemetry.events, [TelemetryEvent::ModePrompt]);
    }

    #[test]
    fn test_selection_step_does_not_drive() {
        let mut rig = Rig::new();
        rig.send(1);
        rig.send(100);
        rig.step();

        assert_eq!(rig.sm.current_mode(), OperatingMode::Automatic { target: 0 });
        assert!(rig.log.borrow().is_empty());
        assert_eq!(
            rig.telemetry.events,
            [TelemetryEvent::ModeSelected(OperatingMode::Automatic { target: 0 })]
        );
    }

    #[test]
    fn test_automatic_tracks_target() {
        let mut rig = Rig::new();
        rig.send(1);
        rig.step();

        rig.send(100);
        rig.step();
        assert_eq!(rig.sm.current_mode(), OperatingMode::Automatic { target: 100 });
        assert_eq!(
            rig.driver.last_command(),
            MotorCommand::new(Direction::Forward, 100)
        );
        assert_eq!(rig.duties(), (100, 0));

        // target retained, deadband floor near the goal
        rig.move_by(95);
        rig.step();
        assert_eq!(
            rig.driver.last_command(),
            MotorCommand::new(Direction::Forward, 20)
        );

        rig.move_by(5);
        rig.step();
        assert_eq!(rig.driver.last_command(), MotorCommand::STOP);
        assert_eq!(rig.duties(), (0, 0));
    }

    #[test]
    fn test_automatic_clamps_reverse() {
        let mut rig = Rig::new();
        rig.send(1);
        rig.step();

        rig.move_by(250);
        rig.step();
        assert_eq!(
            rig.driver.last_command(),
            MotorCommand::new(Direction::Reverse, 200)
        );
        assert_eq!(rig.duties(), (0, 200));
        assert_eq!(
            rig.telemetry.events[1..],
            [
                TelemetryEvent::Command(MotorCommand::new(Direction::Reverse, 200)),
                TelemetryEvent::Position(250),
            ]
        );
    }

    #[test]
    fn test_automatic_one_target_per_cycle() {
        let mut rig = Rig::new();
        rig.send(1);
        rig.step();

        rig.send(10);
        rig.send(-300);
        rig.step();
        assert_eq!(rig.sm.current_mode(), OperatingMode::Automatic { target: 10 });
        rig.step();
        assert_eq!(rig.sm.current_mode(), OperatingMode::Automatic { target: -300 });
        assert_eq!(
            rig.driver.last_command(),
            MotorCommand::new(Direction::Reverse, 200)
        );
    }

    #[test]
    fn test_manual_selection_prompts_for_speed() {
        let mut rig = Rig::new();
        rig.send(2);
        rig.step();
        assert_eq!(
            rig.telemetry.events,
            [
                TelemetryEvent::ModeSelected(OperatingMode::Manual),
                TelemetryEvent::SpeedPrompt,
            ]
        );
    }

    #[test]
    fn test_manual_applies_speed() {
        let mut rig = Rig::new();
        rig.send(7);
        rig.step();
        rig.telemetry.events.clear();

        rig.send(-150);
        rig.step();
        assert_eq!(
            rig.driver.last_command(),
            MotorCommand::new(Direction::Reverse, 150)
        );
        assert_eq!(rig.duties(), (0, 150));
        // prompt comes before the position line
        assert_eq!(
            rig.telemetry.events,
            [
                TelemetryEvent::Command(MotorCommand::new(Direction::Reverse, 150)),
                TelemetryEvent::SpeedPrompt,
                TelemetryEvent::Position(0),
            ]
        );
    }

    #[test]
    fn test_manual_without_input_keeps_output() {
        let mut rig = Rig::new();
        rig.send(7);
        rig.step();
        rig.send(90);
        rig.step();
        rig.log.borrow_mut().clear();
        rig.telemetry.events.clear();

        rig.move_by(-3);
        rig.step();
        assert!(rig.log.borrow().is_empty());
        assert_eq!(
            rig.driver.last_command(),
            MotorCommand::new(Direction::Forward, 90)
        );
        assert_eq!(rig.telemetry.events, [TelemetryEvent::Position(-3)]);
    }

    #[test]
    fn test_manual_out_of_range_clamped() {
        let mut rig = Rig::new();
        rig.send(2);
        rig.step();

        rig.send(1000);
        rig.step();
        assert_eq!(
            rig.driver.last_command(),
            MotorCommand::new(Direction::Forward, 255)
        );

        rig.send(i32::MIN);
        rig.step();
        assert_eq!(
            rig.driver.last_command(),
            MotorCommand::new(Direction::Reverse, 255)
        );
    }
}
