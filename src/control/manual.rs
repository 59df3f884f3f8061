// Open-loop manual speed command

use super::{Direction, MotorCommand};

/// Sign/magnitude decomposition of a user supplied speed.
///
/// The magnitude is not clamped here; valid input is `-255..=255` and the
/// caller is responsible for bounding it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualController;

impl ManualController {
    pub const fn new() -> Self {
        Self
    }

    pub fn compute(&self, user_input: i32) -> MotorCommand {
        MotorCommand::new(
            Direction::from_sign(user_input as i64),
            user_input.unsigned_abs(),
        )
    }
}
