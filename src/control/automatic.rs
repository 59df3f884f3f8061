// Clamped-proportional position controller with deadband floor

use super::{Direction, MotorCommand};
use crate::config::SpeedLimits;

/// Maps position error directly to duty.
///
/// - error beyond `max` saturates at `max`
/// - nonzero error below `min` is raised to `min` so the motor overcomes
///   stiction
/// - otherwise duty equals the absolute error, so zero error stops the motor
#[derive(Debug, Clone, Copy)]
pub struct AutomaticController {
    limits: SpeedLimits,
}

impl AutomaticController {
    /// Create a controller
    ///
    /// # Arguments
    /// * `limits` - Validated floor and clamp
    pub const fn new(limits: SpeedLimits) -> Self {
        Self { limits }
    }

    /// Compute the drive command for one control cycle
    ///
    /// # Arguments
    /// * `target` - Target position [ticks]
    /// * `current` - Measured position [ticks]
    ///
    /// # Returns
    /// Command with magnitude in `0..=max`
    pub fn compute(&self, target: i32, current: i32) -> MotorCommand {
        // i64 so that extreme target/position pairs cannot overflow
        let error = target as i64 - current as i64;
        let direction = Direction::from_sign(error);
        let abs_error = error.unsigned_abs();

        let max = self.limits.max() as u64;
        let min = self.limits.min() as u64;

        let magnitude = if abs_error > max {
            max
        } else if abs_error > 0 && abs_error < min {
            min
        } else {
            abs_error
        };

        MotorCommand::new(direction, magnitude as u32)
    }
}

impl Default for AutomaticController {
    fn default() -> Self {
        Self::new(SpeedLimits::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> AutomaticController {
        AutomaticController::default()
    }

    #[test]
    fn test_proportional_region() {
        let cmd = controller().compute(100, 0);
        assert_eq!(cmd, MotorCommand::new(Direction::Forward, 100));
    }

    #[test]
    fn test_clamped_reverse() {
        let cmd = controller().compute(0, 250);
        assert_eq!(cmd, MotorCommand::new(Direction::Reverse, 200));
    }

    #[test]
    fn test_floor_applied() {
        let cmd = controller().compute(5, 0);
        assert_eq!(cmd, MotorCommand::new(Direction::Forward, 20));

        let cmd = controller().compute(-19, 0);
        assert_eq!(cmd, MotorCommand::new(Direction::Reverse, 20));
    }

    #[test]
    fn test_zero_error_stops_forward() {
        for pos in [-1000, 0, 37, i32::MAX, i32::MIN] {
            let cmd = controller().compute(pos, pos);
            assert_eq!(cmd, MotorCommand::STOP);
        }
    }

    #[test]
    fn test_boundaries() {
        // exactly min and exactly max are proportional
        assert_eq!(controller().compute(20, 0).magnitude, 20);
        assert_eq!(controller().compute(200, 0).magnitude, 200);
        assert_eq!(controller().compute(201, 0).magnitude, 200);
        assert_eq!(controller().compute(0, 1).magnitude, 20);
    }

    #[test]
    fn test_magnitude_always_in_range() {
        let c = controller();
        let samples = [
            i32::MIN,
            i32::MIN + 1,
            -70_000,
            -201,
            -200,
            -21,
            -20,
            -19,
            -1,
            0,
            1,
            19,
            20,
            21,
            199,
            200,
            201,
            65_536,
            i32::MAX - 1,
            i32::MAX,
        ];
        for &target in &samples {
            for &current in &samples {
                let cmd = c.compute(target, current);
                let error = target as i64 - current as i64;
                assert!(cmd.magnitude <= 200);
                assert_eq!(cmd.direction, Direction::from_sign(error));
                let abs = error.unsigned_abs();
                if abs > 0 && abs < 20 {
                    assert_eq!(cmd.magnitude, 20);
                }
                if abs > 200 {
                    assert_eq!(cmd.magnitude, 200);
                }
            }
        }
    }

    #[test]
    fn test_custom_limits() {
        let limits = SpeedLimits::new(0, 50).unwrap();
        let c = AutomaticController::new(limits);
        assert_eq!(c.compute(3, 0).magnitude, 3);
        assert_eq!(c.compute(-90, 0), MotorCommand::new(Direction::Reverse, 50));
    }
}
