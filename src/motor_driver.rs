//! モータードライバー抽象化レイヤー
//!
//! 正転用・逆転用の2チャネルPWMを隠蔽し、`MotorCommand` を適用する
//! 高レベルインターフェースを提供します。

use embedded_hal::pwm::SetDutyCycle;

use crate::config::speed::DRIVER_RESOLUTION;
use crate::control::{Direction, MotorCommand};
use crate::fmt::*;

/// 2チャネル（正転/逆転）DCモータードライバー
///
/// 非アクティブ側のチャネルを必ず先に0にしてからアクティブ側を駆動するため、
/// 過渡的にも両方向が同時に指令されることはありません。
pub struct MotorDriver<F, R> {
    forward: F,
    reverse: R,
    last_command: MotorCommand,
}

impl<F, R> MotorDriver<F, R>
where
    F: SetDutyCycle,
    R: SetDutyCycle<Error = F::Error>,
{
    /// 新しいモータードライバーを作成（両チャネル停止状態）
    ///
    /// # 引数
    /// * `forward` - 正転チャネル
    /// * `reverse` - 逆転チャネル
    pub fn new(forward: F, reverse: R) -> Result<Self, F::Error> {
        let mut driver = Self {
            forward,
            reverse,
            last_command: MotorCommand::STOP,
        };
        driver.stop()?;
        Ok(driver)
    }

    /// 指令を適用
    ///
    /// # 引数
    /// * `command` - 方向とデューティ（0..=DRIVER_RESOLUTION）
    pub fn apply(&mut self, command: MotorCommand) -> Result<(), F::Error> {
        let duty = Self::to_duty(command.magnitude);

        match command.direction {
            Direction::Forward => {
                self.reverse.set_duty_cycle_fully_off()?;
                self.forward
                    .set_duty_cycle_fraction(duty, DRIVER_RESOLUTION)?;
            }
            Direction::Reverse => {
                self.forward.set_duty_cycle_fully_off()?;
                self.reverse
                    .set_duty_cycle_fraction(duty, DRIVER_RESOLUTION)?;
            }
        }

        self.last_command = command;
        Ok(())
    }

    /// 両チャネルのDuty比を0にして停止
    pub fn stop(&mut self) -> Result<(), F::Error> {
        self.forward.set_duty_cycle_fully_off()?;
        self.reverse.set_duty_cycle_fully_off()?;
        self.last_command = MotorCommand::STOP;
        Ok(())
    }

    /// 最後に適用した指令を取得
    pub fn last_command(&self) -> MotorCommand {
        self.last_command
    }

    /// 分解能を超える値はシンクの範囲外なので飽和させる
    fn to_duty(magnitude: u32) -> u16 {
        if magnitude > DRIVER_RESOLUTION as u32 {
            warn!(
                "Duty {} exceeds driver resolution {}, saturating",
                magnitude, DRIVER_RESOLUTION
            );
            DRIVER_RESOLUTION
        } else {
            magnitude as u16
        }
    }
}
