//! モーター制御とハードウェアの設定パラメータ

use crate::error::ConfigError;

/// 速度（デューティ）関連の設定
pub mod speed {
    /// 自動モードの最大速度（クランプ値）（デフォルト値）
    pub const DEFAULT_MAX_SPEED: u16 = 200;

    /// 最小速度 [デューティ]（これ未満ではモーターが静止摩擦で動かない）（デフォルト値）
    pub const DEFAULT_MIN_SPEED: u16 = 20;

    /// PWMドライバーの分解能（8bit）
    pub const DRIVER_RESOLUTION: u16 = 255;

    /// 手動モードで受け付ける速度の絶対値の上限
    pub const MANUAL_SPEED_LIMIT: u16 = DRIVER_RESOLUTION;
}

/// 制御ループの設定
pub mod control {
    /// モード未選択時のポーリング周期 [ms]
    pub const MODE_SELECT_POLL_MS: u64 = 500;

    /// モード選択後の制御周期 [ms]
    pub const CONTROL_PERIOD_MS: u64 = 1000;

    /// 自動モードを選択するトークン（それ以外は手動モード）
    pub const AUTOMATIC_TOKEN: i32 = 1;
}

/// コマンドインターフェースの設定
pub mod command {
    /// 1行の最大長 [byte]
    pub const LINE_CAPACITY: usize = 32;

    /// 受信タスクから制御ループへのキュー深さ
    pub const QUEUE_DEPTH: usize = 4;
}

/// テレメトリ出力の設定
pub mod telemetry {
    /// 制御ループから送信タスクへのキュー深さ（1周期の最大イベント数の数倍）
    pub const QUEUE_DEPTH: usize = 8;
}

/// UART設定
pub mod uart {
    /// ボーレート（デフォルト値）
    pub const DEFAULT_BAUDRATE: u32 = 9600;
}

/// PWM設定
pub mod pwm {
    /// PWM周波数 [Hz]（デフォルト値）
    pub const DEFAULT_FREQUENCY_HZ: u32 = 1_000;
}

/// 自動モードの速度制限
///
/// `0 <= min <= max <= DRIVER_RESOLUTION` を常に満たします。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
pub struct SpeedLimits {
    min: u16,
    max: u16,
}

impl SpeedLimits {
    /// デフォルトの速度制限（コンパイル時に検証）
    pub const DEFAULT: Self = match Self::new(speed::DEFAULT_MIN_SPEED, speed::DEFAULT_MAX_SPEED) {
        Ok(limits) => limits,
        Err(_) => panic!("invalid default speed limits"),
    };

    /// 速度制限を作成
    ///
    /// # 引数
    /// * `min` - 最小速度（デッドバンド補償）
    /// * `max` - 最大速度（クランプ値）
    pub const fn new(min: u16, max: u16) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::MinAboveMax { min, max });
        }
        if max > speed::DRIVER_RESOLUTION {
            return Err(ConfigError::MaxAboveResolution {
                max,
                resolution: speed::DRIVER_RESOLUTION,
            });
        }
        Ok(Self { min, max })
    }

    /// 最小速度を取得
    pub const fn min(&self) -> u16 {
        self.min
    }

    /// 最大速度を取得
    pub const fn max(&self) -> u16 {
        self.max
    }
}

impl Default for SpeedLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}
