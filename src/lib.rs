//! 単軸DCモーターサーボのコアロジック
//!
//! ハードウェアに依存しない部分（位置カウンタ、制御則、モード遷移、
//! コマンド解析、テレメトリ）をまとめています。ファームウェア本体
//! （`src/main.rs`）はこれらをembassyのタスクとペリフェラルに接続します。
//! ホスト上で `cargo test` できるよう、テスト時のみ `std` を使います。

#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod command;
pub mod config;
pub mod control;
pub mod error;
pub mod mode;
pub mod motor_driver;
pub mod position;
pub mod telemetry;

#[cfg(test)]
mod testing;

pub use command::{CommandSource, LineParser};
pub use config::SpeedLimits;
pub use control::{Direction, MotorCommand};
pub use error::{ConfigError, ParseError};
pub use mode::{ModeStateMachine, OperatingMode};
pub use motor_driver::MotorDriver;
pub use position::PositionCounter;
pub use telemetry::{Telemetry, TelemetryEvent};
