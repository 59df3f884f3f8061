//! タスクモジュール
//!
//! 各タスクの実装を分離して管理します。

pub mod command;
pub mod control;
pub mod telemetry;

// タスク関数を再エクスポート
pub use command::command_rx_task;
pub use control::control_task;
pub use telemetry::telemetry_tx_task;
