//! グローバル共有状態管理
//!
//! タスク間で共有される状態を管理します。
//! 位置カウンタはロックなしのアトミック、コマンドとテレメトリはチャネル経由で渡します。

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use dc_servo::config::command::QUEUE_DEPTH;
use dc_servo::config::telemetry::QUEUE_DEPTH as TELEMETRY_DEPTH;
use dc_servo::{PositionCounter, TelemetryEvent};

/// エンコーダー位置 [ticks]
/// EXTI9_5割り込みハンドラが更新し、制御ループが読み出す
pub static POSITION: PositionCounter = PositionCounter::new();

/// 受信済みコマンド（シリアル受信タスク → 制御ループ）
/// 受信順を保持し、制御ループは1周期に1つだけ取り出す
pub static COMMANDS: Channel<CriticalSectionRawMutex, i32, QUEUE_DEPTH> = Channel::new();

/// 送信待ちテレメトリ（制御ループ → テレメトリ送信タスク）
/// 満杯時は制御ループ側で破棄する
pub static TELEMETRY: Channel<CriticalSectionRawMutex, TelemetryEvent, TELEMETRY_DEPTH> =
    Channel::new();
