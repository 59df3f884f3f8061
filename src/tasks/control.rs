//! 制御ループタスク
//!
//! モード遷移と制御則を周期実行します。
//! 周期はモード未選択時500ms、選択後1000msです。
//! テレメトリはチャネルへ積むだけで、シリアル送信は `telemetry_tx_task` が行います。

use embassy_time::{Duration, Timer};

use crate::fmt::*;
use crate::hardware::Driver;
use crate::state::{COMMANDS, POSITION, TELEMETRY};
use dc_servo::ModeStateMachine;

/// 制御ループタスク
#[embassy_executor::task]
pub async fn control_task(mut driver: Driver) {
    info!("Control task started");

    let mut state_machine = ModeStateMachine::default();
    let mut commands = COMMANDS.receiver();
    let mut telemetry = TELEMETRY.sender();

    loop {
        // SimplePwmChannelのエラー型はInfallibleなので失敗しない
        match state_machine.step(&POSITION, &mut commands, &mut driver, &mut telemetry) {
            Ok(()) => {}
            Err(never) => match never {},
        }

        Timer::after(Duration::from_millis(state_machine.next_delay_ms())).await;
    }
}
