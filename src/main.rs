#![no_std]
#![no_main]

mod encoder_exti;
mod fmt;
mod hardware;
mod state;
mod tasks;

#[cfg(not(feature = "defmt"))]
use panic_halt as _;
#[cfg(feature = "defmt")]
use {defmt_rtt as _, panic_probe as _};

use embassy_executor::Spawner;

use dc_servo::config;
use fmt::*;
use tasks::{command_rx_task, control_task, telemetry_tx_task};

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // ハードウェア初期化
    let clock_config = hardware::create_clock_config();
    let p = embassy_stm32::init(clock_config);

    info!("═══════════════════════════════════════════════════════════════════");
    info!("");
    info!("        DC Servo Controller • STM32G431VB @ 170MHz");
    info!("");
    info!(
        "        Automatic: max={} min={}  Manual: |speed|<={}",
        config::speed::DEFAULT_MAX_SPEED,
        config::speed::DEFAULT_MIN_SPEED,
        config::speed::MANUAL_SPEED_LIMIT
    );
    info!("");
    info!("═══════════════════════════════════════════════════════════════════");

    // エンコーダー初期化（EXTI9_5割り込みで直接カウント）
    // 制御ループの処理中もエッジを取りこぼさないよう、タスクではなく割り込みハンドラで処理
    unsafe {
        hardware::init_encoder();
    }

    // PWM初期化（TIM3、正転/逆転の2チャネル）
    let driver = hardware::init_motor_driver(p.TIM3, p.PC6, p.PC7);

    // USART2初期化＆受信タスク起動
    let (tx, rx) =
        hardware::init_uart(p.USART2, p.PA2, p.PA3, p.DMA1_CH1, p.DMA1_CH2).unwrap();
    spawner.spawn(command_rx_task(rx)).unwrap();
    spawner.spawn(telemetry_tx_task(tx)).unwrap();

    // 制御ループ起動
    spawner.spawn(control_task(driver)).unwrap();

    info!("All tasks started");
}
