//! テレメトリ送信タスク
//!
//! 制御ループが積んだイベントをテキストに変換し、USART2へDMA送信します。

use embassy_stm32::{mode::Async, usart::UartTx};
use heapless::String;

use crate::fmt::*;
use crate::state::TELEMETRY;

/// 1イベント分のテキストを組み立てるバッファ長
const TELEMETRY_BUF: usize = 128;

/// テレメトリ送信タスク
#[embassy_executor::task]
pub async fn telemetry_tx_task(mut tx: UartTx<'static, Async>) {
    info!("Telemetry TX task started");

    let mut buf: String<TELEMETRY_BUF> = String::new();

    loop {
        let event = TELEMETRY.receive().await;
        info!("Telemetry: {}", event);

        buf.clear();
        if event.write_to(&mut buf).is_err() {
            warn!("Telemetry message truncated");
        }
        // 送信失敗は制御に影響させない
        if let Err(e) = tx.write(buf.as_bytes()).await {
            warn!("UART TX error: {}", e);
        }
    }
}
