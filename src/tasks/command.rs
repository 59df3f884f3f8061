//! シリアル受信タスク
//!
//! USART2から受信したバイト列を行単位で解析し、整数コマンドを
//! 制御ループ向けのチャネルへ送ります。

use embassy_stm32::{mode::Async, usart::UartRx};

use crate::fmt::*;
use crate::state::COMMANDS;
use dc_servo::LineParser;

/// 1回の受信で読み出す最大バイト数
const RX_CHUNK: usize = 16;

/// シリアル受信タスク
#[embassy_executor::task]
pub async fn command_rx_task(mut rx: UartRx<'static, Async>) {
    info!("Command RX task started");

    let mut parser = LineParser::new();
    let mut buf = [0u8; RX_CHUNK];

    loop {
        let len = match rx.read_until_idle(&mut buf).await {
            Ok(len) => len,
            Err(e) => {
                // 欠落したバイトを含む行は受け付けない
                warn!("UART RX error: {}", e);
                parser.abort();
                continue;
            }
        };

        for &byte in &buf[..len] {
            match parser.push(byte) {
                Some(Ok(value)) => {
                    debug!("Command received: {}", value);
                    // 制御ループ側が満杯なら空くまで待つ（受信順を保持）
                    COMMANDS.send(value).await;
                }
                Some(Err(e)) => warn!("Malformed command line: {}", e),
                None => {}
            }
        }
    }
}
