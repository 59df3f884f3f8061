//! ハードウェア初期化モジュール
//!
//! ペリフェラルの初期化ロジックを集約します。
//!
//! ## ピン配置
//! - PA2 / PA3: USART2 TX / RX（オペレーター用シリアル）
//! - PB6: エンコーダーA相（EXTI6、立ち上がりエッジ）
//! - PB7: エンコーダーB相（方向判定用入力）
//! - PC6: TIM3_CH1（正転PWM）
//! - PC7: TIM3_CH2（逆転PWM）
//!
//! エンコーダーはPACで直接設定します（`encoder_exti`）。

use embassy_stm32::{
    bind_interrupts,
    gpio::OutputType,
    mode::Async,
    peripherals,
    time::Hertz,
    timer::{
        low_level::CountingMode,
        simple_pwm::{PwmPin, SimplePwm, SimplePwmChannel},
    },
    usart::{self, Uart, UartRx, UartTx},
    Config, Peri,
};

use dc_servo::config;
use dc_servo::MotorDriver;

use crate::encoder_exti;
use crate::fmt::*;

// USART2の割り込みをバインド
bind_interrupts!(pub struct Irqs {
    USART2 => usart::InterruptHandler<peripherals::USART2>;
});

/// 正転/逆転チャネルを持つモータードライバー
pub type Driver = MotorDriver<
    SimplePwmChannel<'static, peripherals::TIM3>,
    SimplePwmChannel<'static, peripherals::TIM3>,
>;

/// RCCクロック設定を初期化
///
/// HSI → PLL（÷4 × 85 ÷ 2）で170MHz生成
pub fn create_clock_config() -> Config {
    let mut config = Config::default();
    {
        use embassy_stm32::rcc::{Pll, PllMul, PllPreDiv, PllRDiv, PllSource, Sysclk};

        config.rcc.hsi = true;
        config.rcc.pll = Some(Pll {
            source: PllSource::HSI,
            prediv: PllPreDiv::DIV4,
            mul: PllMul::MUL85,
            divp: None,
            divq: None,
            divr: Some(PllRDiv::DIV2),
        });
        config.rcc.sys = Sysclk::PLL1_R; // システムクロックをPLLに設定
    }
    config
}

/// EXTI6エンコーダー入力初期化
///
/// PB6=A相（立ち上がりエッジ）、PB7=B相
///
/// # Safety
/// PACを使用した直接レジスタ操作を含む
pub unsafe fn init_encoder() {
    info!("Initializing encoder input on EXTI6...");
    encoder_exti::init_encoder();
    info!("Encoder initialized: A=PB6 (EXTI6), B=PB7");
}

/// TIM3の2チャネルPWMを初期化し、モータードライバーを作成
///
/// 両チャネルとも停止状態で有効化されます。
pub fn init_motor_driver(
    tim: Peri<'static, peripherals::TIM3>,
    forward_pin: Peri<'static, peripherals::PC6>,
    reverse_pin: Peri<'static, peripherals::PC7>,
) -> Driver {
    let pwm = SimplePwm::new(
        tim,
        Some(PwmPin::new(forward_pin, OutputType::PushPull)),
        Some(PwmPin::new(reverse_pin, OutputType::PushPull)),
        None,
        None,
        Hertz(config::pwm::DEFAULT_FREQUENCY_HZ),
        CountingMode::EdgeAlignedUp,
    );

    let channels = pwm.split();
    let mut forward = channels.ch1;
    let mut reverse = channels.ch2;
    forward.enable();
    reverse.enable();

    info!(
        "PWM initialized: TIM3 CH1=PC6 (forward), CH2=PC7 (reverse), {}Hz",
        config::pwm::DEFAULT_FREQUENCY_HZ
    );

    // 有効化直後に両チャネルを0にする（SimplePwmChannelのエラー型はInfallible）
    match MotorDriver::new(forward, reverse) {
        Ok(driver) => driver,
        Err(never) => match never {},
    }
}

/// USART2を初期化し、送信側と受信側に分割
///
/// # 戻り値
/// 設定エラー時は `usart::ConfigError`
pub fn init_uart(
    usart: Peri<'static, peripherals::USART2>,
    tx_pin: Peri<'static, peripherals::PA2>,
    rx_pin: Peri<'static, peripherals::PA3>,
    tx_dma: Peri<'static, peripherals::DMA1_CH1>,
    rx_dma: Peri<'static, peripherals::DMA1_CH2>,
) -> Result<(UartTx<'static, Async>, UartRx<'static, Async>), usart::ConfigError> {
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = config::uart::DEFAULT_BAUDRATE;

    let uart = Uart::new(usart, rx_pin, tx_pin, Irqs, tx_dma, rx_dma, uart_config)?;
    info!(
        "USART2 initialized: TX=PA2, RX=PA3, {} baud",
        config::uart::DEFAULT_BAUDRATE
    );
    Ok(uart.split())
}
