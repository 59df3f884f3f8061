//! EXTI6ベースのエンコーダー入力実装
//!
//! A相の立ち上がりエッジごとに割り込みでB相のレベルを読み、
//! 位置カウンタを±1します。
//!
//! ## ハードウェア構成
//! - PB6: エンコーダーA相（EXTI6、立ち上がりエッジ）
//! - PB7: エンコーダーB相（ハンドラ内でIDRを直接読み取り）
//!
//! ## 動作原理
//! 1. A相の立ち上がりでEXTI_PR1のビット6がセットされ、EXTI9_5割り込みが発生
//! 2. ハンドラはPRをクリアしてからB相を読む（処理中の次エッジはPRに残り、再度割り込む）
//! 3. High=正転(+1)、Low=逆転(-1)としてアトミック加算
//!
//! IMRは常に有効のままなので、タスクの再ポーリングを待たずにエッジを受け付けます。

use embassy_stm32::pac;

use crate::state::POSITION;

/// A相のEXTIライン（PB6）
const LINE_A: usize = 6;

/// B相のピン番号（PB7）
const PIN_B: usize = 7;

/// SYSCFG_EXTICRのポート番号（GPIOB）
const PORT_B: u8 = 1;

/// エンコーダー入力の初期化
///
/// # Safety
/// PACを使用した直接的なレジスタ操作を含むため、unsafe
pub unsafe fn init_encoder() {
    let rcc = pac::RCC;
    let gpiob = pac::GPIOB;
    let exti = pac::EXTI;

    // 1. クロック有効化
    rcc.ahb2enr().modify(|w| w.set_gpioben(true)); // GPIOB
    rcc.apb2enr().modify(|w| w.set_syscfgen(true)); // SYSCFG（EXTIポート選択用）

    // 2. GPIO設定（PB6/PB7を入力、プルアップ）
    for pin in [LINE_A, PIN_B] {
        gpiob.moder().modify(|w| w.set_moder(pin, pac::gpio::vals::Moder::INPUT));
        gpiob.pupdr().modify(|w| w.set_pupdr(pin, pac::gpio::vals::Pupdr::PULL_UP));
    }

    // 3. EXTI6をPB6に接続（EXTICR2のEXTI6フィールド）
    pac::SYSCFG
        .exticr(LINE_A / 4)
        .modify(|w| w.set_exti(LINE_A % 4, PORT_B));

    // 4. 立ち上がりエッジのみ検出、保留フラグをクリアしてからマスク解除
    exti.rtsr(0).modify(|w| w.set_line(LINE_A, true));
    exti.ftsr(0).modify(|w| w.set_line(LINE_A, false));
    exti.pr(0).write(|w| w.set_line(LINE_A, true));
    exti.imr(0).modify(|w| w.set_line(LINE_A, true));

    // 5. 割り込み有効化（NVIC）
    // 制御ループ（スレッドモード）やUART割り込みより高優先度
    // Priority 1 = 0x10
    unsafe {
        cortex_m::peripheral::NVIC::unmask(pac::Interrupt::EXTI9_5);
        let mut cp = cortex_m::Peripherals::steal();
        cp.NVIC.set_priority(pac::Interrupt::EXTI9_5, 0x10);
    }
}

/// EXTI9_5割り込みハンドラー（A相の立ち上がりエッジ）
///
/// # Safety
/// 割り込みコンテキストで実行されるため、処理は最小限にする（ログ出力なし）
#[inline(always)]
pub unsafe fn exti9_5_irq_handler() {
    let exti = pac::EXTI;

    if exti.pr(0).read().line(LINE_A) {
        // 書き込み1でクリア（他のラインには触れない）
        exti.pr(0).write(|w| w.set_line(LINE_A, true));

        let channel_b_high = pac::GPIOB.idr().read().idr(PIN_B) == pac::gpio::vals::Idr::HIGH;
        POSITION.on_edge(channel_b_high);
    }
}

/// EXTI9_5割り込みのRust側エントリーポイント
#[allow(non_snake_case)]
#[no_mangle]
pub unsafe extern "C" fn EXTI9_5() {
    exti9_5_irq_handler();
}
