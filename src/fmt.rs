//! ログマクロ
//!
//! `defmt` フィーチャー有効時は defmt に転送し、無効時（およびホストでの
//! ユニットテスト時）は引数を評価せずに捨てます。
//! ライブラリとファームウェアの両方が `mod fmt;` として取り込みます。

#![allow(unused)]

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(all(feature = "defmt", not(test)))]
            ::defmt::trace!($s $(, $x)*);
            #[cfg(not(all(feature = "defmt", not(test))))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(all(feature = "defmt", not(test)))]
            ::defmt::debug!($s $(, $x)*);
            #[cfg(not(all(feature = "defmt", not(test))))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(all(feature = "defmt", not(test)))]
            ::defmt::info!($s $(, $x)*);
            #[cfg(not(all(feature = "defmt", not(test))))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! warn_ {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(all(feature = "defmt", not(test)))]
            ::defmt::warn!($s $(, $x)*);
            #[cfg(not(all(feature = "defmt", not(test))))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(all(feature = "defmt", not(test)))]
            ::defmt::error!($s $(, $x)*);
            #[cfg(not(all(feature = "defmt", not(test))))]
            let _ = ($( & $x ),*);
        }
    };
}

pub(crate) use {debug, error, info, trace};
pub(crate) use warn_ as warn;
