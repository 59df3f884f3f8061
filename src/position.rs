//! Quadrature encoder position tracking.
//!
//! The counter is the only state shared between the encoder edge handler
//! (interrupt context) and the control loop. Every access is a single
//! atomic operation on one word, so a reader always sees either the value
//! before or after an edge, never a partial update, and the edge handler
//! never takes a lock.

use core::sync::atomic::{AtomicI32, Ordering};

/// Encoder tick counter relative to power-on.
pub struct PositionCounter {
    ticks: AtomicI32,
}

impl PositionCounter {
    /// Create a counter at position 0
    pub const fn new() -> Self {
        Self {
            ticks: AtomicI32::new(0),
        }
    }

    /// Record one rising edge on encoder channel A.
    ///
    /// # Arguments
    /// * `channel_b_high` - Level of channel B sampled at the edge.
    ///   High means forward rotation (+1), low means reverse (-1).
    ///
    /// Wraps at the `i32` limits.
    #[inline(always)]
    pub fn on_edge(&self, channel_b_high: bool) {
        let step = if channel_b_high { 1 } else { -1 };
        self.ticks.fetch_add(step, Ordering::Relaxed);
    }

    /// Current position in encoder ticks
    #[inline(always)]
    pub fn read(&self) -> i32 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl Default for PositionCounter {
    fn default() -> Self {
        Self::new()
    }
}
