//! Time sources for visibility timestamps.
//!
//! The manager never calls `Instant::now()` directly; it asks its `Clock`.
//! [`SystemClock`] reads wall time. [`ManualClock`] is stepped explicitly,
//! either by tests crossing the cleanup threshold or by an engine feeding it
//! frame deltas so that pausing the game also pauses eviction.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

// WASM compat: std::time::Instant panics on wasm32
use web_time::Instant;

/// Source of "now" for the patch manager.
pub trait Clock {
  fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  #[inline]
  fn now(&self) -> Instant {
    Instant::now()
  }
}

/// Manually advanced clock. Clones share the same offset.
#[derive(Clone, Debug)]
pub struct ManualClock {
  origin: Instant,
  offset_us: Arc<AtomicU64>,
}

impl ManualClock {
  pub fn new() -> Self {
    Self {
      origin: Instant::now(),
      offset_us: Arc::new(AtomicU64::new(0)),
    }
  }

  /// Move time forward by `delta`.
  pub fn advance(&self, delta: Duration) {
    self
      .offset_us
      .fetch_add(delta.as_micros() as u64, Ordering::Relaxed);
  }

  /// Total time advanced since creation.
  pub fn elapsed(&self) -> Duration {
    Duration::from_micros(self.offset_us.load(Ordering::Relaxed))
  }
}

impl Default for ManualClock {
  fn default() -> Self {
    Self::new()
  }
}

impl Clock for ManualClock {
  fn now(&self) -> Instant {
    self.origin + self.elapsed()
  }
}
