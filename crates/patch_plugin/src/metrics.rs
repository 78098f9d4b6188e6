//! Engine-agnostic metrics for patch lifecycle statistics.
//!
//! Feature-gated and runtime-toggled to ensure zero overhead when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use patch_plugin::metrics::COLLECT_METRICS;
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let metrics = manager.metrics();
//! println!("{} live patches, last sweep {}µs", metrics.total_tiles(), metrics.last_cleanup_us);
//! ```

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

use crate::constants::MAX_SUPPORTED_DEPTH;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

const DEPTH_SLOTS: usize = MAX_SUPPORTED_DEPTH as usize + 1;

/// Rolling window for storing recent values (e.g., timing history).
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Push a new value, evicting the oldest if at capacity.
  pub fn push(&mut self, value: T) {
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

}

impl RollingWindow<u64> {
  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.buffer.iter().sum::<u64>() as f64 / self.buffer.len() as f64
    }
  }
}

/// Patch statistics, updated by the manager as it mutates.
#[derive(Debug, Clone)]
pub struct PatchMetrics {
  /// Live patches per depth (index = depth).
  pub tiles_per_depth: [u32; DEPTH_SLOTS],

  /// Patches constructed this session.
  pub total_created: u64,
  /// Patches removed by cleanup, explicit removal or shutdown.
  pub total_evicted: u64,
  /// Removals whose resource release failed.
  pub release_failures: u64,

  /// Rolling window of cleanup sweep times in microseconds.
  pub cleanup_timings: RollingWindow<u64>,
  /// Last cleanup sweep time in microseconds.
  pub last_cleanup_us: u64,
  /// Patches examined by the last sweep.
  pub last_cleanup_scanned: usize,
}

impl Default for PatchMetrics {
  fn default() -> Self {
    Self {
      tiles_per_depth: [0; DEPTH_SLOTS],
      total_created: 0,
      total_evicted: 0,
      release_failures: 0,
      cleanup_timings: RollingWindow::new(128),
      last_cleanup_us: 0,
      last_cleanup_scanned: 0,
    }
  }
}

impl PatchMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record_created(&mut self, depth: u8) {
    if !is_enabled() {
      return;
    }
    let idx = (depth as usize).min(DEPTH_SLOTS - 1);
    self.tiles_per_depth[idx] += 1;
    self.total_created += 1;
  }

  pub fn record_level_populated(&mut self, depth: u8, count: usize) {
    if !is_enabled() {
      return;
    }
    let idx = (depth as usize).min(DEPTH_SLOTS - 1);
    self.tiles_per_depth[idx] += count as u32;
    self.total_created += count as u64;
  }

  pub fn record_removed(&mut self, depth: u8) {
    if !is_enabled() {
      return;
    }
    let idx = (depth as usize).min(DEPTH_SLOTS - 1);
    self.tiles_per_depth[idx] = self.tiles_per_depth[idx].saturating_sub(1);
    self.total_evicted += 1;
  }

  pub fn record_release_failure(&mut self) {
    if is_enabled() {
      self.release_failures += 1;
    }
  }

  pub fn record_cleanup(&mut self, timing_us: u64, scanned: usize) {
    if is_enabled() {
      self.cleanup_timings.push(timing_us);
      self.last_cleanup_us = timing_us;
      self.last_cleanup_scanned = scanned;
    }
  }

  pub fn total_tiles(&self) -> u32 {
    self.tiles_per_depth.iter().sum()
  }

  pub fn avg_cleanup_timing_us(&self) -> f64 {
    self.cleanup_timings.average()
  }
}
