//! Tuning constants for the patch lifecycle.
//!
//! ```text
//! depth d  ->  grid 2^d x 2^d  ->  4^d patches when fully populated
//!
//!   d=0   1 patch
//!   d=2   16 patches
//!   d=5   1024 patches
//! ```

use std::time::Duration;

use crate::tile::RenderMode;

/// How long a patch must stay hidden before the cleanup sweep may evict it.
pub const DURATION_TO_TRIGGER_CLEANUP: Duration = Duration::from_secs(20);

/// Upper bound on patches examined (and therefore evicted) per cleanup call.
pub const MAX_CLEANUP_COUNT: usize = 64;

/// Deepest level the manager accepts. A full level at this depth is
/// `4^10` (about one million) patches.
pub const MAX_SUPPORTED_DEPTH: u8 = 10;

/// Render mode a fresh manager starts in.
pub const DEFAULT_RENDER_MODE: RenderMode = RenderMode::Texture;

/// Number of cells per axis at `depth`. None when `2^depth` overflows `u32`.
#[inline]
pub const fn grid_width(depth: u8) -> Option<u32> {
  1u32.checked_shl(depth as u32)
}
