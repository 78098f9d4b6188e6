//! PatchConfig - depth range and cleanup policy for a patch manager.

use std::time::Duration;

use crate::constants::{DURATION_TO_TRIGGER_CLEANUP, MAX_CLEANUP_COUNT, MAX_SUPPORTED_DEPTH};
use crate::error::PatchError;
use crate::quadtree::QuadTree;

/// Configuration for the patch manager.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchConfig {
  /// Shallowest depth the quad-tree produces.
  pub min_depth: u8,

  /// Deepest depth the quad-tree produces.
  pub max_depth: u8,

  /// Hidden time after which a patch may be evicted.
  pub cleanup_delay: Duration,

  /// Patches examined per cleanup sweep.
  pub max_cleanup_count: usize,
}

impl PatchConfig {
  /// Config whose depth range mirrors the quad-tree's.
  pub fn for_tree<Q: QuadTree + ?Sized>(tree: &Q) -> Self {
    Self {
      min_depth: tree.min_depth(),
      max_depth: tree.max_depth(),
      ..Self::default()
    }
  }

  /// True when `depth` lies in `[min_depth, max_depth]`.
  #[inline]
  pub fn contains_depth(&self, depth: u8) -> bool {
    (self.min_depth..=self.max_depth).contains(&depth)
  }

  /// Error describing `depth` against this range.
  pub(crate) fn invalid_depth(&self, depth: u8) -> PatchError {
    PatchError::InvalidDepth {
      depth,
      min: self.min_depth,
      max: self.max_depth,
    }
  }

  pub fn validate(&self) -> Result<(), PatchError> {
    if self.min_depth > self.max_depth {
      return Err(PatchError::InvalidConfig(format!(
        "min_depth {} exceeds max_depth {}",
        self.min_depth, self.max_depth
      )));
    }
    if self.max_depth > MAX_SUPPORTED_DEPTH {
      return Err(PatchError::InvalidConfig(format!(
        "max_depth {} exceeds supported maximum {}",
        self.max_depth, MAX_SUPPORTED_DEPTH
      )));
    }
    if self.max_cleanup_count == 0 {
      return Err(PatchError::InvalidConfig(
        "max_cleanup_count must be at least 1".to_string(),
      ));
    }
    Ok(())
  }
}

impl Default for PatchConfig {
  fn default() -> Self {
    Self {
      min_depth: 0,
      max_depth: MAX_SUPPORTED_DEPTH,
      cleanup_delay: DURATION_TO_TRIGGER_CLEANUP,
      max_cleanup_count: MAX_CLEANUP_COUNT,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
