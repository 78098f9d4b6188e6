//! Error types for the patch core.
//!
//! Lookups never fail: a missing patch or an out-of-range depth is simply
//! `None`. Errors are reserved for requests a caller may want to observe
//! (creating outside the grid, bad configuration) and for collaborator
//! failures that are reported but never block removal.

use thiserror::Error;

use crate::coordinate::TileCoordinate;

/// Rejected input to the patch manager. State is untouched when returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
  #[error("depth {depth} is outside the supported range [{min}, {max}]")]
  InvalidDepth { depth: u8, min: u8, max: u8 },

  #[error("patch {coordinate} lies outside the {width}x{width} grid at its depth")]
  OutOfGrid { coordinate: TileCoordinate, width: u32 },

  #[error("invalid patch configuration: {0}")]
  InvalidConfig(String),
}

/// Failure reported by the rendering collaborator while freeing a patch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to release resources for patch {coordinate}: {reason}")]
pub struct ReleaseError {
  pub coordinate: TileCoordinate,
  pub reason: String,
}

impl ReleaseError {
  pub fn new(coordinate: TileCoordinate, reason: impl Into<String>) -> Self {
    Self {
      coordinate,
      reason: reason.into(),
    }
  }
}

/// Console command failure, surfaced to the operator as text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
  #[error("usage: {0}")]
  Usage(&'static str),

  #[error("unknown command: {0}")]
  UnknownCommand(String),

  #[error("empty command line")]
  Empty,
}
