//! Tile ("patch") - the renderable unit bound to one quad-tree cell.
//!
//! A tile is owned by its `LevelBucket`; everything outside the manager only
//! reads it through the accessors here. The renderer-side resource lives in
//! `handle` and is opaque to the core.

use std::fmt;
use std::str::FromStr;

use web_time::Instant;

use crate::coordinate::TileCoordinate;
use crate::error::CommandError;

// =============================================================================
// RenderMode
// =============================================================================

/// How patches are drawn. Process-wide, broadcast to every live tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum RenderMode {
  #[default]
  Texture,
  Depth,
  Terrain,
}

impl RenderMode {
  pub const ALL: [RenderMode; 3] = [RenderMode::Texture, RenderMode::Depth, RenderMode::Terrain];

  /// Lowercase name, as typed on the console.
  pub fn name(self) -> &'static str {
    match self {
      RenderMode::Texture => "texture",
      RenderMode::Depth => "depth",
      RenderMode::Terrain => "terrain",
    }
  }

  /// Following mode in `ALL`, wrapping around.
  pub fn next(self) -> Self {
    match self {
      RenderMode::Texture => RenderMode::Depth,
      RenderMode::Depth => RenderMode::Terrain,
      RenderMode::Terrain => RenderMode::Texture,
    }
  }
}

impl fmt::Display for RenderMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for RenderMode {
  type Err = CommandError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    RenderMode::ALL
      .into_iter()
      .find(|mode| mode.name().eq_ignore_ascii_case(s))
      .ok_or(CommandError::Usage(crate::command::PATCH_USAGE))
  }
}

// =============================================================================
// Tile
// =============================================================================

/// One live patch.
///
/// `invisible_since` is only meaningful while `visible == false`. It is stamped
/// on every Visible -> Invisible transition and at construction (tiles start
/// hidden), and left alone on Invisible -> Visible.
#[derive(Debug)]
pub struct Tile<H> {
  coordinate: TileCoordinate,
  visible: bool,
  invisible_since: Instant,
  render_mode: RenderMode,
  handle: H,
}

impl<H> Tile<H> {
  pub(crate) fn new(coordinate: TileCoordinate, mode: RenderMode, handle: H, now: Instant) -> Self {
    Self {
      coordinate,
      visible: false,
      invisible_since: now,
      render_mode: mode,
      handle,
    }
  }

  #[inline]
  pub fn coordinate(&self) -> TileCoordinate {
    self.coordinate
  }

  #[inline]
  pub fn is_visible(&self) -> bool {
    self.visible
  }

  /// When the tile was last hidden. None while visible.
  #[inline]
  pub fn invisible_since(&self) -> Option<Instant> {
    (!self.visible).then_some(self.invisible_since)
  }

  #[inline]
  pub fn render_mode(&self) -> RenderMode {
    self.render_mode
  }

  /// Renderer-side resource.
  #[inline]
  pub fn handle(&self) -> &H {
    &self.handle
  }

  pub(crate) fn handle_mut(&mut self) -> &mut H {
    &mut self.handle
  }

  pub(crate) fn into_handle(self) -> H {
    self.handle
  }

  /// Apply a visibility change. Returns true if the flag actually flipped.
  pub(crate) fn set_visible(&mut self, visible: bool, now: Instant) -> bool {
    if self.visible == visible {
      return false;
    }
    if !visible {
      self.invisible_since = now;
    }
    self.visible = visible;
    true
  }

  pub(crate) fn set_render_mode(&mut self, mode: RenderMode) {
    self.render_mode = mode;
  }

  /// Hidden for strictly longer than `delay` as of `now`.
  pub fn is_stale(&self, now: Instant, delay: std::time::Duration) -> bool {
    !self.visible && now.saturating_duration_since(self.invisible_since) > delay
  }
}
