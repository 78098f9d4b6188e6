//! Bevy components for patch rendering.

use bevy::prelude::*;
use patch_plugin::{RenderMode, TileCoordinate};

/// Component for entities representing one terrain patch.
///
/// Visibility is carried by Bevy's own `Visibility`; this only records which
/// cell the entity stands for and how it is shaded.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatchTile {
  pub coordinate: TileCoordinate,
  pub render_mode: RenderMode,
}
