//! Entity management for patches.

use bevy::prelude::*;
use patch_plugin::TileCoordinate;

use crate::components::PatchTile;
use crate::presentation::TileOp;
use crate::resources::{PatchBevySettings, PatchEntityMap, PatchLodState};

/// Transform placing a patch over its cell of the depth grid, centered on
/// the origin.
pub fn patch_transform(coordinate: TileCoordinate, world_size: f32) -> Transform {
  let cells = coordinate.grid_width().map_or(1.0, |width| width as f32);
  let cell = world_size / cells;
  let half = world_size * 0.5;
  Transform::from_translation(Vec3::new(
    (coordinate.column as f32 + 0.5) * cell - half,
    0.0,
    (coordinate.row as f32 + 0.5) * cell - half,
  ))
  .with_scale(Vec3::new(cell, 1.0, cell))
}

fn visibility(visible: bool) -> Visibility {
  if visible {
    Visibility::Visible
  } else {
    Visibility::Hidden
  }
}

/// Replay the factory's op stream on the ECS.
///
/// Ops for an entity spawned earlier in the same drain are applied through
/// deferred inserts, so ordering is preserved without querying.
pub fn apply_tile_ops(
  mut commands: Commands,
  settings: Res<PatchBevySettings>,
  state: Res<PatchLodState>,
  mut entity_map: ResMut<PatchEntityMap>,
) {
  for op in state.drain_ops() {
    match op {
      TileOp::Spawn { coordinate, mode } => {
        let entity = commands
          .spawn((
            PatchTile {
              coordinate,
              render_mode: mode,
            },
            patch_transform(coordinate, settings.world_size),
            Visibility::Hidden,
          ))
          .id();
        if let Some(stale) = entity_map.insert(coordinate, entity) {
          warn!("Patch {} spawned twice; despawning {:?}", coordinate, stale);
          commands.entity(stale).despawn();
        }
      }
      TileOp::SetVisible {
        coordinate,
        visible,
      } => {
        if let Some(entity) = entity_map.get(&coordinate) {
          commands.entity(entity).insert(visibility(visible));
        }
      }
      TileOp::SetMode { coordinate, mode } => {
        if let Some(entity) = entity_map.get(&coordinate) {
          commands.entity(entity).insert(PatchTile {
            coordinate,
            render_mode: mode,
          });
        }
      }
      TileOp::Despawn { coordinate } => {
        if let Some(entity) = entity_map.remove(&coordinate) {
          commands.entity(entity).despawn();
        }
      }
    }
  }
}
