//! Bevy presentation layer for patch_plugin.
//!
//! This crate bridges the engine-independent patch manager with Bevy: the
//! manager lives in a resource, its patches are mirrored as entities, and
//! depth switches, cleanup sweeps and console commands are driven from
//! systems.
//!
//! An external quad-tree feeds node changes through
//! `PatchLodState::manager.listener()` or `PatchLodState::handle()`.

pub mod components;
pub mod presentation;
pub mod resources;
pub mod systems;

#[cfg(test)]
#[path = "plugin_test.rs"]
mod plugin_test;

use bevy::prelude::*;
pub use components::*;
pub use presentation::{EntityFactory, TileOp};
pub use resources::*;

/// Bevy plugin for patch LOD rendering.
///
/// Reads [`PatchBevySettings`] if one was inserted beforehand, otherwise uses
/// the defaults.
pub struct PatchBevyPlugin;

impl Plugin for PatchBevyPlugin {
  fn build(&self, app: &mut App) {
    let settings = app
      .world()
      .get_resource::<PatchBevySettings>()
      .cloned()
      .unwrap_or_default();

    let state = match PatchLodState::new(settings.patch.clone()) {
      Ok(state) => state,
      Err(error) => {
        error!("Patch plugin disabled: {}", error);
        return;
      }
    };

    app
      .insert_resource(CleanupTimer::new(settings.cleanup_interval))
      .insert_resource(settings)
      .insert_resource(state)
      .init_resource::<PatchEntityMap>()
      .init_resource::<PatchConsole>()
      .add_systems(Startup, systems::startup::request_initial_depth)
      .add_systems(
        Update,
        (
          systems::lod::advance_patch_clock,
          systems::console::handle_patch_keys,
          systems::console::run_console_commands,
          systems::lod::schedule_cleanup,
          systems::lod::tick_patch_manager,
          systems::entities::apply_tile_ops,
        )
          .chain(),
      );
  }
}
