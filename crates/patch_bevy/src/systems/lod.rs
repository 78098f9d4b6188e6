//! Per-frame manager driving: clock, cleanup cadence and message drain.

use bevy::prelude::*;

use crate::resources::{CleanupTimer, PatchLodState};

/// Step the manager's clock by the frame delta.
///
/// Patch timestamps follow virtual time, so pausing the game also pauses
/// eviction.
pub fn advance_patch_clock(time: Res<Time>, state: Res<PatchLodState>) {
  state.manager.clock().advance(time.delta());
}

/// Queue one cleanup sweep per elapsed cleanup interval.
pub fn schedule_cleanup(
  time: Res<Time>,
  mut timer: ResMut<CleanupTimer>,
  state: Res<PatchLodState>,
) {
  timer.0.tick(time.delta());
  for _ in 0..timer.0.times_finished_this_tick() {
    state.handle().cleanup();
  }
}

/// Apply every queued patch message.
pub fn tick_patch_manager(mut state: ResMut<PatchLodState>) {
  let stats = state.manager.tick();
  if stats.messages == 0 {
    return;
  }
  if stats.depth_switches > 0 || stats.evicted > 0 {
    debug!(
      "Patch tick: {} messages, {} created, {} evicted, {} live",
      stats.messages,
      stats.tiles_created,
      stats.evicted,
      state.manager.tile_count()
    );
  }
  if stats.release_failures > 0 {
    warn!("{} patch releases failed this frame", stats.release_failures);
  }
  if stats.rejected > 0 {
    warn!("{} patch messages rejected as out of range", stats.rejected);
  }
}
