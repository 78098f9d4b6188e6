//! Startup system for the initial patch depth.

use bevy::prelude::*;

use crate::resources::{PatchBevySettings, PatchLodState};

/// Queue the configured initial depth switch.
pub fn request_initial_depth(settings: Res<PatchBevySettings>, state: Res<PatchLodState>) {
  let Some(depth) = settings.initial_depth else {
    return;
  };
  info!("Requesting initial patch depth {}", depth);
  state.request_depth(depth);
}
