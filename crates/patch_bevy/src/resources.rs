//! Bevy resources for patch LOD management.

use std::collections::HashMap;
use std::time::Duration;

use bevy::prelude::*;
use crossbeam_channel::Receiver;
use patch_plugin::{
  register_patch_command, CommandDispatcher, ManualClock, PatchConfig, PatchError, PatchHandle,
  PatchManager, TileCoordinate,
};

use crate::presentation::{EntityFactory, TileOp};

/// Manager type owned by the Bevy world. Its clock is stepped from `Time`.
pub type BevyPatchManager = PatchManager<EntityFactory, ManualClock>;

/// Bridge configuration. Insert before adding [`crate::PatchBevyPlugin`] to
/// override the defaults.
#[derive(Resource, Clone, Debug)]
pub struct PatchBevySettings {
  /// How often a cleanup sweep is queued.
  pub cleanup_interval: Duration,
  /// Depth range and eviction policy of the manager.
  pub patch: PatchConfig,
  /// Depth switched to on startup, if any.
  pub initial_depth: Option<u8>,
  /// World-space edge length of the depth-0 patch.
  pub world_size: f32,
}

impl Default for PatchBevySettings {
  fn default() -> Self {
    Self {
      cleanup_interval: Duration::from_secs(5),
      patch: PatchConfig::default(),
      initial_depth: Some(0),
      world_size: 1024.0,
    }
  }
}

/// Resource owning the patch manager and the renderer-side op stream.
#[derive(Resource)]
pub struct PatchLodState {
  pub manager: BevyPatchManager,
  handle: PatchHandle,
  ops: Receiver<TileOp>,
}

impl PatchLodState {
  pub fn new(config: PatchConfig) -> Result<Self, PatchError> {
    let (factory, ops) = EntityFactory::channel();
    let manager = PatchManager::detached(factory, ManualClock::new(), config)?;
    let handle = manager.handle();
    Ok(Self {
      manager,
      handle,
      ops,
    })
  }

  /// Sender for queueing depth switches, node changes and mode changes.
  pub fn handle(&self) -> &PatchHandle {
    &self.handle
  }

  /// Queue a global depth switch for the next frame.
  pub fn request_depth(&self, depth: u8) -> bool {
    self.handle.change_depth(depth)
  }

  pub(crate) fn drain_ops(&self) -> impl Iterator<Item = TileOp> + '_ {
    self.ops.try_iter()
  }
}

/// Resource mapping patch coordinates to their entities.
#[derive(Resource, Default)]
pub struct PatchEntityMap {
  pub map: HashMap<TileCoordinate, Entity>,
}

impl PatchEntityMap {
  pub fn insert(&mut self, coordinate: TileCoordinate, entity: Entity) -> Option<Entity> {
    self.map.insert(coordinate, entity)
  }

  pub fn remove(&mut self, coordinate: &TileCoordinate) -> Option<Entity> {
    self.map.remove(coordinate)
  }

  pub fn get(&self, coordinate: &TileCoordinate) -> Option<Entity> {
    self.map.get(coordinate).copied()
  }

  pub fn len(&self) -> usize {
    self.map.len()
  }

  pub fn is_empty(&self) -> bool {
    self.map.is_empty()
  }
}

/// Repeating timer queueing cleanup sweeps.
#[derive(Resource)]
pub struct CleanupTimer(pub Timer);

impl CleanupTimer {
  pub fn new(interval: Duration) -> Self {
    Self(Timer::new(interval, TimerMode::Repeating))
  }
}

/// Console input and output for the command dispatcher.
///
/// Lines submitted here are executed against the manager on the next frame;
/// each produces one entry in `responses`, errors included.
#[derive(Resource)]
pub struct PatchConsole {
  pub dispatcher: CommandDispatcher<BevyPatchManager>,
  pending: Vec<String>,
  pub responses: Vec<String>,
}

impl Default for PatchConsole {
  fn default() -> Self {
    let mut dispatcher = CommandDispatcher::new();
    register_patch_command(&mut dispatcher);
    Self {
      dispatcher,
      pending: Vec::new(),
      responses: Vec::new(),
    }
  }
}

impl PatchConsole {
  pub fn submit(&mut self, line: impl Into<String>) {
    self.pending.push(line.into());
  }

  pub fn take_responses(&mut self) -> Vec<String> {
    std::mem::take(&mut self.responses)
  }

  pub(crate) fn take_pending(&mut self) -> Vec<String> {
    std::mem::take(&mut self.pending)
  }
}
