//! Test utilities: a recording renderer and a scripted quad-tree.

use std::collections::HashSet;

use crate::coordinate::TileCoordinate;
use crate::error::ReleaseError;
use crate::presentation::TileFactory;
use crate::quadtree::{NodeListener, QuadTree};
use crate::tile::RenderMode;

// =============================================================================
// Recording renderer
// =============================================================================

/// Every call the manager made on the factory, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FactoryEvent {
  Created(TileCoordinate, RenderMode),
  ModeApplied(TileCoordinate, RenderMode),
  Visibility(TileCoordinate, bool),
  Destroyed(TileCoordinate),
}

/// Factory that hands out serial handles and logs every call.
#[derive(Default)]
pub struct RecordingFactory {
  pub events: Vec<FactoryEvent>,
  next_handle: u64,
  live: HashSet<u64>,
  failing: HashSet<TileCoordinate>,
  fail_all: bool,
}

impl RecordingFactory {
  pub fn new() -> Self {
    Self::default()
  }

  /// Make releases of `coordinate` fail.
  pub fn fail_release_of(mut self, coordinate: TileCoordinate) -> Self {
    self.failing.insert(coordinate);
    self
  }

  /// Make every release fail.
  pub fn failing_releases() -> Self {
    Self {
      fail_all: true,
      ..Self::default()
    }
  }

  pub fn live_handles(&self) -> usize {
    self.live.len()
  }

  pub fn created_count(&self) -> usize {
    self
      .events
      .iter()
      .filter(|e| matches!(e, FactoryEvent::Created(..)))
      .count()
  }

  pub fn destroyed(&self) -> Vec<TileCoordinate> {
    self
      .events
      .iter()
      .filter_map(|e| match e {
        FactoryEvent::Destroyed(c) => Some(*c),
        _ => None,
      })
      .collect()
  }
}

impl TileFactory for RecordingFactory {
  type Handle = u64;

  fn create(&mut self, coordinate: TileCoordinate, mode: RenderMode) -> u64 {
    let handle = self.next_handle;
    self.next_handle += 1;
    self.live.insert(handle);
    self.events.push(FactoryEvent::Created(coordinate, mode));
    handle
  }

  fn apply_mode(&mut self, coordinate: TileCoordinate, _handle: &mut u64, mode: RenderMode) {
    self.events.push(FactoryEvent::ModeApplied(coordinate, mode));
  }

  fn set_visible(&mut self, coordinate: TileCoordinate, _handle: &mut u64, visible: bool) {
    self.events.push(FactoryEvent::Visibility(coordinate, visible));
  }

  fn destroy(&mut self, coordinate: TileCoordinate, handle: u64) -> Result<(), ReleaseError> {
    self.live.remove(&handle);
    self.events.push(FactoryEvent::Destroyed(coordinate));
    if self.fail_all || self.failing.contains(&coordinate) {
      return Err(ReleaseError::new(coordinate, "device lost"));
    }
    Ok(())
  }
}

// =============================================================================
// Scripted quad-tree
// =============================================================================

/// Quad-tree stand-in whose node visibility is set by the test.
pub struct ScriptedQuadTree {
  min_depth: u8,
  max_depth: u8,
  listener: Option<NodeListener>,
  pub subscriptions: usize,
}

impl ScriptedQuadTree {
  pub fn new(min_depth: u8, max_depth: u8) -> Self {
    Self {
      min_depth,
      max_depth,
      listener: None,
      subscriptions: 0,
    }
  }

  /// Emit a node change, as the real tree does during its update pass.
  pub fn set_node(&self, column: u32, row: u32, depth: u8, visible: bool) {
    if let Some(listener) = &self.listener {
      listener.node_changed(column, row, depth, visible);
    }
  }
}

impl QuadTree for ScriptedQuadTree {
  fn min_depth(&self) -> u8 {
    self.min_depth
  }

  fn max_depth(&self) -> u8 {
    self.max_depth
  }

  fn subscribe(&mut self, listener: NodeListener) {
    self.subscriptions += 1;
    self.listener = Some(listener);
  }
}
