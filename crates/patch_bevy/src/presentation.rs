//! Entity-backed tile factory.
//!
//! The manager calls its factory synchronously, but entities can only be
//! spawned through `Commands`. [`EntityFactory`] therefore records each call
//! as a [`TileOp`] on a channel; `apply_tile_ops` replays them in order on
//! the ECS side during the same frame.

use crossbeam_channel::{Receiver, Sender};
use patch_plugin::{ReleaseError, RenderMode, TileCoordinate, TileFactory};

/// One renderer-side change requested by the manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileOp {
  Spawn {
    coordinate: TileCoordinate,
    mode: RenderMode,
  },
  SetVisible {
    coordinate: TileCoordinate,
    visible: bool,
  },
  SetMode {
    coordinate: TileCoordinate,
    mode: RenderMode,
  },
  Despawn {
    coordinate: TileCoordinate,
  },
}

impl TileOp {
  pub fn coordinate(&self) -> TileCoordinate {
    match *self {
      TileOp::Spawn { coordinate, .. }
      | TileOp::SetVisible { coordinate, .. }
      | TileOp::SetMode { coordinate, .. }
      | TileOp::Despawn { coordinate } => coordinate,
    }
  }
}

/// Factory whose patches are ECS entities keyed by coordinate.
pub struct EntityFactory {
  ops: Sender<TileOp>,
}

impl EntityFactory {
  /// Factory plus the receiving end the ECS drains.
  pub fn channel() -> (Self, Receiver<TileOp>) {
    let (ops, receiver) = crossbeam_channel::unbounded();
    (Self { ops }, receiver)
  }

  fn push(&self, op: TileOp) -> bool {
    self.ops.send(op).is_ok()
  }
}

impl TileFactory for EntityFactory {
  type Handle = ();

  fn create(&mut self, coordinate: TileCoordinate, mode: RenderMode) {
    self.push(TileOp::Spawn { coordinate, mode });
  }

  fn apply_mode(&mut self, coordinate: TileCoordinate, _handle: &mut (), mode: RenderMode) {
    self.push(TileOp::SetMode { coordinate, mode });
  }

  fn set_visible(&mut self, coordinate: TileCoordinate, _handle: &mut (), visible: bool) {
    self.push(TileOp::SetVisible {
      coordinate,
      visible,
    });
  }

  fn destroy(&mut self, coordinate: TileCoordinate, _handle: ()) -> Result<(), ReleaseError> {
    if self.push(TileOp::Despawn { coordinate }) {
      Ok(())
    } else {
      Err(ReleaseError::new(coordinate, "entity op queue disconnected"))
    }
  }
}
