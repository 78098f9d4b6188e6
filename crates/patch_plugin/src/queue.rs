//! Single-threaded message queue feeding the patch manager.
//!
//! Following the Enqueue → Tick pattern: quad-tree notifications and driver
//! requests are pushed from anywhere holding a sender, and
//! `PatchManager::tick` drains them in arrival order through the same entry
//! points a direct caller would use. Nothing is applied outside `tick`, so
//! bulk operations and reactive updates never interleave.

use crossbeam_channel::{Receiver, Sender};

use crate::coordinate::TileCoordinate;
use crate::tile::RenderMode;

/// Visibility change for one quad-tree node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeChange {
  pub coordinate: TileCoordinate,
  pub visible: bool,
}

impl NodeChange {
  pub fn new(column: u32, row: u32, depth: u8, visible: bool) -> Self {
    Self {
      coordinate: TileCoordinate::new(column, row, depth),
      visible,
    }
  }
}

/// Work item for the patch manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchMessage {
  NodeChanged(NodeChange),
  ChangeDepth(u8),
  Cleanup,
  SetRenderMode(RenderMode),
}

/// Manager-owned channel pair.
pub(crate) struct Inbox {
  pub(crate) sender: Sender<PatchMessage>,
  pub(crate) receiver: Receiver<PatchMessage>,
}

impl Inbox {
  pub(crate) fn new() -> Self {
    let (sender, receiver) = crossbeam_channel::unbounded();
    Self { sender, receiver }
  }
}

/// Cloneable handle for enqueueing work on a patch manager.
///
/// Sends only fail once the manager is dropped; the return values report
/// whether the message was accepted.
#[derive(Clone, Debug)]
pub struct PatchHandle {
  sender: Sender<PatchMessage>,
}

impl PatchHandle {
  pub(crate) fn new(sender: Sender<PatchMessage>) -> Self {
    Self { sender }
  }

  pub fn send(&self, message: PatchMessage) -> bool {
    self.sender.send(message).is_ok()
  }

  pub fn change_depth(&self, depth: u8) -> bool {
    self.send(PatchMessage::ChangeDepth(depth))
  }

  pub fn cleanup(&self) -> bool {
    self.send(PatchMessage::Cleanup)
  }

  pub fn set_render_mode(&self, mode: RenderMode) -> bool {
    self.send(PatchMessage::SetRenderMode(mode))
  }

  pub fn node_changed(&self, change: NodeChange) -> bool {
    self.send(PatchMessage::NodeChanged(change))
  }
}
