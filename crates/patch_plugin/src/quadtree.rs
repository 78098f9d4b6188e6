//! Interface to the external quad-tree.
//!
//! The quad-tree is the sole authority on per-node visibility. The manager
//! subscribes once at construction by handing it a [`NodeListener`] and never
//! unsubscribes; the listener simply stops delivering once the manager is
//! dropped.

use crate::queue::{NodeChange, PatchHandle};

/// Quad-tree collaborator consumed by the patch manager.
pub trait QuadTree {
  /// Shallowest depth nodes can have.
  fn min_depth(&self) -> u8;

  /// Deepest depth nodes can have.
  fn max_depth(&self) -> u8;

  /// Register the listener that receives node visibility changes.
  fn subscribe(&mut self, listener: NodeListener);
}

/// Subscription given to the quad-tree.
#[derive(Clone, Debug)]
pub struct NodeListener {
  handle: PatchHandle,
}

impl NodeListener {
  pub(crate) fn new(handle: PatchHandle) -> Self {
    Self { handle }
  }

  /// Report that `change.coordinate` became visible or hidden.
  pub fn notify(&self, change: NodeChange) -> bool {
    self.handle.node_changed(change)
  }

  /// Shorthand for [`notify`](Self::notify).
  pub fn node_changed(&self, column: u32, row: u32, depth: u8, visible: bool) -> bool {
    self.notify(NodeChange::new(column, row, depth, visible))
  }
}
