//! patch_plugin - Engine independent LOD patch lifecycle for quad-tree terrain
//!
//! This crate keeps one renderable patch per quad-tree cell, per depth, and
//! keeps those patches in step with the quad-tree's view-dependent
//! visibility decisions.
//!
//! # Features
//!
//! - **Global depth switch**: show the full grid at one depth, populating it
//!   on the first visit and reusing the cached patches afterwards
//! - **Reactive sync**: quad-tree node changes create or toggle single patches
//! - **Deferred eviction**: patches hidden for more than 20 s are freed by a
//!   bounded cleanup sweep
//! - **Render mode broadcast**: texture, depth or terrain shading applied to
//!   every live patch
//! - **Console command**: `patch mode [texture|depth|terrain]`
//!
//! # Example
//!
//! ```ignore
//! use patch_plugin::{NullFactory, PatchManager, RenderMode};
//!
//! let mut manager = PatchManager::new(&mut quad_tree, NullFactory)?;
//! manager.change_depth(3)?;
//! manager.set_render_mode(RenderMode::Terrain);
//!
//! // Each frame:
//! manager.tick();
//! // Every few seconds:
//! manager.handle().cleanup();
//! ```

pub mod clock;
pub mod command;
pub mod config;
pub mod constants;
pub mod coordinate;
pub mod error;
pub mod level;
pub mod manager;
pub mod metrics;
pub mod presentation;
pub mod quadtree;
pub mod queue;
pub mod tile;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used items
pub use clock::{Clock, ManualClock, SystemClock};
pub use command::{
  register_patch_command, CommandDispatcher, ConsoleCommand, PatchCommand, RenderModeControl,
  PATCH_KEYWORD, PATCH_USAGE,
};
pub use config::PatchConfig;
pub use constants::{DURATION_TO_TRIGGER_CLEANUP, MAX_CLEANUP_COUNT, MAX_SUPPORTED_DEPTH};
pub use coordinate::TileCoordinate;
pub use error::{CommandError, PatchError, ReleaseError};
pub use level::LevelBucket;
pub use manager::{CleanupReport, DepthSwitch, NodeUpdate, PatchManager, RemoveOutcome, TickStats};
pub use metrics::PatchMetrics;
pub use presentation::{NullFactory, TileFactory};
pub use quadtree::{NodeListener, QuadTree};
pub use queue::{NodeChange, PatchHandle, PatchMessage};
pub use tile::{RenderMode, Tile};
