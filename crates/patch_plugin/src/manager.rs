//! PatchManager - owns every live patch and keeps it in step with the
//! quad-tree.
//!
//! # Lifecycle
//!
//! ```text
//!             node visible / change_depth          node hidden / change_depth
//!   (none) ───────────────────────────► Visible ─────────────────────────► Invisible
//!     ▲        get_or_create (hidden)      ▲                                  │
//!     │                                    └──────────────────────────────────┤
//!     │                                                                       │
//!     └──────────── cleanup (hidden > cleanup_delay) / remove / release_all ──┘
//! ```
//!
//! Levels are allocated lazily, the first time a depth receives a patch, and
//! kept afterwards even when every patch in them has been evicted.
//!
//! # Threading
//!
//! Single-threaded. Every operation runs to completion; queued messages are
//! only applied inside [`PatchManager::tick`].

use smallvec::SmallVec;
use tracing::{debug, info, warn};
use web_time::Instant;

use crate::clock::{Clock, SystemClock};
use crate::config::PatchConfig;
use crate::constants::{grid_width, DEFAULT_RENDER_MODE, MAX_CLEANUP_COUNT};
use crate::coordinate::TileCoordinate;
use crate::error::{PatchError, ReleaseError};
use crate::level::LevelBucket;
use crate::metrics::PatchMetrics;
use crate::presentation::TileFactory;
use crate::quadtree::{NodeListener, QuadTree};
use crate::queue::{Inbox, NodeChange, PatchHandle, PatchMessage};
use crate::tile::{RenderMode, Tile};

// =============================================================================
// Operation results
// =============================================================================

/// Outcome of [`PatchManager::change_depth`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DepthSwitch {
  pub depth: u8,
  /// Patches that went from visible to hidden.
  pub hidden: usize,
  /// Patches at `depth` that became visible.
  pub shown: usize,
  /// Patches constructed because the level was populated for the first time.
  pub created: usize,
}

/// Outcome of a single node-changed notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeUpdate {
  /// Hidden node with no patch; nothing created.
  Ignored,
  /// New patch constructed and shown.
  Created,
  Shown,
  Hidden,
  /// Patch already had the requested visibility.
  Unchanged,
  /// Depth or grid position out of range.
  Rejected,
}

/// Outcome of [`PatchManager::remove`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
  NotFound,
  Removed,
  /// Patch removed, but the renderer failed to free its resources.
  ReleaseFailed(ReleaseError),
}

/// Outcome of a cleanup sweep or shutdown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CleanupReport {
  /// Patches examined.
  pub scanned: usize,
  /// Patches removed, in sweep order (includes failed releases).
  pub evicted: Vec<TileCoordinate>,
  /// Release failures reported by the renderer. Non-fatal.
  pub release_failures: Vec<ReleaseError>,
}

impl CleanupReport {
  pub fn evicted_count(&self) -> usize {
    self.evicted.len()
  }
}

/// Summary of one [`PatchManager::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
  pub messages: usize,
  pub nodes_changed: usize,
  pub tiles_created: usize,
  pub depth_switches: usize,
  pub cleanups: usize,
  pub evicted: usize,
  pub release_failures: usize,
  pub mode_changes: usize,
  /// Messages whose depth or coordinate was out of range.
  pub rejected: usize,
}

// =============================================================================
// PatchManager
// =============================================================================

/// Owner of the per-depth patch buckets.
pub struct PatchManager<F: TileFactory, C: Clock = SystemClock> {
  config: PatchConfig,
  /// Indexed by depth; `None` until the depth is first populated.
  levels: Vec<Option<LevelBucket<F::Handle>>>,
  factory: F,
  clock: C,
  render_mode: RenderMode,
  active_depth: Option<u8>,
  inbox: Inbox,
  metrics: PatchMetrics,
}

impl<F: TileFactory> PatchManager<F, SystemClock> {
  /// Manager mirroring `tree`'s depth range, subscribed to its node changes.
  pub fn new<Q: QuadTree + ?Sized>(tree: &mut Q, factory: F) -> Result<Self, PatchError> {
    Self::with_clock(tree, factory, SystemClock)
  }
}

impl<F: TileFactory, C: Clock> PatchManager<F, C> {
  pub fn with_clock<Q: QuadTree + ?Sized>(
    tree: &mut Q,
    factory: F,
    clock: C,
  ) -> Result<Self, PatchError> {
    let config = PatchConfig::for_tree(tree);
    Self::with_config(tree, factory, clock, config)
  }

  pub fn with_config<Q: QuadTree + ?Sized>(
    tree: &mut Q,
    factory: F,
    clock: C,
    config: PatchConfig,
  ) -> Result<Self, PatchError> {
    let manager = Self::detached(factory, clock, config)?;
    tree.subscribe(manager.listener());
    Ok(manager)
  }

  /// Manager with no quad-tree subscription. Node changes can still be fed
  /// through [`listener`](Self::listener) or [`on_node_changed`](Self::on_node_changed).
  pub fn detached(factory: F, clock: C, config: PatchConfig) -> Result<Self, PatchError> {
    config.validate()?;
    let levels = (0..=config.max_depth).map(|_| None).collect();
    debug!(
      min_depth = config.min_depth,
      max_depth = config.max_depth,
      "patch manager created"
    );
    Ok(Self {
      config,
      levels,
      factory,
      clock,
      render_mode: DEFAULT_RENDER_MODE,
      active_depth: None,
      inbox: Inbox::new(),
      metrics: PatchMetrics::new(),
    })
  }

  // ---------------------------------------------------------------------------
  // Accessors
  // ---------------------------------------------------------------------------

  #[inline]
  pub fn config(&self) -> &PatchConfig {
    &self.config
  }

  #[inline]
  pub fn render_mode(&self) -> RenderMode {
    self.render_mode
  }

  /// Depth of the last successful `change_depth`.
  #[inline]
  pub fn active_depth(&self) -> Option<u8> {
    self.active_depth
  }

  #[inline]
  pub fn factory(&self) -> &F {
    &self.factory
  }

  #[inline]
  pub fn clock(&self) -> &C {
    &self.clock
  }

  #[inline]
  pub fn metrics(&self) -> &PatchMetrics {
    &self.metrics
  }

  /// Sender for queueing work on this manager.
  pub fn handle(&self) -> PatchHandle {
    PatchHandle::new(self.inbox.sender.clone())
  }

  /// Subscription for a quad-tree.
  pub fn listener(&self) -> NodeListener {
    NodeListener::new(self.handle())
  }

  pub fn level(&self, depth: u8) -> Option<&LevelBucket<F::Handle>> {
    self.levels.get(depth as usize).and_then(Option::as_ref)
  }

  pub fn is_level_initialized(&self, depth: u8) -> bool {
    self.level(depth).is_some()
  }

  /// Every live patch, shallow levels first, insertion order within a level.
  pub fn tiles(&self) -> impl Iterator<Item = &Tile<F::Handle>> {
    self.levels.iter().flatten().flat_map(|bucket| bucket.iter())
  }

  pub fn tile_count(&self) -> usize {
    self.levels.iter().flatten().map(LevelBucket::len).sum()
  }

  pub fn tile_count_at(&self, depth: u8) -> usize {
    self.level(depth).map_or(0, LevelBucket::len)
  }

  pub fn visible_count(&self) -> usize {
    self.levels.iter().flatten().map(LevelBucket::visible_count).sum()
  }

  // ---------------------------------------------------------------------------
  // Lookup and creation
  // ---------------------------------------------------------------------------

  /// Patch at `(column, row, depth)`. None for out-of-range depths and
  /// unpopulated cells.
  pub fn find(&self, column: u32, row: u32, depth: u8) -> Option<&Tile<F::Handle>> {
    if !self.config.contains_depth(depth) {
      return None;
    }
    self.level(depth)?.find(column, row)
  }

  /// Patch at `(column, row, depth)`, constructing it (hidden, in the current
  /// render mode) if missing.
  pub fn get_or_create(
    &mut self,
    column: u32,
    row: u32,
    depth: u8,
  ) -> Result<&Tile<F::Handle>, PatchError> {
    let coordinate = TileCoordinate::new(column, row, depth);
    self.check_coordinate(coordinate)?;
    let now = self.clock.now();
    let (tile, created) = ensure_tile(
      &mut self.levels,
      &mut self.factory,
      coordinate,
      self.render_mode,
      now,
    );
    if created {
      self.metrics.record_created(depth);
    }
    Ok(tile)
  }

  fn check_coordinate(&self, coordinate: TileCoordinate) -> Result<(), PatchError> {
    if !self.config.contains_depth(coordinate.depth) {
      return Err(self.config.invalid_depth(coordinate.depth));
    }
    match coordinate.grid_width() {
      Some(width) if !coordinate.is_in_grid() => Err(PatchError::OutOfGrid { coordinate, width }),
      Some(_) => Ok(()),
      None => Err(self.config.invalid_depth(coordinate.depth)),
    }
  }

  // ---------------------------------------------------------------------------
  // Depth switching
  // ---------------------------------------------------------------------------

  /// Global LOD switch: hide everything, then show (and on first visit,
  /// populate) the whole grid at `depth`.
  #[tracing::instrument(skip_all, name = "patch::change_depth")]
  pub fn change_depth(&mut self, depth: u8) -> Result<DepthSwitch, PatchError> {
    let Some(width) = grid_width(depth).filter(|_| self.config.contains_depth(depth)) else {
      warn!(depth, "change_depth rejected: depth out of range");
      return Err(self.config.invalid_depth(depth));
    };

    let now = self.clock.now();
    let mut switch = DepthSwitch {
      depth,
      ..Default::default()
    };

    for bucket in self.levels.iter_mut().flatten() {
      for tile in bucket.iter_mut() {
        if apply_visibility(&mut self.factory, tile, false, now) {
          switch.hidden += 1;
        }
      }
    }

    let slot = depth as usize;
    if self.levels[slot].is_none() {
      let bucket = populate_level(&mut self.factory, depth, width, self.render_mode, now);
      switch.created = bucket.len();
      switch.shown = bucket.len();
      self.metrics.record_level_populated(depth, bucket.len());
      self.levels[slot] = Some(bucket);
      debug!(depth, created = switch.created, "level populated");
    } else if let Some(bucket) = self.levels[slot].as_mut() {
      for tile in bucket.iter_mut() {
        if apply_visibility(&mut self.factory, tile, true, now) {
          switch.shown += 1;
        }
      }
    }

    self.active_depth = Some(depth);
    info!(
      depth,
      hidden = switch.hidden,
      shown = switch.shown,
      created = switch.created,
      "patch depth switched"
    );
    Ok(switch)
  }

  // ---------------------------------------------------------------------------
  // Reactive quad-tree sync
  // ---------------------------------------------------------------------------

  /// Apply one quad-tree visibility change.
  ///
  /// A hidden node without a patch is ignored; a visible node without one
  /// gets a patch.
  pub fn on_node_changed(&mut self, change: NodeChange) -> NodeUpdate {
    let coordinate = change.coordinate;
    if self.check_coordinate(coordinate).is_err() {
      warn!(%coordinate, "node change rejected: outside patch range");
      return NodeUpdate::Rejected;
    }

    let now = self.clock.now();
    let slot = coordinate.depth as usize;

    if !change.visible {
      let Some(tile) = self.levels[slot]
        .as_mut()
        .and_then(|bucket| bucket.find_mut(coordinate.column, coordinate.row))
      else {
        return NodeUpdate::Ignored;
      };
      return if apply_visibility(&mut self.factory, tile, false, now) {
        NodeUpdate::Hidden
      } else {
        NodeUpdate::Unchanged
      };
    }

    let (tile, created) = ensure_tile(
      &mut self.levels,
      &mut self.factory,
      coordinate,
      self.render_mode,
      now,
    );
    let shown = apply_visibility(&mut self.factory, tile, true, now);

    if created {
      self.metrics.record_created(coordinate.depth);
      NodeUpdate::Created
    } else if shown {
      NodeUpdate::Shown
    } else {
      NodeUpdate::Unchanged
    }
  }

  // ---------------------------------------------------------------------------
  // Eviction
  // ---------------------------------------------------------------------------

  /// Bounded sweep evicting patches hidden for longer than `cleanup_delay`.
  ///
  /// The scan itself stops after `max_cleanup_count` patches have been
  /// *examined*, whether or not they qualified. Stale patches beyond that
  /// point wait for a later sweep.
  #[tracing::instrument(skip_all, name = "patch::cleanup")]
  pub fn cleanup(&mut self) -> CleanupReport {
    let started = Instant::now();
    let now = self.clock.now();
    let limit = self.config.max_cleanup_count;
    let delay = self.config.cleanup_delay;

    let mut scanned = 0;
    let mut candidates: SmallVec<[TileCoordinate; MAX_CLEANUP_COUNT]> = SmallVec::new();
    'scan: for bucket in self.levels.iter().flatten() {
      for tile in bucket.iter() {
        if scanned >= limit {
          break 'scan;
        }
        scanned += 1;
        if tile.is_stale(now, delay) {
          candidates.push(tile.coordinate());
        }
      }
    }

    let mut report = CleanupReport {
      scanned,
      ..Default::default()
    };
    for coordinate in candidates {
      match self.remove(coordinate) {
        RemoveOutcome::NotFound => {}
        RemoveOutcome::Removed => report.evicted.push(coordinate),
        RemoveOutcome::ReleaseFailed(error) => {
          report.evicted.push(coordinate);
          report.release_failures.push(error);
        }
      }
    }

    self
      .metrics
      .record_cleanup(started.elapsed().as_micros() as u64, scanned);
    if !report.evicted.is_empty() {
      debug!(
        scanned,
        evicted = report.evicted.len(),
        failures = report.release_failures.len(),
        "cleanup sweep"
      );
    }
    report
  }

  /// Remove the patch at `coordinate` and free its resources.
  ///
  /// Removal always happens; a release failure is logged and returned.
  pub fn remove(&mut self, coordinate: TileCoordinate) -> RemoveOutcome {
    let Some(tile) = self
      .levels
      .get_mut(coordinate.depth as usize)
      .and_then(Option::as_mut)
      .and_then(|bucket| bucket.take(coordinate))
    else {
      return RemoveOutcome::NotFound;
    };

    self.metrics.record_removed(coordinate.depth);
    match self.factory.destroy(coordinate, tile.into_handle()) {
      Ok(()) => RemoveOutcome::Removed,
      Err(error) => {
        warn!(%error, "patch release failed");
        self.metrics.record_release_failure();
        RemoveOutcome::ReleaseFailed(error)
      }
    }
  }

  /// Destroy every patch and forget every level. Used on shutdown.
  pub fn release_all(&mut self) -> CleanupReport {
    let mut report = CleanupReport::default();
    for slot in self.levels.iter_mut() {
      let Some(mut bucket) = slot.take() else {
        continue;
      };
      for tile in bucket.drain() {
        let coordinate = tile.coordinate();
        report.scanned += 1;
        report.evicted.push(coordinate);
        self.metrics.record_removed(coordinate.depth);
        if let Err(error) = self.factory.destroy(coordinate, tile.into_handle()) {
          warn!(%error, "patch release failed during shutdown");
          self.metrics.record_release_failure();
          report.release_failures.push(error);
        }
      }
    }
    self.active_depth = None;
    info!(released = report.evicted.len(), "all patches released");
    report
  }

  // ---------------------------------------------------------------------------
  // Render mode
  // ---------------------------------------------------------------------------

  /// Store `mode` and apply it to every live patch. Returns the number of
  /// patches updated.
  pub fn set_render_mode(&mut self, mode: RenderMode) -> usize {
    self.render_mode = mode;
    let mut updated = 0;
    for bucket in self.levels.iter_mut().flatten() {
      for tile in bucket.iter_mut() {
        tile.set_render_mode(mode);
        self.factory.apply_mode(tile.coordinate(), tile.handle_mut(), mode);
        updated += 1;
      }
    }
    info!(%mode, updated, "patch render mode set");
    updated
  }

  // ---------------------------------------------------------------------------
  // Message queue
  // ---------------------------------------------------------------------------

  /// Drain queued messages in arrival order.
  #[tracing::instrument(skip_all, name = "patch::tick")]
  pub fn tick(&mut self) -> TickStats {
    let mut stats = TickStats::default();
    while let Ok(message) = self.inbox.receiver.try_recv() {
      stats.messages += 1;
      self.apply(message, &mut stats);
    }
    stats
  }

  fn apply(&mut self, message: PatchMessage, stats: &mut TickStats) {
    match message {
      PatchMessage::NodeChanged(change) => {
        stats.nodes_changed += 1;
        match self.on_node_changed(change) {
          NodeUpdate::Created => stats.tiles_created += 1,
          NodeUpdate::Rejected => stats.rejected += 1,
          _ => {}
        }
      }
      PatchMessage::ChangeDepth(depth) => match self.change_depth(depth) {
        Ok(switch) => {
          stats.depth_switches += 1;
          stats.tiles_created += switch.created;
        }
        Err(_) => stats.rejected += 1,
      },
      PatchMessage::Cleanup => {
        let report = self.cleanup();
        stats.cleanups += 1;
        stats.evicted += report.evicted.len();
        stats.release_failures += report.release_failures.len();
      }
      PatchMessage::SetRenderMode(mode) => {
        self.set_render_mode(mode);
        stats.mode_changes += 1;
      }
    }
  }
}

// =============================================================================
// Helpers (split borrows: levels vs. factory)
// =============================================================================

/// Single creation path: existing patch or a new hidden one from `factory`.
fn ensure_tile<'a, F: TileFactory>(
  levels: &'a mut [Option<LevelBucket<F::Handle>>],
  factory: &mut F,
  coordinate: TileCoordinate,
  mode: RenderMode,
  now: Instant,
) -> (&'a mut Tile<F::Handle>, bool) {
  let bucket =
    levels[coordinate.depth as usize].get_or_insert_with(|| LevelBucket::new(coordinate.depth));
  let (tile, created) = bucket.get_or_insert_with(coordinate, || {
    Tile::new(coordinate, mode, factory.create(coordinate, mode), now)
  });
  if created {
    debug!(%coordinate, %mode, "patch created");
  }
  (tile, created)
}

/// Full `width x width` grid at a fresh depth, row-major, every patch visible.
///
/// The level is new, so cells are appended without a lookup.
fn populate_level<F: TileFactory>(
  factory: &mut F,
  depth: u8,
  width: u32,
  mode: RenderMode,
  now: Instant,
) -> LevelBucket<F::Handle> {
  let mut bucket = LevelBucket::with_capacity(depth, (width as usize) * (width as usize));
  for row in 0..width {
    for column in 0..width {
      let coordinate = TileCoordinate::new(column, row, depth);
      let mut tile = Tile::new(coordinate, mode, factory.create(coordinate, mode), now);
      // New patches start hidden; first population shows them explicitly.
      apply_visibility(factory, &mut tile, true, now);
      bucket.push(tile);
    }
  }
  bucket
}

/// Flip a patch's visibility and tell the renderer. True if it changed.
fn apply_visibility<F: TileFactory>(
  factory: &mut F,
  tile: &mut Tile<F::Handle>,
  visible: bool,
  now: Instant,
) -> bool {
  if !tile.set_visible(visible, now) {
    return false;
  }
  let coordinate = tile.coordinate();
  factory.set_visible(coordinate, tile.handle_mut(), visible);
  true
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod manager_test;
