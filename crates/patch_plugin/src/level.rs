//! LevelBucket - the patches living at one depth.
//!
//! Insertion order is preserved: the cleanup sweep walks buckets in this
//! order, so removal keeps the relative order of the survivors.
//! Lookups are linear; a level only holds what screen-space subdivision asks
//! for.

use crate::coordinate::TileCoordinate;
use crate::tile::Tile;

/// Ordered patches at a single depth.
#[derive(Debug)]
pub struct LevelBucket<H> {
  depth: u8,
  tiles: Vec<Tile<H>>,
}

impl<H> LevelBucket<H> {
  pub fn new(depth: u8) -> Self {
    Self {
      depth,
      tiles: Vec::new(),
    }
  }

  pub fn with_capacity(depth: u8, capacity: usize) -> Self {
    Self {
      depth,
      tiles: Vec::with_capacity(capacity),
    }
  }

  #[inline]
  pub fn depth(&self) -> u8 {
    self.depth
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.tiles.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.tiles.is_empty()
  }

  /// Index of the patch at `(column, row)`.
  pub fn position(&self, column: u32, row: u32) -> Option<usize> {
    self.tiles.iter().position(|tile| {
      let c = tile.coordinate();
      c.column == column && c.row == row
    })
  }

  pub fn find(&self, column: u32, row: u32) -> Option<&Tile<H>> {
    self.position(column, row).map(|idx| &self.tiles[idx])
  }

  pub(crate) fn find_mut(&mut self, column: u32, row: u32) -> Option<&mut Tile<H>> {
    let idx = self.position(column, row)?;
    Some(&mut self.tiles[idx])
  }

  /// Append a patch. Caller guarantees the coordinate is not present yet;
  /// this is not checked, so bulk fills stay linear.
  pub(crate) fn push(&mut self, tile: Tile<H>) -> usize {
    debug_assert_eq!(tile.coordinate().depth, self.depth);
    self.tiles.push(tile);
    self.tiles.len() - 1
  }

  /// Patch at `coordinate`, built with `make` if missing.
  ///
  /// Returns the patch and whether it was just created.
  pub(crate) fn get_or_insert_with(
    &mut self,
    coordinate: TileCoordinate,
    make: impl FnOnce() -> Tile<H>,
  ) -> (&mut Tile<H>, bool) {
    if let Some(idx) = self.position(coordinate.column, coordinate.row) {
      return (&mut self.tiles[idx], false);
    }
    let idx = self.push(make());
    (&mut self.tiles[idx], true)
  }

  /// Remove and return the patch at `coordinate`, keeping order of the rest.
  pub(crate) fn take(&mut self, coordinate: TileCoordinate) -> Option<Tile<H>> {
    let idx = self.position(coordinate.column, coordinate.row)?;
    Some(self.tiles.remove(idx))
  }

  /// Remove every patch, in insertion order.
  pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, Tile<H>> {
    self.tiles.drain(..)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Tile<H>> {
    self.tiles.iter()
  }

  pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile<H>> {
    self.tiles.iter_mut()
  }

  pub fn visible_count(&self) -> usize {
    self.tiles.iter().filter(|tile| tile.is_visible()).count()
  }
}

#[cfg(test)]
#[path = "level_test.rs"]
mod level_test;
