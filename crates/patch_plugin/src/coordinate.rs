//! TileCoordinate - immutable value type identifying one quad-tree cell.
//!
//! Coordinates are expressed at the cell's own depth: at depth `d` the grid
//! is `2^d x 2^d` and `column, row` range over `[0, 2^d)`.
//! Depth 0 = the single root cell, higher depth = finer subdivision.

use std::fmt;

use crate::constants::grid_width;

/// Quad-tree cell address - immutable value type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct TileCoordinate {
  /// Grid column at this depth
  pub column: u32,
  /// Grid row at this depth
  pub row: u32,
  /// Subdivision level (0 = root)
  pub depth: u8,
}

impl TileCoordinate {
  pub const fn new(column: u32, row: u32, depth: u8) -> Self {
    Self { column, row, depth }
  }

  /// Cells per axis at this coordinate's depth. None past `u32` range.
  #[inline]
  pub fn grid_width(&self) -> Option<u32> {
    grid_width(self.depth)
  }

  /// True when column and row fall inside the grid for this depth.
  /// Depths with no representable grid are never in grid.
  #[inline]
  pub fn is_in_grid(&self) -> bool {
    self
      .grid_width()
      .is_some_and(|width| self.column < width && self.row < width)
  }
}

impl fmt::Display for TileCoordinate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({},{},{})", self.column, self.row, self.depth)
  }
}

#[cfg(test)]
#[path = "coordinate_test.rs"]
mod coordinate_test;
