use web_time::Instant;

use super::*;
use crate::tile::RenderMode;

fn tile(column: u32, row: u32, depth: u8) -> Tile<u32> {
  Tile::new(
    TileCoordinate::new(column, row, depth),
    RenderMode::Texture,
    column * 100 + row,
    Instant::now(),
  )
}

#[test]
fn test_empty_bucket() {
  let bucket = LevelBucket::<u32>::new(3);
  assert!(bucket.is_empty());
  assert_eq!(bucket.depth(), 3);
  assert!(bucket.find(0, 0).is_none());
}

#[test]
fn test_find_by_column_row() {
  let mut bucket = LevelBucket::new(2);
  bucket.push(tile(0, 0, 2));
  bucket.push(tile(1, 3, 2));
  bucket.push(tile(3, 1, 2));

  let found = bucket.find(1, 3).expect("(1,3) was inserted");
  assert_eq!(*found.handle(), 103);
  assert_eq!(bucket.position(3, 1), Some(2));
  assert!(bucket.find(3, 3).is_none());
}

/// Removing from the middle keeps the survivors in insertion order.
#[test]
fn test_take_preserves_order() {
  let mut bucket = LevelBucket::new(1);
  for (c, r) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
    bucket.push(tile(c, r, 1));
  }

  let taken = bucket.take(TileCoordinate::new(1, 0, 1)).expect("present");
  assert_eq!(taken.coordinate(), TileCoordinate::new(1, 0, 1));

  let order: Vec<_> = bucket.iter().map(|t| (t.coordinate().column, t.coordinate().row)).collect();
  assert_eq!(order, vec![(0, 0), (0, 1), (1, 1)]);
  assert!(bucket.take(TileCoordinate::new(1, 0, 1)).is_none());
}

#[test]
fn test_visible_count() {
  let mut bucket = LevelBucket::new(1);
  bucket.push(tile(0, 0, 1));
  bucket.push(tile(1, 0, 1));
  assert_eq!(bucket.visible_count(), 0);

  bucket.find_mut(1, 0).unwrap().set_visible(true, Instant::now());
  assert_eq!(bucket.visible_count(), 1);
}

/// A second request for the same cell returns the existing patch untouched.
#[test]
fn test_get_or_insert_with_builds_once() {
  let mut bucket = LevelBucket::new(2);
  let coordinate = TileCoordinate::new(2, 1, 2);
  let mut builds = 0;

  let (_, created) = bucket.get_or_insert_with(coordinate, || {
    builds += 1;
    tile(2, 1, 2)
  });
  assert!(created);

  let (existing, created) = bucket.get_or_insert_with(coordinate, || {
    builds += 1;
    tile(2, 1, 2)
  });
  assert!(!created);
  assert_eq!(existing.coordinate(), coordinate);
  assert_eq!(builds, 1);
  assert_eq!(bucket.len(), 1);
}
