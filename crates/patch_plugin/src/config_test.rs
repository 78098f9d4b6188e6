use super::*;
use crate::test_utils::ScriptedQuadTree;

#[test]
fn test_default_config_is_valid() {
  let config = PatchConfig::default();
  assert_eq!(config.validate(), Ok(()));
  assert_eq!(config.cleanup_delay, Duration::from_secs(20));
  assert_eq!(config.max_cleanup_count, 64);
}

#[test]
fn test_for_tree_copies_depth_range() {
  let tree = ScriptedQuadTree::new(2, 9);
  let config = PatchConfig::for_tree(&tree);
  assert_eq!(config.min_depth, 2);
  assert_eq!(config.max_depth, 9);
  assert_eq!(config.max_cleanup_count, MAX_CLEANUP_COUNT);
}

#[test]
fn test_contains_depth_is_inclusive() {
  let config = PatchConfig {
    min_depth: 1,
    max_depth: 4,
    ..Default::default()
  };
  assert!(!config.contains_depth(0));
  assert!(config.contains_depth(1));
  assert!(config.contains_depth(4));
  assert!(!config.contains_depth(5));
}

#[test]
fn test_validate_rejects_inverted_range() {
  let config = PatchConfig {
    min_depth: 5,
    max_depth: 3,
    ..Default::default()
  };
  assert!(matches!(config.validate(), Err(PatchError::InvalidConfig(_))));
}

#[test]
fn test_validate_rejects_unsupported_depth() {
  let config = PatchConfig {
    max_depth: MAX_SUPPORTED_DEPTH + 1,
    ..Default::default()
  };
  assert!(matches!(config.validate(), Err(PatchError::InvalidConfig(_))));
}

#[test]
fn test_validate_rejects_zero_cleanup_count() {
  let config = PatchConfig {
    max_cleanup_count: 0,
    ..Default::default()
  };
  assert!(matches!(config.validate(), Err(PatchError::InvalidConfig(_))));
}
