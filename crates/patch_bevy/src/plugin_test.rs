//! Headless plugin tests driven through a manual frame loop.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use patch_plugin::{PatchConfig, RenderMode, TileCoordinate};

use super::*;

/// Virtual time advanced per `app.update()`.
const FRAME: Duration = Duration::from_secs(3);

fn test_app(initial_depth: Option<u8>) -> App {
  let mut app = App::new();
  app.add_plugins(MinimalPlugins);
  app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
  app
    .world_mut()
    .resource_mut::<Time<Virtual>>()
    .set_max_delta(Duration::from_secs(10));

  app.insert_resource(PatchBevySettings {
    patch: PatchConfig {
      max_depth: 4,
      ..PatchConfig::default()
    },
    initial_depth,
    ..PatchBevySettings::default()
  });
  app.add_plugins(PatchBevyPlugin);

  // First frame runs Startup and has a zero time delta.
  app.update();
  app
}

fn patch_entities(app: &mut App) -> Vec<(PatchTile, Visibility)> {
  let mut query = app.world_mut().query::<(&PatchTile, &Visibility)>();
  query
    .iter(app.world())
    .map(|(tile, visibility)| (*tile, *visibility))
    .collect()
}

fn visible_depths(app: &mut App) -> Vec<u8> {
  let mut depths: Vec<u8> = patch_entities(app)
    .into_iter()
    .filter(|(_, v)| *v == Visibility::Visible)
    .map(|(tile, _)| tile.coordinate.depth)
    .collect();
  depths.sort_unstable();
  depths.dedup();
  depths
}

fn request_depth(app: &mut App, depth: u8) {
  app.world().resource::<PatchLodState>().request_depth(depth);
  app.update();
}

// =============================================================================
// Startup and depth switching
// =============================================================================

#[test]
fn test_initial_depth_spawns_full_grid() {
  let mut app = test_app(Some(1));

  let entities = patch_entities(&mut app);
  assert_eq!(entities.len(), 4);
  assert!(entities.iter().all(|(_, v)| *v == Visibility::Visible));
  assert_eq!(app.world().resource::<PatchEntityMap>().len(), 4);
  assert_eq!(
    app.world().resource::<PatchLodState>().manager.active_depth(),
    Some(1)
  );
}

#[test]
fn test_no_initial_depth_spawns_nothing() {
  let mut app = test_app(None);
  assert!(patch_entities(&mut app).is_empty());
}

#[test]
fn test_depth_switch_hides_previous_level() {
  let mut app = test_app(Some(1));

  request_depth(&mut app, 2);

  assert_eq!(patch_entities(&mut app).len(), 20);
  assert_eq!(visible_depths(&mut app), vec![2]);

  request_depth(&mut app, 1);
  assert_eq!(patch_entities(&mut app).len(), 20, "cached level reused");
  assert_eq!(visible_depths(&mut app), vec![1]);
}

#[test]
fn test_patch_transform_covers_grid() {
  let transform = systems::entities::patch_transform(TileCoordinate::new(0, 0, 1), 100.0);
  assert_eq!(transform.translation, Vec3::new(-25.0, 0.0, -25.0));
  assert_eq!(transform.scale, Vec3::new(50.0, 1.0, 50.0));
}

#[test]
fn test_node_change_spawns_single_patch() {
  let mut app = test_app(None);

  app
    .world()
    .resource::<PatchLodState>()
    .manager
    .listener()
    .node_changed(3, 2, 3, true);
  app.update();

  let entities = patch_entities(&mut app);
  assert_eq!(entities.len(), 1);
  assert_eq!(entities[0].0.coordinate, TileCoordinate::new(3, 2, 3));
  assert_eq!(entities[0].1, Visibility::Visible);
}

// =============================================================================
// Cleanup cadence
// =============================================================================

/// Hidden at t=3s; sweeps every 5s; first sweep past t=23s evicts.
#[test]
fn test_cleanup_despawns_stale_patches() {
  let mut app = test_app(Some(1));
  request_depth(&mut app, 2);

  // t = 18s
  for _ in 0..5 {
    app.update();
  }
  assert_eq!(patch_entities(&mut app).len(), 20);

  // t = 33s
  for _ in 0..5 {
    app.update();
  }
  let entities = patch_entities(&mut app);
  assert_eq!(entities.len(), 16);
  assert!(entities.iter().all(|(tile, _)| tile.coordinate.depth == 2));
  assert_eq!(app.world().resource::<PatchEntityMap>().len(), 16);
}

// =============================================================================
// Console and keyboard
// =============================================================================

#[test]
fn test_console_sets_mode_on_entities() {
  let mut app = test_app(Some(1));

  app
    .world_mut()
    .resource_mut::<PatchConsole>()
    .submit("patch mode terrain");
  app.update();

  let responses = app.world_mut().resource_mut::<PatchConsole>().take_responses();
  assert_eq!(responses, vec!["terrain".to_string()]);
  assert!(patch_entities(&mut app)
    .iter()
    .all(|(tile, _)| tile.render_mode == RenderMode::Terrain));
}

#[test]
fn test_console_reports_errors() {
  let mut app = test_app(Some(0));

  {
    let mut console = app.world_mut().resource_mut::<PatchConsole>();
    console.submit("patch mode");
    console.submit("patch mode wireframe");
    console.submit("teleport 1 2");
  }
  app.update();

  let responses = app.world_mut().resource_mut::<PatchConsole>().take_responses();
  assert_eq!(responses[0], "texture");
  assert_eq!(responses[1], "usage: patch mode [texture|depth|terrain]");
  assert_eq!(responses[2], "unknown command: teleport");
  assert_eq!(
    app.world().resource::<PatchLodState>().manager.render_mode(),
    RenderMode::Texture
  );
}

#[test]
fn test_keys_switch_depth_and_cycle_mode() {
  let mut app = test_app(Some(0));
  app.init_resource::<ButtonInput<KeyCode>>();

  {
    let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keys.press(KeyCode::Digit2);
    keys.press(KeyCode::KeyM);
  }
  app.update();

  assert_eq!(visible_depths(&mut app), vec![2]);
  assert_eq!(
    app.world().resource::<PatchLodState>().manager.render_mode(),
    RenderMode::Depth
  );
}
