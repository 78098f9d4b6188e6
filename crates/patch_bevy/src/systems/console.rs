//! Console and keyboard control of the patch manager.

use bevy::prelude::*;

use crate::resources::{PatchConsole, PatchLodState};

/// Digit keys mapped to the depth they select.
const DEPTH_KEYS: [(KeyCode, u8); 10] = [
  (KeyCode::Digit0, 0),
  (KeyCode::Digit1, 1),
  (KeyCode::Digit2, 2),
  (KeyCode::Digit3, 3),
  (KeyCode::Digit4, 4),
  (KeyCode::Digit5, 5),
  (KeyCode::Digit6, 6),
  (KeyCode::Digit7, 7),
  (KeyCode::Digit8, 8),
  (KeyCode::Digit9, 9),
];

/// Execute submitted console lines against the manager.
pub fn run_console_commands(mut console: ResMut<PatchConsole>, mut state: ResMut<PatchLodState>) {
  for line in console.take_pending() {
    let response = match console.dispatcher.dispatch(&mut state.manager, &line) {
      Ok(output) => {
        info!("> {}: {}", line, output);
        output
      }
      Err(error) => {
        warn!("> {}: {}", line, error);
        error.to_string()
      }
    };
    console.responses.push(response);
  }
}

/// Digits switch depth, `M` cycles the render mode.
///
/// Skipped when no keyboard input is registered (headless apps).
pub fn handle_patch_keys(keys: Option<Res<ButtonInput<KeyCode>>>, state: Res<PatchLodState>) {
  let Some(keys) = keys else {
    return;
  };
  for (key, depth) in DEPTH_KEYS {
    if keys.just_pressed(key) {
      state.request_depth(depth);
    }
  }
  if keys.just_pressed(KeyCode::KeyM) {
    let next = state.manager.render_mode().next();
    state.handle().set_render_mode(next);
  }
}
