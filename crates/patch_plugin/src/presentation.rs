//! TileFactory - callback interface to the rendering collaborator.
//!
//! The manager decides *which* patches exist; the factory owns *what* a patch
//! is on the GPU/engine side. It is called synchronously and only ever sees a
//! borrowed handle, except on `destroy` where ownership is handed back.
//!
//! # Example (engine bridge)
//!
//! ```ignore
//! struct MeshFactory { meshes: MeshPool }
//!
//! impl TileFactory for MeshFactory {
//!     type Handle = MeshId;
//!     fn create(&mut self, coordinate: TileCoordinate, mode: RenderMode) -> MeshId {
//!         self.meshes.build(coordinate, mode)
//!     }
//!     fn destroy(&mut self, coordinate: TileCoordinate, mesh: MeshId) -> Result<(), ReleaseError> {
//!         self.meshes.free(mesh).map_err(|e| ReleaseError::new(coordinate, e.to_string()))
//!     }
//! }
//! ```

use crate::coordinate::TileCoordinate;
use crate::error::ReleaseError;
use crate::tile::RenderMode;

/// Constructs and frees renderer-side patch resources.
pub trait TileFactory {
  /// Renderer resource stored inside each `Tile`.
  type Handle;

  /// Build resources for a new patch in the given mode.
  fn create(&mut self, coordinate: TileCoordinate, mode: RenderMode) -> Self::Handle;

  /// Render mode changed for an existing patch.
  fn apply_mode(&mut self, _coordinate: TileCoordinate, _handle: &mut Self::Handle, _mode: RenderMode) {}

  /// Visibility flag flipped for an existing patch.
  fn set_visible(&mut self, _coordinate: TileCoordinate, _handle: &mut Self::Handle, _visible: bool) {}

  /// Free the patch's resources. Failure is reported, never retried.
  fn destroy(&mut self, coordinate: TileCoordinate, handle: Self::Handle) -> Result<(), ReleaseError>;
}

/// No-op factory for headless operation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullFactory;

impl TileFactory for NullFactory {
  type Handle = ();

  fn create(&mut self, _coordinate: TileCoordinate, _mode: RenderMode) {}

  fn destroy(&mut self, _coordinate: TileCoordinate, _handle: ()) -> Result<(), ReleaseError> {
    Ok(())
  }
}
