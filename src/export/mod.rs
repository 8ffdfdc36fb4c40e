//! Writing generated buildings to files other tools can load.

mod obj;

pub use obj::ObjExporter;

use std::path::Path;

use crate::error::Result;
use crate::synthesis::BuildingMesh;

/// Linear RGB in `[0, 1]`.
pub type Color = [f32; 3];

/// Building color used until one is picked.
pub const DEFAULT_BUILDING_COLOR: Color = [0.8, 0.76, 0.7];

/// Fixed tint of window panes.
pub const GLASS_COLOR: Color = [0.78, 0.82, 0.85];

/// Writes a building mesh to disk.
pub trait MeshExporter {
    /// Exports `mesh` with its non-glass surfaces tinted `color`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ExportError`] if the mesh is empty or the
    /// output cannot be written.
    fn export(&self, mesh: &BuildingMesh, color: Color, path: &Path) -> Result<()>;
}
