use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::info;

use super::{Color, MeshExporter, GLASS_COLOR};
use crate::error::{ExportError, Result};
use crate::solid::Material;
use crate::synthesis::BuildingMesh;
use crate::tessellation::{TessellateSolid, TriangleMesh};

/// Wavefront OBJ exporter. Writes `<name>.obj` and a sibling `<name>.mtl`
/// with one material for the building and one for glass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjExporter;

impl ObjExporter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Writes the geometry, one object per material.
    ///
    /// # Errors
    ///
    /// Returns any error from `out`.
    pub fn write_obj(
        &self,
        mesh: &BuildingMesh,
        mtl_name: &str,
        out: &mut impl Write,
    ) -> io::Result<()> {
        let merged = mesh.merged();
        writeln!(out, "# placesmith building, {} floors", mesh.floors)?;
        writeln!(out, "mtllib {mtl_name}")?;

        let mut written = 0u32;
        for material in [Material::Building, Material::Glass] {
            let part = TessellateSolid::new(&merged).only(material).execute();
            if part.is_empty() {
                continue;
            }
            let name = material_name(material);
            writeln!(out, "o {name}")?;
            writeln!(out, "usemtl {name}")?;
            written = write_triangles(&part, written, out)?;
        }
        Ok(())
    }

    /// Writes the material library.
    ///
    /// # Errors
    ///
    /// Returns any error from `out`.
    pub fn write_mtl(&self, color: Color, out: &mut impl Write) -> io::Result<()> {
        for (material, [r, g, b]) in [(Material::Building, color), (Material::Glass, GLASS_COLOR)] {
            writeln!(out, "newmtl {}", material_name(material))?;
            writeln!(out, "Kd {r} {g} {b}")?;
            if material == Material::Glass {
                writeln!(out, "d 0.6")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

impl MeshExporter for ObjExporter {
    fn export(&self, mesh: &BuildingMesh, color: Color, path: &Path) -> Result<()> {
        if mesh.parts.is_empty() {
            return Err(ExportError::Empty.into());
        }
        let mtl_path = path.with_extension("mtl");
        let mtl_name = mtl_path
            .file_name()
            .map_or_else(|| "building.mtl".into(), |n| n.to_string_lossy());

        let mut obj = BufWriter::new(File::create(path).map_err(ExportError::from)?);
        self.write_obj(mesh, &mtl_name, &mut obj)
            .and_then(|()| obj.flush())
            .map_err(ExportError::from)?;

        let mut mtl = BufWriter::new(File::create(&mtl_path).map_err(ExportError::from)?);
        self.write_mtl(color, &mut mtl)
            .and_then(|()| mtl.flush())
            .map_err(ExportError::from)?;

        info!(
            path = %path.display(),
            triangles = mesh.triangle_count(),
            "building exported"
        );
        Ok(())
    }
}

fn material_name(material: Material) -> &'static str {
    match material {
        Material::Building => "building",
        Material::Glass => "glass",
    }
}

/// Writes vertices, normals and faces. OBJ indices are 1-based and global
/// across objects, so `offset` counts vertices already written.
fn write_triangles(mesh: &TriangleMesh, offset: u32, out: &mut impl Write) -> io::Result<u32> {
    for v in &mesh.vertices {
        writeln!(out, "v {:.6} {:.6} {:.6}", v.x, v.y, v.z)?;
    }
    for n in &mesh.normals {
        writeln!(out, "vn {:.6} {:.6} {:.6}", n.x, n.y, n.z)?;
    }
    for [a, b, c] in &mesh.indices {
        let (a, b, c) = (a + offset + 1, b + offset + 1, c + offset + 1);
        writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }
    #[allow(clippy::cast_possible_truncation)]
    let count = mesh.vertices.len() as u32;
    Ok(offset + count)
}
