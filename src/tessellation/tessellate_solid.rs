use super::TriangleMesh;
use crate::solid::{Material, Solid};

/// Fan-triangulates the convex faces of a solid into a triangle soup.
///
/// Every face contributes its own vertices with the face normal, so the mesh
/// renders flat-shaded.
pub struct TessellateSolid<'a> {
    solid: &'a Solid,
    material: Option<Material>,
}

impl<'a> TessellateSolid<'a> {
    /// Creates a new `TessellateSolid` operation over every face.
    #[must_use]
    pub fn new(solid: &'a Solid) -> Self {
        Self {
            solid,
            material: None,
        }
    }

    /// Restricts the output to faces of one material.
    #[must_use]
    pub fn only(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Executes the tessellation.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self) -> TriangleMesh {
        let mut mesh = TriangleMesh::default();
        let faces = self
            .solid
            .faces()
            .iter()
            .filter(|f| self.material.map_or(true, |m| f.material == m));

        for face in faces {
            let base = mesh.vertices.len() as u32;
            mesh.vertices.extend_from_slice(&face.vertices);
            mesh.normals
                .extend(std::iter::repeat(face.plane.normal).take(face.vertices.len()));
            for i in 1..face.vertices.len().saturating_sub(1) as u32 {
                mesh.indices.push([base, base + i, base + i + 1]);
            }
        }
        mesh
    }
}
