//! Polygonal solids and the boolean operations that combine them.
//!
//! A [`Solid`] is a closed surface made of convex planar [`Face`]s. Faces carry
//! a [`Material`] so that glass panes stay distinguishable after merging.

mod boolean;
mod bsp;
mod cylinder;
mod extrude;
mod ops;
mod plane;
mod triangulate;

pub use boolean::{boolean_execute, BooleanOp};
pub use cylinder::MakeCylinder;
pub use extrude::Extrude;
pub use ops::{BspOps, SolidOps};
pub use plane::Plane;
pub use triangulate::triangulate_with_holes;

use crate::math::{Isometry3, Point3, Vector3};

/// Surface material of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Material {
    /// Opaque walls, roofs and stairs.
    Building,
    /// Translucent window panes.
    Glass,
}

/// A convex planar polygon with outward winding.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub vertices: Vec<Point3>,
    pub plane: Plane,
    pub material: Material,
}

impl Face {
    /// Creates a face, or `None` if the vertices enclose no area.
    #[must_use]
    pub fn new(vertices: Vec<Point3>, material: Material) -> Option<Self> {
        let plane = Plane::from_points(&vertices)?;
        Some(Self {
            vertices,
            plane,
            material,
        })
    }

    /// A piece of this face produced by splitting; keeps plane and material.
    pub(crate) fn fragment(&self, vertices: Vec<Point3>) -> Self {
        Self {
            vertices,
            plane: self.plane,
            material: self.material,
        }
    }

    /// Reverses the winding.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }
}

/// Axis-aligned bounds of a solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3,
    pub max: Point3,
}

/// A closed polygonal surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solid {
    faces: Vec<Face>,
}

impl Solid {
    /// Wraps faces into a solid.
    #[must_use]
    pub fn from_faces(faces: Vec<Face>) -> Self {
        Self { faces }
    }

    /// The faces of the solid.
    #[must_use]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Consumes the solid, returning its faces.
    #[must_use]
    pub fn into_faces(self) -> Vec<Face> {
        self.faces
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Retags every face with `material`.
    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        for face in &mut self.faces {
            face.material = material;
        }
        self
    }

    /// Whether any face carries `material`.
    #[must_use]
    pub fn has_material(&self, material: Material) -> bool {
        self.faces.iter().any(|f| f.material == material)
    }

    /// Applies a rigid transform to every vertex.
    #[must_use]
    pub fn transformed(self, transform: &Isometry3) -> Self {
        let faces = self
            .faces
            .into_iter()
            .filter_map(|face| {
                let vertices = face.vertices.iter().map(|v| transform * v).collect();
                Face::new(vertices, face.material)
            })
            .collect();
        Self { faces }
    }

    /// Moves the solid by `offset`.
    #[must_use]
    pub fn translated(self, offset: Vector3) -> Self {
        self.transformed(&Isometry3::translation(offset.x, offset.y, offset.z))
    }

    /// Concatenates solids without any boolean work. Materials are preserved.
    #[must_use]
    pub fn merge(solids: impl IntoIterator<Item = Solid>) -> Self {
        let faces = solids.into_iter().flat_map(Solid::into_faces).collect();
        Self { faces }
    }

    /// Enclosed volume, via the divergence theorem over fan triangles.
    #[must_use]
    pub fn volume(&self) -> f64 {
        let mut six_v = 0.0;
        for face in &self.faces {
            let v0 = face.vertices[0].coords;
            for pair in face.vertices[1..].windows(2) {
                six_v += v0.dot(&pair[0].coords.cross(&pair[1].coords));
            }
        }
        six_v / 6.0
    }

    /// Number of triangles after fan triangulation of every face.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.faces
            .iter()
            .map(|f| f.vertices.len().saturating_sub(2))
            .sum()
    }

    /// Axis-aligned bounds, or `None` for an empty solid.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        let mut vertices = self.faces.iter().flat_map(|f| f.vertices.iter());
        let first = *vertices.next()?;
        let mut bounds = Bounds {
            min: first,
            max: first,
        };
        for v in vertices {
            bounds.min = bounds.min.inf(v);
            bounds.max = bounds.max.sup(v);
        }
        Some(bounds)
    }
}
