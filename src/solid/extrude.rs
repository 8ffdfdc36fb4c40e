use super::{triangulate_with_holes, Face, Material, Solid};
use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::{Point2, Point3, TOLERANCE};

/// Extrudes a horizontal profile, given as `(x, z)` points, vertically from
/// `bottom` to `top`.
///
/// Profiles may have holes. Convex profiles without holes get one face per
/// cap; anything else has its caps triangulated.
pub struct Extrude {
    profile: Vec<Point2>,
    holes: Vec<Vec<Point2>>,
    bottom: f64,
    top: f64,
    material: Material,
}

impl Extrude {
    /// Creates a new `Extrude` operation.
    #[must_use]
    pub fn new(profile: Vec<Point2>, bottom: f64, top: f64) -> Self {
        Self {
            profile,
            holes: Vec::new(),
            bottom,
            top,
            material: Material::Building,
        }
    }

    /// Cuts holes through the extrusion.
    #[must_use]
    pub fn with_holes(mut self, holes: Vec<Vec<Point2>>) -> Self {
        self.holes = holes;
        self
    }

    /// Sets the face material of the result.
    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Executes the extrusion.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonPositive`] if `top` is not above `bottom`,
    /// and [`GeometryError::Degenerate`] if the profile or a hole encloses no
    /// area.
    pub fn execute(&self) -> Result<Solid> {
        let height = self.top - self.bottom;
        if height <= TOLERANCE {
            return Err(GeometryError::NonPositive {
                parameter: "extrusion height",
                value: height,
            }
            .into());
        }
        let outer = oriented(&self.profile, true)?;
        let holes = self
            .holes
            .iter()
            .map(|h| oriented(h, false))
            .collect::<Result<Vec<_>>>()?;

        let mut faces = Vec::new();

        if holes.is_empty() && is_convex(&outer) {
            self.push_caps(&mut faces, &outer);
        } else {
            for triangle in triangulate_with_holes(&outer, &holes)? {
                self.push_caps(&mut faces, &triangle);
            }
        }

        self.push_sides(&mut faces, &outer);
        for hole in &holes {
            self.push_sides(&mut faces, hole);
        }

        Ok(Solid::from_faces(faces))
    }

    /// Adds the bottom and top caps of one counter-clockwise piece.
    fn push_caps(&self, faces: &mut Vec<Face>, piece: &[Point2]) {
        let bottom: Vec<Point3> = piece.iter().map(|p| at(p, self.bottom)).collect();
        let top: Vec<Point3> = piece.iter().rev().map(|p| at(p, self.top)).collect();
        faces.extend(Face::new(bottom, self.material));
        faces.extend(Face::new(top, self.material));
    }

    /// Adds one quad per edge of a loop. Counter-clockwise loops face out of
    /// their interior, clockwise loops into it.
    fn push_sides(&self, faces: &mut Vec<Face>, ring: &[Point2]) {
        let n = ring.len();
        for i in 0..n {
            let j = (i + 1) % n;
            let quad = vec![
                at(&ring[j], self.bottom),
                at(&ring[i], self.bottom),
                at(&ring[i], self.top),
                at(&ring[j], self.top),
            ];
            faces.extend(Face::new(quad, self.material));
        }
    }
}

fn at(p: &Point2, y: f64) -> Point3 {
    Point3::new(p.x, y, p.y)
}

/// Returns the loop wound counter-clockwise (`ccw`) or clockwise.
fn oriented(ring: &[Point2], ccw: bool) -> Result<Vec<Point2>> {
    let area = signed_area_2d(ring);
    if area.abs() < TOLERANCE {
        return Err(GeometryError::Degenerate("profile encloses no area".into()).into());
    }
    if (area > 0.0) == ccw {
        Ok(ring.to_vec())
    } else {
        Ok(ring.iter().rev().copied().collect())
    }
}

/// Convexity test for a counter-clockwise loop.
fn is_convex(ring: &[Point2]) -> bool {
    let n = ring.len();
    (0..n).all(|i| {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let c = ring[(i + 2) % n];
        (b - a).perp(&(c - b)) >= -TOLERANCE
    })
}
