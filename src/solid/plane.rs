use super::Face;
use crate::math::{Point3, Vector3, PLANE_EPSILON, TOLERANCE};

/// Oriented plane `normal · p = w`. Points with `normal · p > w` are in front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3,
    pub w: f64,
}

/// Where a point or face lies relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Coplanar = 0,
    Front = 1,
    Back = 2,
    Spanning = 3,
}

impl Side {
    fn of_distance(t: f64) -> Self {
        if t < -PLANE_EPSILON {
            Self::Back
        } else if t > PLANE_EPSILON {
            Self::Front
        } else {
            Self::Coplanar
        }
    }

    fn combine(self, other: Self) -> Self {
        match (self as u8) | (other as u8) {
            0 => Self::Coplanar,
            1 => Self::Front,
            2 => Self::Back,
            _ => Self::Spanning,
        }
    }
}

impl Plane {
    /// Plane through a polygon, oriented by its winding (Newell's method).
    ///
    /// Returns `None` for polygons with no area.
    #[must_use]
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let n = points.len();
        if n < 3 {
            return None;
        }
        let mut normal = Vector3::zeros();
        for i in 0..n {
            let curr = &points[i];
            let next = &points[(i + 1) % n];
            normal.x += (curr.y - next.y) * (curr.z + next.z);
            normal.y += (curr.z - next.z) * (curr.x + next.x);
            normal.z += (curr.x - next.x) * (curr.y + next.y);
        }
        let len = normal.norm();
        if len < TOLERANCE {
            return None;
        }
        let normal = normal / len;
        Some(Self {
            normal,
            w: normal.dot(&points[0].coords),
        })
    }

    /// Reverses the plane orientation.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Signed distance of a point from the plane.
    #[must_use]
    pub fn distance(&self, point: &Point3) -> f64 {
        self.normal.dot(&point.coords) - self.w
    }

    /// Sorts a face into the four output lists, splitting it when it spans the
    /// plane. Coplanar faces go to the front or back list by facing direction.
    pub(crate) fn split_face(
        &self,
        face: Face,
        coplanar_front: &mut Vec<Face>,
        coplanar_back: &mut Vec<Face>,
        front: &mut Vec<Face>,
        back: &mut Vec<Face>,
    ) {
        let sides: Vec<Side> = face
            .vertices
            .iter()
            .map(|v| Side::of_distance(self.distance(v)))
            .collect();
        let face_side = sides.iter().fold(Side::Coplanar, |acc, s| acc.combine(*s));

        match face_side {
            Side::Coplanar => {
                if self.normal.dot(&face.plane.normal) > 0.0 {
                    coplanar_front.push(face);
                } else {
                    coplanar_back.push(face);
                }
            }
            Side::Front => front.push(face),
            Side::Back => back.push(face),
            Side::Spanning => {
                let n = face.vertices.len();
                let mut f = Vec::with_capacity(n + 1);
                let mut b = Vec::with_capacity(n + 1);
                for i in 0..n {
                    let j = (i + 1) % n;
                    let (si, sj) = (sides[i], sides[j]);
                    let (vi, vj) = (face.vertices[i], face.vertices[j]);
                    if si != Side::Back {
                        f.push(vi);
                    }
                    if si != Side::Front {
                        b.push(vi);
                    }
                    if si.combine(sj) == Side::Spanning {
                        let t = (self.w - self.normal.dot(&vi.coords))
                            / self.normal.dot(&(vj - vi));
                        let v = vi + (vj - vi) * t;
                        f.push(v);
                        b.push(v);
                    }
                }
                if f.len() >= 3 {
                    front.push(face.fragment(f));
                }
                if b.len() >= 3 {
                    back.push(face.fragment(b));
                }
            }
        }
    }
}
