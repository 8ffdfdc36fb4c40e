use spade::handles::FixedVertexHandle;
use spade::{ConstrainedDelaunayTriangulation, Point2 as SpadePoint2, Triangulation};

use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::point_in_polygon;
use crate::math::Point2;

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Triangulates a polygon with holes using a constrained Delaunay
/// triangulation.
///
/// Every returned triangle is counter-clockwise. Triangles inside a hole are
/// dropped.
///
/// # Errors
///
/// Returns [`GeometryError::Degenerate`] if a loop has fewer than 3 points or
/// a point cannot be inserted.
pub fn triangulate_with_holes(outer: &[Point2], holes: &[Vec<Point2>]) -> Result<Vec<[Point2; 3]>> {
    let mut cdt = Cdt::new();
    for ring in std::iter::once(outer).chain(holes.iter().map(Vec::as_slice)) {
        constrain_ring(&mut cdt, ring)?;
    }

    let triangles = cdt
        .inner_faces()
        .map(|face| {
            face.vertices().map(|v| {
                let p = v.position();
                Point2::new(p.x, p.y)
            })
        })
        .filter(|triangle| is_filled(triangle, outer, holes))
        .collect();
    Ok(triangles)
}

/// Adds a closed ring of constraint edges.
fn constrain_ring(cdt: &mut Cdt, ring: &[Point2]) -> Result<()> {
    if ring.len() < 3 {
        return Err(GeometryError::Degenerate(format!(
            "ring of {} points cannot bound a face",
            ring.len()
        ))
        .into());
    }

    let mut vertices: Vec<FixedVertexHandle> = Vec::with_capacity(ring.len());
    for p in ring {
        let vertex = cdt
            .insert(SpadePoint2::new(p.x, p.y))
            .map_err(|e| GeometryError::Degenerate(format!("cannot insert ring vertex: {e}")))?;
        vertices.push(vertex);
    }

    let next = vertices.iter().cycle().skip(1);
    for (&from, &to) in vertices.iter().zip(next) {
        if from != to {
            cdt.add_constraint(from, to);
        }
    }
    Ok(())
}

/// Constraint edges never cross a triangle, so its centroid decides which
/// side of every ring the whole triangle lies on.
fn is_filled(triangle: &[Point2; 3], outer: &[Point2], holes: &[Vec<Point2>]) -> bool {
    let [a, b, c] = triangle;
    let centroid = Point2::from((a.coords + b.coords + c.coords) / 3.0);
    point_in_polygon(&centroid, outer) && !holes.iter().any(|hole| point_in_polygon(&centroid, hole))
}
