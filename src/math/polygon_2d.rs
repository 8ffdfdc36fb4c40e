//! Planar polygon helpers. Points are `(x, z)` pairs in the horizontal plane,
//! stored in a [`Point2`] as `(x, y)`.

use super::{Point2, Vector2};

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Even-odd ray cast containment test.
///
/// Points exactly on an edge may land on either side; the answer is stable for
/// a given input, which keeps the rectangle search reproducible.
#[must_use]
pub fn point_in_polygon(point: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let (x, z) = (point.x, point.y);
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, zi) = (polygon[i].x, polygon[i].y);
        let (xj, zj) = (polygon[j].x, polygon[j].y);
        let crosses = (zi > z) != (zj > z) && x < (xj - xi) * (z - zi) / (zj - zi) + xi;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Rotates a point counter-clockwise about the origin by `angle` radians.
#[must_use]
pub fn rotate_point(point: &Point2, angle: f64) -> Point2 {
    let (s, c) = angle.sin_cos();
    Point2::new(c * point.x - s * point.y, s * point.x + c * point.y)
}

/// Rotates every vertex about the origin, then translates by `offset`.
#[must_use]
pub fn rotate_translate(points: &[Point2], angle: f64, offset: Vector2) -> Vec<Point2> {
    points
        .iter()
        .map(|p| rotate_point(p, angle) + offset)
        .collect()
}

/// Axis-aligned extents `(min, max)` of a point set, or `None` when empty.
#[must_use]
pub fn extents(points: &[Point2]) -> Option<(Point2, Point2)> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}
