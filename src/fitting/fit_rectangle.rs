use tracing::{debug, info};

use super::{probe_points, FittedRectangle};
use crate::boundary::{BoundaryMetadata, Polygon};
use crate::config::SearchGrid;
use crate::math::polygon_2d::{point_in_polygon, rotate_translate};
use crate::math::Vector2;

/// Searches a discrete grid of scales, displacements and rotations for the
/// largest rectangle that fits inside a boundary polygon.
///
/// Rather than moving the eight probe points of every candidate rectangle,
/// the boundary itself is rotated and displaced and the probes stay fixed at
/// the origin. A candidate is valid when all probes test inside the moved
/// boundary. The first candidate with the largest area wins, so results are
/// deterministic for a fixed grid.
pub struct FitRectangle<'a> {
    polygon: &'a Polygon,
    grid: &'a SearchGrid,
}

impl<'a> FitRectangle<'a> {
    /// Creates a new `FitRectangle` search.
    #[must_use]
    pub fn new(polygon: &'a Polygon, grid: &'a SearchGrid) -> Self {
        Self { polygon, grid }
    }

    /// Runs the search.
    ///
    /// Returns `None` when the polygon has no area, when its positive extents
    /// do not give a usable rectangle, or when no candidate validates.
    #[must_use]
    pub fn execute(&self) -> Option<FittedRectangle> {
        if self.polygon.is_degenerate() {
            debug!("boundary polygon has no area");
            return None;
        }

        // Only the positive extents are used: boundaries are expected to
        // straddle the origin.
        let max = self.polygon.max_extent();
        let (mut half_width, mut half_height) = (max.x / 2.0, max.y / 2.0);
        // The wider side carries the door.
        if half_width < half_height {
            std::mem::swap(&mut half_width, &mut half_height);
        }
        if half_height <= 0.0 {
            debug!(half_width, half_height, "boundary extents give no rectangle");
            return None;
        }

        let mut best: Option<FittedRectangle> = None;
        let mut best_area = 0.0;

        for &scale in &self.grid.scales {
            let probes = probe_points(half_width * scale, half_height * scale);
            let area = 4.0 * half_width * half_height * scale * scale;
            for &displacement_x in &self.grid.displacements {
                for &displacement_z in &self.grid.displacements {
                    let offset = Vector2::new(displacement_x, displacement_z);
                    for &rotation in &self.grid.rotations {
                        if best.is_some() && area <= best_area {
                            continue;
                        }
                        let moved = rotate_translate(self.polygon.points(), rotation, offset);
                        if probes.iter().all(|p| point_in_polygon(p, &moved)) {
                            best_area = area;
                            best = Some(FittedRectangle {
                                half_width,
                                half_height,
                                scale,
                                rotation,
                                displacement_x,
                                displacement_z,
                            });
                        }
                    }
                }
            }
        }

        match &best {
            Some(rect) => info!(
                scale = rect.scale,
                rotation = rect.rotation,
                displacement_x = rect.displacement_x,
                displacement_z = rect.displacement_z,
                area = rect.area(),
                "fitted rectangle"
            ),
            None => debug!("no candidate rectangle fits the boundary"),
        }
        best
    }
}

/// Fits the largest rectangle into a place boundary.
///
/// The build height does not constrain the footprint; it travels with the
/// boundary for the floor count.
#[must_use]
pub fn fit(boundary: &BoundaryMetadata, grid: &SearchGrid) -> Option<FittedRectangle> {
    FitRectangle::new(&boundary.polygon, grid).execute()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;
    use crate::math::{Point2, TOLERANCE};

    fn polygon(points: &[(f64, f64)]) -> Polygon {
        Polygon::new(points.iter().map(|&(x, z)| Point2::new(x, z)).collect()).unwrap()
    }

    fn square() -> Polygon {
        polygon(&[(10.0, 10.0), (-10.0, 10.0), (-10.0, -10.0), (10.0, -10.0)])
    }

    fn assert_probes_inside(rect: &FittedRectangle, boundary: &Polygon) {
        for probe in rect.boundary_probes() {
            assert!(
                point_in_polygon(&probe, boundary.points()),
                "probe {probe:?} escapes the boundary"
            );
        }
    }

    #[test]
    fn square_boundary_fits_centered_rectangle() {
        let grid = SearchGrid::default();
        let rect = FitRectangle::new(&square(), &grid).execute().unwrap();
        assert!((rect.half_width - 5.0).abs() < TOLERANCE);
        assert!((rect.half_height - 5.0).abs() < TOLERANCE);
        assert!((rect.scale - 1.5).abs() < TOLERANCE);
        assert!(rect.rotation.abs() < TOLERANCE);
        assert!(rect.displacement_x.abs() < TOLERANCE);
        assert!(rect.displacement_z.abs() < TOLERANCE);
        assert!((rect.area() - 225.0).abs() < 1e-9);
        assert_probes_inside(&rect, &square());
    }

    #[test]
    fn tall_boundary_is_rotated_to_put_width_along_x() {
        let grid = SearchGrid::default();
        let boundary = polygon(&[(3.0, 10.0), (-3.0, 10.0), (-3.0, -10.0), (3.0, -10.0)]);
        let rect = FitRectangle::new(&boundary, &grid).execute().unwrap();
        assert!((rect.half_width - 5.0).abs() < TOLERANCE);
        assert!((rect.half_height - 1.5).abs() < TOLERANCE);
        assert!((rect.scale - 1.5).abs() < TOLERANCE);
        assert!((rect.rotation - FRAC_PI_2).abs() < 1e-12);
        assert_probes_inside(&rect, &boundary);
    }

    #[test]
    fn triangle_fit_stays_inside() {
        let grid = SearchGrid::default();
        let boundary = polygon(&[(12.0, -8.0), (0.0, 14.0), (-12.0, -8.0)]);
        let rect = FitRectangle::new(&boundary, &grid).execute().unwrap();
        assert!(rect.half_width >= rect.half_height);
        assert!(rect.rotation >= 0.0 && rect.rotation < std::f64::consts::PI);
        assert_probes_inside(&rect, &boundary);
    }

    #[test]
    fn fitting_is_deterministic() {
        let grid = SearchGrid::default();
        let boundary = polygon(&[(12.0, -8.0), (0.0, 14.0), (-12.0, -8.0)]);
        let first = FitRectangle::new(&boundary, &grid).execute();
        let second = FitRectangle::new(&boundary, &grid).execute();
        assert_eq!(first, second);
    }

    #[test]
    fn larger_grid_never_finds_less_area() {
        let full = SearchGrid::default();
        let narrow = SearchGrid {
            scales: vec![1.0, 0.5],
            displacements: vec![0.0, 2.0],
            rotations: vec![0.0],
        };
        let boundary = polygon(&[(14.0, -6.0), (2.0, 12.0), (-12.0, -9.0)]);
        let narrow_area = FitRectangle::new(&boundary, &narrow)
            .execute()
            .map_or(0.0, |r| r.area());
        let full_area = FitRectangle::new(&boundary, &full)
            .execute()
            .map_or(0.0, |r| r.area());
        assert!(full_area >= narrow_area);
    }

    #[test]
    fn far_away_boundary_has_no_fit() {
        let grid = SearchGrid::default();
        let boundary = polygon(&[(110.0, 110.0), (100.0, 110.0), (100.0, 100.0), (110.0, 100.0)]);
        assert!(FitRectangle::new(&boundary, &grid).execute().is_none());
    }

    #[test]
    fn degenerate_boundary_has_no_fit() {
        let grid = SearchGrid::default();
        let boundary = polygon(&[(0.0, 0.0), (5.0, 5.0), (10.0, 10.0)]);
        assert!(FitRectangle::new(&boundary, &grid).execute().is_none());
    }

    #[test]
    fn fit_uses_boundary_polygon() {
        let boundary = BoundaryMetadata::new(square(), 8.0).unwrap();
        let rect = fit(&boundary, &SearchGrid::default()).unwrap();
        assert!((rect.scaled_width() - 7.5).abs() < TOLERANCE);
    }
}
