mod fit_rectangle;

pub use fit_rectangle::{fit, FitRectangle};

use crate::math::polygon_2d::rotate_point;
use crate::math::{Point2, Vector2};

/// The largest rectangle found inside a place boundary.
///
/// The rectangle is centered at the origin with half-extents
/// `(half_width * scale, half_height * scale)`. It lies inside the boundary
/// once the boundary is rotated by `rotation` about the origin and then
/// displaced by `(displacement_x, displacement_z)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedRectangle {
    /// Pre-scale half-extent along x, never smaller than `half_height`.
    pub half_width: f64,
    /// Pre-scale half-extent along z.
    pub half_height: f64,
    pub scale: f64,
    /// Rotation in radians, within `[0, π)`.
    pub rotation: f64,
    pub displacement_x: f64,
    pub displacement_z: f64,
}

impl FittedRectangle {
    /// Half-extent along x after scaling.
    #[must_use]
    pub fn scaled_width(&self) -> f64 {
        self.half_width * self.scale
    }

    /// Half-extent along z after scaling.
    #[must_use]
    pub fn scaled_height(&self) -> f64 {
        self.half_height * self.scale
    }

    /// Full rectangle area: `4 * half_width * half_height * scale²`.
    #[must_use]
    pub fn area(&self) -> f64 {
        4.0 * self.half_width * self.half_height * self.scale * self.scale
    }

    /// The four corners and four edge midpoints in the rectangle's own frame.
    #[must_use]
    pub fn probe_points(&self) -> [Point2; 8] {
        probe_points(self.scaled_width(), self.scaled_height())
    }

    /// The probe points mapped into the original boundary's frame.
    ///
    /// This undoes the search transform: translate by minus the displacement,
    /// then rotate by minus the rotation. Used to verify a fit against the
    /// untouched boundary and to draw the rectangle over it.
    #[must_use]
    pub fn boundary_probes(&self) -> [Point2; 8] {
        let offset = Vector2::new(self.displacement_x, self.displacement_z);
        self.probe_points()
            .map(|p| rotate_point(&(p - offset), -self.rotation))
    }
}

/// Corners first (counter-clockwise from `(-w, -h)`), then edge midpoints.
pub(crate) fn probe_points(w: f64, h: f64) -> [Point2; 8] {
    [
        Point2::new(-w, -h),
        Point2::new(w, -h),
        Point2::new(w, h),
        Point2::new(-w, h),
        Point2::new(0.0, -h),
        Point2::new(w, 0.0),
        Point2::new(0.0, h),
        Point2::new(-w, 0.0),
    ]
}
