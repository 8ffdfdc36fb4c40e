use std::f64::consts::{FRAC_PI_2, TAU};

use super::{Extrude, Solid};
use crate::error::{GeometryError, Result};
use crate::math::{Isometry3, Point2, Vector3};

/// Builds a faceted cylinder centred on the origin with its axis along X.
pub struct MakeCylinder {
    radius: f64,
    length: f64,
    segments: usize,
}

impl MakeCylinder {
    /// Creates a new `MakeCylinder` operation.
    #[must_use]
    pub fn new(radius: f64, length: f64, segments: usize) -> Self {
        Self {
            radius,
            length,
            segments,
        }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonPositive`] for a non-positive radius or
    /// length, and [`GeometryError::Degenerate`] for fewer than 3 segments.
    pub fn execute(&self) -> Result<Solid> {
        if self.radius <= 0.0 {
            return Err(GeometryError::NonPositive {
                parameter: "radius",
                value: self.radius,
            }
            .into());
        }
        if self.length <= 0.0 {
            return Err(GeometryError::NonPositive {
                parameter: "length",
                value: self.length,
            }
            .into());
        }
        if self.segments < 3 {
            return Err(GeometryError::Degenerate(format!(
                "cylinder needs at least 3 segments, got {}",
                self.segments
            ))
            .into());
        }

        #[allow(clippy::cast_precision_loss)]
        let step = TAU / self.segments as f64;
        let ring: Vec<Point2> = (0..self.segments)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let angle = step * i as f64;
                Point2::new(self.radius * angle.cos(), self.radius * angle.sin())
            })
            .collect();

        let half = self.length / 2.0;
        let upright = Extrude::new(ring, -half, half).execute()?;
        // Quarter turn about z carries the extrusion axis from y onto x.
        Ok(upright.transformed(&Isometry3::rotation(Vector3::z() * FRAC_PI_2)))
    }
}
