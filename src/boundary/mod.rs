mod metadata;
mod source;

pub use metadata::RawPlaceMetadata;
pub use source::{is_place_id, BoundarySource, InMemoryBoundarySource};

use crate::error::{BoundaryError, Result};
use crate::math::polygon_2d::{extents, signed_area_2d};
use crate::math::{Point2, TOLERANCE};

/// A simple polygon in the horizontal `(x, z)` plane, implicitly closed.
///
/// Transformations always produce new polygons; a boundary is never edited in
/// place.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Point2>,
}

impl Polygon {
    /// Creates a polygon from at least 3 vertices.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::TooFewVertices`] for fewer than 3 points.
    pub fn new(points: Vec<Point2>) -> Result<Self> {
        if points.len() < 3 {
            return Err(BoundaryError::TooFewVertices(points.len()).into());
        }
        Ok(Self { points })
    }

    /// The polygon vertices in order.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Absolute enclosed area.
    #[must_use]
    pub fn area(&self) -> f64 {
        signed_area_2d(&self.points).abs()
    }

    /// Whether the polygon encloses no area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.area() < TOLERANCE
    }

    /// Largest x and z coordinates among the vertices.
    #[must_use]
    pub fn max_extent(&self) -> Point2 {
        extents(&self.points).map_or_else(|| Point2::new(0.0, 0.0), |(_, max)| max)
    }
}

/// Buildable footprint and height budget of one place.
///
/// Immutable once fetched; replaced wholesale when the place changes.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryMetadata {
    pub polygon: Polygon,
    pub build_height: f64,
}

impl BoundaryMetadata {
    /// Creates boundary metadata.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::Malformed`] if the height is not a positive
    /// finite number.
    pub fn new(polygon: Polygon, build_height: f64) -> Result<Self> {
        if !build_height.is_finite() || build_height <= 0.0 {
            return Err(BoundaryError::Malformed {
                field: "buildHeight",
                value: build_height.to_string(),
            }
            .into());
        }
        Ok(Self {
            polygon,
            build_height,
        })
    }

    /// Parses the indexer's JSON metadata document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON or any coordinate or
    /// the height cannot be parsed.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: RawPlaceMetadata = serde_json::from_str(text).map_err(BoundaryError::from)?;
        raw.into_metadata()
    }
}
