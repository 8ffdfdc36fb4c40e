use serde::Deserialize;

use super::{BoundaryMetadata, Polygon};
use crate::error::{BoundaryError, Result};
use crate::math::Point2;

/// A coordinate as the indexer ships it: usually a decimal string, sometimes a
/// bare number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Decimal {
    Text(String),
    Number(f64),
}

impl Decimal {
    fn parse(&self, field: &'static str) -> Result<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().map_err(|_| BoundaryError::Malformed {
                field,
                value: s.clone(),
            })?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(BoundaryError::Malformed {
                field,
                value: value.to_string(),
            }
            .into())
        }
    }
}

/// Place metadata document as returned by the token indexer.
///
/// Coordinates are `[x, y, z]` triples; only `x` and `z` describe the
/// footprint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlaceMetadata {
    border_coordinates: Vec<Vec<Decimal>>,
    build_height: Decimal,
}

impl RawPlaceMetadata {
    /// Parses the decimal strings into a validated [`BoundaryMetadata`].
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::Malformed`] for unparsable values or
    /// coordinates with fewer than 3 components, and
    /// [`BoundaryError::TooFewVertices`] for short polygons.
    pub fn into_metadata(self) -> Result<BoundaryMetadata> {
        let mut points = Vec::with_capacity(self.border_coordinates.len());
        for coordinate in &self.border_coordinates {
            let (Some(x), Some(z)) = (coordinate.first(), coordinate.get(2)) else {
                return Err(BoundaryError::Malformed {
                    field: "borderCoordinates",
                    value: format!("{coordinate:?}"),
                }
                .into());
            };
            points.push(Point2::new(
                x.parse("borderCoordinates")?,
                z.parse("borderCoordinates")?,
            ));
        }
        let polygon = Polygon::new(points)?;
        BoundaryMetadata::new(polygon, self.build_height.parse("buildHeight")?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::PlacesmithError;

    #[test]
    fn parses_decimal_strings() {
        let json = r#"{
            "borderCoordinates": [["10", "0", "10"], ["-10", "0", "10"], ["-10", "0", "-10"], ["10", "0", "-10"]],
            "buildHeight": "8.5"
        }"#;
        let metadata = BoundaryMetadata::from_json_str(json).unwrap();
        assert_eq!(metadata.polygon.points().len(), 4);
        assert!((metadata.polygon.points()[1].x + 10.0).abs() < f64::EPSILON);
        assert!((metadata.polygon.points()[2].y + 10.0).abs() < f64::EPSILON);
        assert!((metadata.build_height - 8.5).abs() < f64::EPSILON);
    }

    #[test]
    fn accepts_bare_numbers() {
        let json = r#"{
            "borderCoordinates": [[0, 0, 0], [4, 0, 0], [0, 0, 4]],
            "buildHeight": 12
        }"#;
        let metadata = BoundaryMetadata::from_json_str(json).unwrap();
        assert!((metadata.build_height - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_garbage_coordinate() {
        let json = r#"{
            "borderCoordinates": [["a", "0", "0"], ["4", "0", "0"], ["0", "0", "4"]],
            "buildHeight": "5"
        }"#;
        let result = BoundaryMetadata::from_json_str(json);
        assert!(matches!(
            result,
            Err(PlacesmithError::Boundary(BoundaryError::Malformed { field: "borderCoordinates", .. }))
        ));
    }

    #[test]
    fn rejects_short_coordinate() {
        let json = r#"{
            "borderCoordinates": [["1", "0"], ["4", "0", "0"], ["0", "0", "4"]],
            "buildHeight": "5"
        }"#;
        assert!(BoundaryMetadata::from_json_str(json).is_err());
    }

    #[test]
    fn rejects_two_vertex_boundary() {
        let json = r#"{
            "borderCoordinates": [["1", "0", "0"], ["4", "0", "0"]],
            "buildHeight": "5"
        }"#;
        let result = BoundaryMetadata::from_json_str(json);
        assert!(matches!(
            result,
            Err(PlacesmithError::Boundary(BoundaryError::TooFewVertices(2)))
        ));
    }
}
