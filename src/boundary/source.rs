use std::collections::HashMap;

use super::BoundaryMetadata;
use crate::error::Result;

/// Supplies boundary metadata keyed by place identifier.
///
/// Implementations wrap whatever actually stores places (a remote indexer, a
/// file, a fixture). `Ok(None)` means the place has no metadata.
pub trait BoundarySource {
    /// Looks up the boundary of a place.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails or returns malformed data.
    fn fetch(&self, place_id: &str) -> Result<Option<BoundaryMetadata>>;
}

/// Boundary source backed by a map, for fixtures and offline use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoundarySource {
    places: HashMap<String, BoundaryMetadata>,
}

impl InMemoryBoundarySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a place, replacing any previous boundary with the same id.
    #[must_use]
    pub fn with_place(mut self, place_id: impl Into<String>, metadata: BoundaryMetadata) -> Self {
        self.places.insert(place_id.into(), metadata);
        self
    }
}

impl BoundarySource for InMemoryBoundarySource {
    fn fetch(&self, place_id: &str) -> Result<Option<BoundaryMetadata>> {
        if !is_place_id(place_id) {
            return Ok(None);
        }
        Ok(self.places.get(place_id).cloned())
    }
}

/// Place ids are non-empty strings of ASCII digits.
#[must_use]
pub fn is_place_id(place_id: &str) -> bool {
    !place_id.is_empty() && place_id.bytes().all(|b| b.is_ascii_digit())
}
