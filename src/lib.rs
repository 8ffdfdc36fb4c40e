//! Procedural buildings fitted inside place boundaries.
//!
//! A boundary polygon is searched for the largest rectangle that fits it
//! ([`fitting`]), a style id selects architectural features ([`style`]), and
//! floors, roofs and stairwells are carved out of solids with boolean
//! operations ([`synthesis`] over [`solid`]). [`pipeline`] ties the stages
//! together and [`export`] writes the result.

pub mod boundary;
pub mod config;
pub mod error;
pub mod export;
pub mod fitting;
pub mod math;
pub mod pipeline;
pub mod solid;
pub mod style;
pub mod synthesis;
pub mod tessellation;

pub use error::{PlacesmithError, Result};
pub use pipeline::{generate, BuildRequest, BuildingSession};
pub use synthesis::{BuildingMesh, MeshPart, PartKind};
