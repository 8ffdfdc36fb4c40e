//! Floor, roof and stairwell synthesis, and the assembler that stacks them.
//!
//! Openings are planned first (see [`features`]) and then applied to the
//! running wall solid in a fixed order. A feature that does not fit is
//! recorded as [`FeatureOutcome::Skipped`] and never fails the build.

mod assembler;
pub mod features;
mod floor;
mod roof;
mod stairwell;

pub use assembler::{assemble, BuildingMesh, MeshPart, PartKind};
pub use floor::{FloorBuild, FloorSynthesizer};
pub use roof::{RoofBuild, RoofSynthesizer};
pub use stairwell::Stairwell;

use std::fmt;

use crate::config::BuildConfig;
use crate::fitting::FittedRectangle;
use crate::solid::SolidOps;
use crate::style::StyleFlags;

/// An optional architectural feature of a floor or roof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Door,
    DoorSideWindows,
    AlternateDoorSideWindows,
    OtherSideWindows,
    RoundWindows,
    AlternateOtherSideWindows,
    SideWindows,
    Stairwell,
    RoofHole,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Door => "door",
            Self::DoorSideWindows => "door-side windows",
            Self::AlternateDoorSideWindows => "alternate-floor door-side windows",
            Self::OtherSideWindows => "other-side windows",
            Self::RoundWindows => "round windows",
            Self::AlternateOtherSideWindows => "alternate-floor other-side windows",
            Self::SideWindows => "side windows",
            Self::Stairwell => "stairwell",
            Self::RoofHole => "roof hole",
        };
        f.write_str(name)
    }
}

/// What happened to a feature on one floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureOutcome {
    /// The feature was cut; `openings` counts the cutters used.
    Applied {
        feature: Feature,
        floor: u32,
        openings: usize,
    },
    /// The feature did not fit and was left out.
    Skipped {
        feature: Feature,
        floor: u32,
        reason: &'static str,
    },
}

impl FeatureOutcome {
    #[must_use]
    pub fn feature(&self) -> Feature {
        match self {
            Self::Applied { feature, .. } | Self::Skipped { feature, .. } => *feature,
        }
    }

    #[must_use]
    pub fn floor(&self) -> u32 {
        match self {
            Self::Applied { floor, .. } | Self::Skipped { floor, .. } => *floor,
        }
    }

    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Scaled half-extents of the building footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    /// Half-extent along x, the door faces' width.
    pub w: f64,
    /// Half-extent along z.
    pub h: f64,
}

impl Footprint {
    #[must_use]
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    #[must_use]
    pub fn of(rect: &FittedRectangle) -> Self {
        Self::new(rect.scaled_width(), rect.scaled_height())
    }
}

/// Inputs shared by every synthesizer for one building.
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    pub config: &'a BuildConfig,
    pub flags: StyleFlags,
    pub footprint: Footprint,
    /// Storeys the build height allows.
    pub floors: u32,
    pub ops: &'a dyn SolidOps,
}

impl BuildContext<'_> {
    /// Height of the bottom of a 1-based floor.
    #[must_use]
    pub fn floor_offset(&self, floor: u32) -> f64 {
        f64::from(floor.saturating_sub(1)) * self.config.floor_height
    }
}

impl fmt::Debug for BuildContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("flags", &self.flags)
            .field("footprint", &self.footprint)
            .field("floors", &self.floors)
            .finish_non_exhaustive()
    }
}
