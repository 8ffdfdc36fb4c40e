use super::{boolean_execute, BooleanOp, Extrude, MakeCylinder, Solid};
use crate::error::Result;
use crate::math::Point2;

/// Solid-modelling capabilities the building synthesizers rely on.
///
/// Synthesis is written purely against this trait, so any CSG kernel that can
/// provide these operations can back it.
pub trait SolidOps {
    /// Removes `cutter` from `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the kernel cannot evaluate the operation.
    fn subtract(&self, base: &Solid, cutter: &Solid) -> Result<Solid>;

    /// Keeps the volume shared by `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns an error if the kernel cannot evaluate the operation.
    fn intersect(&self, a: &Solid, b: &Solid) -> Result<Solid>;

    /// Fuses `a` and `b` into one closed solid.
    ///
    /// # Errors
    ///
    /// Returns an error if the kernel cannot evaluate the operation.
    fn union(&self, a: &Solid, b: &Solid) -> Result<Solid>;

    /// Extrudes an `(x, z)` profile with holes between heights `bottom` and
    /// `top`.
    ///
    /// # Errors
    ///
    /// Returns an error for degenerate profiles or non-positive heights.
    fn extrude_polygon(
        &self,
        profile: &[Point2],
        holes: &[Vec<Point2>],
        bottom: f64,
        top: f64,
    ) -> Result<Solid>;

    /// Faceted cylinder centred on the origin with its axis along x.
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive dimensions or fewer than 3 segments.
    fn make_cylinder(&self, radius: f64, length: f64, segments: usize) -> Result<Solid> {
        MakeCylinder::new(radius, length, segments).execute()
    }

    /// Combines solids without boolean evaluation, keeping materials.
    fn merge_solids(&self, solids: Vec<Solid>) -> Solid {
        Solid::merge(solids)
    }
}

/// [`SolidOps`] backed by BSP-tree boolean evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BspOps;

impl SolidOps for BspOps {
    fn subtract(&self, base: &Solid, cutter: &Solid) -> Result<Solid> {
        boolean_execute(base, cutter, BooleanOp::Subtract)
    }

    fn intersect(&self, a: &Solid, b: &Solid) -> Result<Solid> {
        boolean_execute(a, b, BooleanOp::Intersect)
    }

    fn union(&self, a: &Solid, b: &Solid) -> Result<Solid> {
        boolean_execute(a, b, BooleanOp::Union)
    }

    fn extrude_polygon(
        &self,
        profile: &[Point2],
        holes: &[Vec<Point2>],
        bottom: f64,
        top: f64,
    ) -> Result<Solid> {
        Extrude::new(profile.to_vec(), bottom, top)
            .with_holes(holes.to_vec())
            .execute()
    }
}
