use std::f64::consts::FRAC_PI_4;

use super::features::Cutter;
use super::BuildContext;
use crate::error::Result;
use crate::math::{Isometry3, Point2, Point3, Vector3};
use crate::solid::Solid;

/// Opening and 45° ramp connecting a floor to the one above, along the back
/// (−z) wall.
#[derive(Debug, Clone, PartialEq)]
pub struct Stairwell {
    opening: Cutter,
    ramp_length: f64,
    ramp_z: (f64, f64),
    thickness: f64,
    lift: f64,
}

impl Stairwell {
    /// Plans the stairwell of a floor, or `None` when the building has a
    /// single storey or the footprint is too narrow for the ramp.
    #[must_use]
    pub fn plan(ctx: &BuildContext<'_>, floor: u32) -> Option<Self> {
        let config = ctx.config;
        let fp = ctx.footprint;
        if !ctx.flags.storeys || fp.w <= 2.0 * config.stairs_width {
            return None;
        }
        let offset = ctx.floor_offset(floor);
        let wt = config.wall_thickness;
        let half = config.stairs_length / 2.0;
        let top = offset + config.floor_height + wt;
        let opening = Cutter::Block {
            min: Point3::new(-half, top - (config.floor_height + 2.0 * wt), -fp.h + wt),
            max: Point3::new(half, top, -fp.h + config.door_width),
        };
        Some(Self {
            opening,
            ramp_length: config.floor_height / FRAC_PI_4.sin(),
            ramp_z: (-fp.h + wt, -fp.h + config.stairs_width),
            thickness: wt,
            lift: offset + config.floor_height / 2.0 + wt,
        })
    }

    /// The volume cut from the ceiling slab.
    #[must_use]
    pub fn opening(&self) -> &Cutter {
        &self.opening
    }

    /// Builds the ramp slab.
    ///
    /// # Errors
    ///
    /// Returns an error if the slab cannot be extruded.
    pub fn ramp(&self, ctx: &BuildContext<'_>) -> Result<Solid> {
        let half = self.ramp_length / 2.0;
        let (z0, z1) = self.ramp_z;
        let profile = [
            Point2::new(-half, z0),
            Point2::new(half, z0),
            Point2::new(half, z1),
            Point2::new(-half, z1),
        ];
        let slab = ctx.ops.extrude_polygon(&profile, &[], -self.thickness, 0.0)?;
        let tilt = Isometry3::new(Vector3::new(0.0, self.lift, 0.0), Vector3::z() * FRAC_PI_4);
        Ok(slab.transformed(&tilt))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::config::BuildConfig;
    use crate::solid::BspOps;
    use crate::style::resolve;
    use crate::synthesis::Footprint;

    fn ctx<'a>(config: &'a BuildConfig, w: f64, storeys: bool) -> BuildContext<'a> {
        BuildContext {
            config,
            flags: resolve(1, storeys),
            footprint: Footprint::new(w, 5.0),
            floors: 2,
            ops: &BspOps,
        }
    }

    #[test]
    fn needs_storeys_and_room() {
        let config = BuildConfig::default();
        assert!(Stairwell::plan(&ctx(&config, 7.5, false), 1).is_none());
        assert!(Stairwell::plan(&ctx(&config, 4.0, true), 1).is_none());
        assert!(Stairwell::plan(&ctx(&config, 4.01, true), 1).is_some());
    }

    #[test]
    fn opening_spans_the_ceiling() {
        let config = BuildConfig::default();
        let stairwell = Stairwell::plan(&ctx(&config, 7.5, true), 2).unwrap();
        let Cutter::Block { min, max } = *stairwell.opening() else {
            panic!("expected a block");
        };
        assert_relative_eq!(min.x, -2.0);
        assert_relative_eq!(max.x, 2.0);
        assert_relative_eq!(min.y, 3.9, epsilon = 1e-12);
        assert_relative_eq!(max.y, 8.1, epsilon = 1e-12);
        assert_relative_eq!(min.z, -4.9, epsilon = 1e-12);
        assert_relative_eq!(max.z, -3.0);
    }

    #[test]
    fn ramp_climbs_one_storey() {
        let config = BuildConfig::default();
        let context = ctx(&config, 7.5, true);
        let stairwell = Stairwell::plan(&context, 1).unwrap();
        let ramp = stairwell.ramp(&context).unwrap();
        let length = 4.0 / FRAC_PI_4.sin();
        assert_relative_eq!(ramp.volume(), length * 1.9 * 0.1, epsilon = 1e-9);
        let bounds = ramp.bounds().unwrap();
        // The tilted slab rises by its half-length times sin 45° about y = 2.1.
        assert!(bounds.max.y > 2.1 + 1.9 && bounds.max.y < 2.1 + 2.1);
        assert!(bounds.min.y < 2.1 - 1.9);
        assert_relative_eq!(bounds.min.z, -4.9, epsilon = 1e-9);
    }
}
