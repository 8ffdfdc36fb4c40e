use std::f64::consts::FRAC_PI_2;

use tracing::debug;

use super::floor::rectangle;
use super::{BuildContext, Feature, FeatureOutcome, Stairwell};
use crate::error::Result;
use crate::math::{Isometry3, Point2, Vector3};
use crate::solid::Solid;
use crate::style::RoofKind;

/// A roof and the features recorded while building it.
#[derive(Debug, Clone, Default)]
pub struct RoofBuild {
    pub solid: Solid,
    pub outcomes: Vec<FeatureOutcome>,
}

/// Builds the roof or ceiling slab on top of a floor.
#[derive(Debug)]
pub struct RoofSynthesizer<'a> {
    ctx: BuildContext<'a>,
}

impl<'a> RoofSynthesizer<'a> {
    #[must_use]
    pub fn new(ctx: BuildContext<'a>) -> Self {
        Self { ctx }
    }

    /// Builds the roof of the style's kind over a 1-based floor. Flat and
    /// hole roofs get the floor's stairwell opening cut through them.
    ///
    /// # Errors
    ///
    /// Returns an error if a slab cannot be built or cut.
    pub fn build(&self, floor: u32) -> Result<RoofBuild> {
        let mut outcomes = Vec::new();
        let solid = match self.ctx.flags.roof {
            RoofKind::Flat => self.with_stairwell(self.slab(floor, &[])?, floor)?,
            RoofKind::Hole => {
                let holes = self.hole(floor, &mut outcomes);
                self.with_stairwell(self.slab(floor, &holes)?, floor)?
            }
            RoofKind::Gable => self.gable(floor)?,
        };
        Ok(RoofBuild { solid, outcomes })
    }

    /// Slab on top of the walls, oversized in plane for a visible lip.
    fn slab(&self, floor: u32, holes: &[Vec<Point2>]) -> Result<Solid> {
        let config = self.ctx.config;
        let fp = self.ctx.footprint;
        let bottom = self.ctx.floor_offset(floor) + config.floor_height;
        let k = config.roof_overhang;
        self.ctx.ops.extrude_polygon(
            &rectangle(k * fp.w, k * fp.h),
            holes,
            bottom,
            bottom + config.wall_thickness,
        )
    }

    /// The hole of a hole roof: two thirds of the footprint, or whatever the
    /// stairs leave free on multi-storey buildings.
    fn hole(&self, floor: u32, outcomes: &mut Vec<FeatureOutcome>) -> Vec<Vec<Point2>> {
        let config = self.ctx.config;
        let fp = self.ctx.footprint;
        let factor = if self.ctx.flags.storeys {
            (fp.w - 2.5 * config.stairs_width) / fp.w
        } else {
            config.default_hole_factor
        };

        if factor <= config.min_hole_factor {
            debug!(floor, factor, "roof hole too small");
            outcomes.push(FeatureOutcome::Skipped {
                feature: Feature::RoofHole,
                floor,
                reason: "hole factor too small",
            });
            return Vec::new();
        }

        debug!(floor, factor, "roof hole applied");
        outcomes.push(FeatureOutcome::Applied {
            feature: Feature::RoofHole,
            floor,
            openings: 1,
        });
        let k = config.roof_overhang * factor;
        vec![rectangle(k * fp.w, k * fp.h).to_vec()]
    }

    fn with_stairwell(&self, slab: Solid, floor: u32) -> Result<Solid> {
        let Some(stairwell) = Stairwell::plan(&self.ctx, floor) else {
            return Ok(slab);
        };
        let opening = stairwell.opening().solid(self.ctx.ops)?;
        self.ctx.ops.subtract(&slab, &opening)
    }

    /// Two sloped panels meeting at the ridge over a triangular end cap.
    fn gable(&self, floor: u32) -> Result<Solid> {
        let config = self.ctx.config;
        let fp = self.ctx.footprint;
        let ops = self.ctx.ops;
        let offset = self.ctx.floor_offset(floor);
        let wt = config.wall_thickness;
        let rise = config.gable_height;

        let angle = rise.atan2(fp.h);
        let length = fp.h / angle.cos() + wt;
        let half = fp.w + wt;
        let ridge = Vector3::new(0.0, offset + config.floor_height + rise, 0.0);

        let panel = |z0: f64, z1: f64, tilt: f64| -> Result<Solid> {
            let profile = [
                Point2::new(-half, z0),
                Point2::new(half, z0),
                Point2::new(half, z1),
                Point2::new(-half, z1),
            ];
            let slab = ops.extrude_polygon(&profile, &[], -wt, 0.0)?;
            Ok(slab.transformed(&Isometry3::new(ridge, Vector3::x() * tilt)))
        };
        let back = panel(-length, 0.0, -angle)?;
        let front = panel(0.0, length, angle)?;

        // Triangle drawn with x as minus the height, extruded along y, then
        // turned so the extrusion runs along x and the apex points up.
        let triangle = [
            Point2::new(0.0, -fp.h),
            Point2::new(-rise, 0.0),
            Point2::new(0.0, fp.h),
        ];
        let span = fp.w - wt / 2.0;
        let cap = ops
            .extrude_polygon(&triangle, &[], -span, span)?
            .transformed(&Isometry3::new(
                Vector3::new(0.0, offset + config.floor_height - wt, 0.0),
                Vector3::z() * -FRAC_PI_2,
            ));

        Ok(ops.merge_solids(vec![back, front, cap]))
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

    fn roof(config: &BuildConfig, style: u8, storeys: bool, w: f64, h: f64) -> RoofSynthesizer<'_> {
        RoofSynthesizer::new(BuildContext {
            config,
            flags: resolve(style, storeys),
            footprint: Footprint::new(w, h),
            floors: 2,
            ops: &BspOps,
        })
    }

    #[test]
    fn flat_roof_has_a_lip() {
        let config = BuildConfig::default();
        let build = roof(&config, 2, false, 5.0, 4.0).build(1).unwrap();
        let bounds = build.solid.bounds().unwrap();
        assert_relative_eq!(bounds.max.x, 5.05, epsilon = 1e-9);
        assert_relative_eq!(bounds.min.z, -4.04, epsilon = 1e-9);
        assert_relative_eq!(bounds.min.y, 4.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.max.y, 4.1, epsilon = 1e-9);
        assert_relative_eq!(build.solid.volume(), 10.1 * 8.08 * 0.1, epsilon = 1e-6);
        assert!(build.outcomes.is_empty());
    }

    #[test]
    fn storeys_cut_the_stairwell_through_the_slab() {
        let config = BuildConfig::default();
        let build = roof(&config, 1, true, 7.5, 7.5).build(1).unwrap();
        let full = 15.15 * 15.15 * 0.1;
        assert_relative_eq!(build.solid.volume(), full - 4.0 * 1.9 * 0.1, epsilon = 1e-6);
    }

    #[test]
    fn narrow_storeys_keep_a_whole_slab() {
        let config = BuildConfig::default();
        let build = roof(&config, 1, true, 4.0, 3.0).build(1).unwrap();
        assert_relative_eq!(build.solid.volume(), 8.08 * 6.06 * 0.1, epsilon = 1e-6);
    }

    #[test]
    fn hole_roof_default_factor() {
        let config = BuildConfig::default();
        let build = roof(&config, 3, false, 6.0, 3.0).build(2).unwrap();
        let full = 12.12 * 6.06 * 0.1;
        let hole = full * (2.0 / 3.0) * (2.0 / 3.0);
        assert_relative_eq!(build.solid.volume(), full - hole, epsilon = 1e-6);
        assert_relative_eq!(build.solid.bounds().unwrap().min.y, 8.0, epsilon = 1e-9);
        assert!(build.outcomes[0].is_applied());
    }

    #[test]
    fn hole_roof_with_storeys_makes_room_for_stairs() {
        let config = BuildConfig::default();
        // (5.5 - 5) / 5.5 is below the minimum factor.
        let narrow = roof(&config, 3, true, 5.5, 5.0).build(1).unwrap();
        assert_eq!(
            narrow.outcomes,
            vec![FeatureOutcome::Skipped {
                feature: Feature::RoofHole,
                floor: 1,
                reason: "hole factor too small",
            }]
        );
        let wide = roof(&config, 3, true, 10.0, 8.0).build(1).unwrap();
        assert!(wide.outcomes[0].is_applied());
    }

    #[test]
    fn gable_peaks_at_the_ridge() {
        let config = BuildConfig::default();
        let (w, h) = (7.5, 7.5);
        let build = roof(&config, 1, false, w, h).build(1).unwrap();
        let bounds = build.solid.bounds().unwrap();
        assert_relative_eq!(bounds.max.y, 4.0 + 1.85, epsilon = 1e-9);
        assert_relative_eq!(bounds.max.x, w + 0.1, epsilon = 1e-9);

        let angle = 1.85_f64.atan2(h);
        let length = h / angle.cos() + 0.1;
        let panels = 2.0 * (2.0 * (w + 0.1)) * length * 0.1;
        let cap = h * 1.85 * (2.0 * w - 0.1);
        assert_relative_eq!(build.solid.volume(), panels + cap, epsilon = 1e-6);
    }
}
