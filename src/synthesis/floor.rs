use tracing::debug;

use super::features::{self, Plan};
use super::{BuildContext, Feature, FeatureOutcome, Stairwell};
use crate::error::{OperationError, Result};
use crate::math::Point2;
use crate::solid::{Material, Solid};

/// In-plane scale of the cutter that hollows out a floor.
const INNER_SCALE: f64 = 0.99;
/// Vertical stretch of the hollowing cutter.
const INNER_STRETCH: f64 = 1.2;

/// The solids making up one floor.
#[derive(Debug, Clone, Default)]
pub struct FloorBuild {
    /// Walls with every opening cut.
    pub walls: Solid,
    /// One glass pane per window opening.
    pub panes: Vec<Solid>,
    /// Ramp up to the next floor.
    pub ramp: Option<Solid>,
    pub outcomes: Vec<FeatureOutcome>,
}

/// Builds single floors of a building.
#[derive(Debug)]
pub struct FloorSynthesizer<'a> {
    ctx: BuildContext<'a>,
}

impl<'a> FloorSynthesizer<'a> {
    #[must_use]
    pub fn new(ctx: BuildContext<'a>) -> Self {
        Self { ctx }
    }

    /// Builds a 1-based floor: the hollow shell, then every active feature
    /// in order, each cutting the walls left by the one before.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::SynthesisFailure`] if a boolean operation
    /// fails or leaves no walls.
    pub fn build(&self, floor: u32) -> Result<FloorBuild> {
        let mut build = FloorBuild {
            walls: self.shell(floor)?,
            ..FloorBuild::default()
        };

        for (feature, plan) in self.plans(floor) {
            self.apply(&mut build, floor, feature, &plan)?;
        }

        match Stairwell::plan(&self.ctx, floor) {
            Some(stairwell) => {
                build.ramp = Some(stairwell.ramp(&self.ctx)?);
                build.outcomes.push(FeatureOutcome::Applied {
                    feature: Feature::Stairwell,
                    floor,
                    openings: 1,
                });
                debug!(floor, "stairwell applied");
            }
            None if self.ctx.flags.storeys => {
                build.outcomes.push(FeatureOutcome::Skipped {
                    feature: Feature::Stairwell,
                    floor,
                    reason: "no space for stairs",
                });
                debug!(floor, "no space for stairs");
            }
            None => {}
        }

        Ok(build)
    }

    /// Outer box minus a slightly smaller, taller box. The ground floor keeps
    /// a thin slab; upper floors are open top and bottom so they stack.
    fn shell(&self, floor: u32) -> Result<Solid> {
        let config = self.ctx.config;
        let fp = self.ctx.footprint;
        let offset = self.ctx.floor_offset(floor);
        let wt = config.wall_thickness;

        let outer = self.ctx.ops.extrude_polygon(
            &rectangle(fp.w, fp.h),
            &[],
            offset,
            offset + config.floor_height,
        )?;
        let (bottom, top) = if floor == 1 {
            (offset + wt, offset + INNER_STRETCH * config.floor_height + wt)
        } else {
            let top = offset + config.floor_height + 2.0 * wt;
            (top - INNER_STRETCH * (config.floor_height + 4.0 * wt), top)
        };
        let inner = self.ctx.ops.extrude_polygon(
            &rectangle(INNER_SCALE * fp.w, INNER_SCALE * fp.h),
            &[],
            bottom,
            top,
        )?;

        let walls = self.ctx.ops.subtract(&outer, &inner)?;
        if walls.is_empty() {
            return Err(OperationError::SynthesisFailure(format!(
                "floor {floor} shell is empty"
            ))
            .into());
        }
        Ok(walls)
    }

    /// Plans every feature active on this floor, in cutting order.
    fn plans(&self, floor: u32) -> Vec<(Feature, Plan)> {
        let flags = self.ctx.flags;
        let config = self.ctx.config;
        let fp = self.ctx.footprint;
        let offset = self.ctx.floor_offset(floor);
        let even = floor % 2 == 0;

        let mut plans = Vec::new();
        if floor == 1 {
            plans.push((Feature::Door, features::door(fp, config, flags.door, offset)));
        }
        if flags.door_side_windows {
            plans.push((
                Feature::DoorSideWindows,
                features::door_side_windows(fp, config, offset),
            ));
        }
        if flags.alternate_floor_door_side_windows && even {
            plans.push((
                Feature::AlternateDoorSideWindows,
                features::alternate_door_side_windows(fp, config, offset),
            ));
        }
        if flags.other_side_windows {
            plans.push((
                Feature::OtherSideWindows,
                features::other_side_windows(fp, config, offset),
            ));
        }
        if flags.round_windows_other_sides && !even {
            let reduced = flags.storeys && self.ctx.floors > 1;
            plans.push((
                Feature::RoundWindows,
                features::round_windows(fp, config, offset, reduced),
            ));
        }
        if flags.alternate_floor_other_side_windows && even {
            plans.push((
                Feature::AlternateOtherSideWindows,
                features::alternate_other_side_windows(fp, config, offset),
            ));
        }
        if flags.side_windows {
            plans.push((Feature::SideWindows, features::side_windows(fp, config, offset)));
        }
        plans
    }

    /// Cuts one feature. Windows also get glass panes, taken from the walls
    /// as they were before this feature's cuts.
    fn apply(&self, build: &mut FloorBuild, floor: u32, feature: Feature, plan: &Plan) -> Result<()> {
        let cutters = match plan {
            Plan::Cut(cutters) => cutters,
            &Plan::Skip(reason) => {
                debug!(floor, %feature, reason, "feature skipped");
                build.outcomes.push(FeatureOutcome::Skipped {
                    feature,
                    floor,
                    reason,
                });
                return Ok(());
            }
        };

        let ops = self.ctx.ops;
        let glazed = feature != Feature::Door;
        let before = build.walls.clone();
        for cutter in cutters {
            let volume = cutter.solid(ops)?;
            build.walls = ops.subtract(&build.walls, &volume)?;
            if glazed {
                let pane = ops.intersect(&before, &volume)?.with_material(Material::Glass);
                if !pane.is_empty() {
                    build.panes.push(pane);
                }
            }
        }
        if build.walls.is_empty() {
            return Err(OperationError::SynthesisFailure(format!(
                "{feature} removed every wall of floor {floor}"
            ))
            .into());
        }

        debug!(floor, %feature, openings = cutters.len(), "feature applied");
        build.outcomes.push(FeatureOutcome::Applied {
            feature,
            floor,
            openings: cutters.len(),
        });
        Ok(())
    }
}

/// Axis-aligned rectangle profile centred on the origin.
pub(super) fn rectangle(w: f64, h: f64) -> [Point2; 4] {
    [
        Point2::new(-w, -h),
        Point2::new(w, -h),
        Point2::new(w, h),
        Point2::new(-w, h),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::config::BuildConfig;
    use crate::solid::BspOps;
    use crate::style::{resolve, StyleFlags};
    use crate::synthesis::Footprint;

    fn synth(config: &BuildConfig, flags: StyleFlags, w: f64, h: f64, floors: u32) -> FloorSynthesizer<'_> {
        FloorSynthesizer::new(BuildContext {
            config,
            flags,
            footprint: Footprint::new(w, h),
            floors,
            ops: &BspOps,
        })
    }

    fn bare(flags: StyleFlags) -> StyleFlags {
        StyleFlags {
            door_side_windows: false,
            other_side_windows: false,
            round_windows_other_sides: false,
            side_windows: false,
            alternate_floor_door_side_windows: false,
            alternate_floor_other_side_windows: false,
            ..flags
        }
    }

    fn applied(build: &FloorBuild) -> Vec<Feature> {
        build
            .outcomes
            .iter()
            .filter(|o| o.is_applied())
            .map(FeatureOutcome::feature)
            .collect()
    }

    #[test]
    fn ground_floor_shell_keeps_a_slab() {
        let config = BuildConfig::default();
        let flags = bare(resolve(1, false));
        // Too narrow for a door, so only the shell remains.
        let build = synth(&config, flags, 2.0, 2.0, 1).build(1).unwrap();
        let outer = 4.0 * 4.0 * 4.0;
        let inner = 3.96 * 3.96 * 3.9;
        assert_relative_eq!(build.walls.volume(), outer - inner, epsilon = 1e-6);
        assert!(build.panes.is_empty());
        assert_eq!(
            build.outcomes,
            vec![FeatureOutcome::Skipped {
                feature: Feature::Door,
                floor: 1,
                reason: "no space for door",
            }]
        );
    }

    #[test]
    fn upper_floor_shell_is_open() {
        let config = BuildConfig::default();
        let flags = bare(resolve(2, false));
        let build = synth(&config, flags, 2.0, 2.0, 2).build(2).unwrap();
        let walls = 4.0 * 4.0 * 4.0 - 3.96 * 3.96 * 4.0;
        assert_relative_eq!(build.walls.volume(), walls, epsilon = 1e-6);
        let bounds = build.walls.bounds().unwrap();
        assert_relative_eq!(bounds.min.y, 4.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.max.y, 8.0, epsilon = 1e-9);
    }

    #[test]
    fn door_removes_its_share_of_wall() {
        let config = BuildConfig::default();
        let flags = bare(resolve(1, false));
        let build = synth(&config, flags, 7.5, 7.5, 1).build(1).unwrap();
        assert_relative_eq!(build.walls.volume(), 39.962_25 - 0.45, epsilon = 1e-6);
        assert_eq!(applied(&build), vec![Feature::Door]);
        assert!(build.panes.is_empty());
    }

    #[test]
    fn style_one_ground_floor() {
        let config = BuildConfig::default();
        let build = synth(&config, resolve(1, false), 7.5, 7.5, 1).build(1).unwrap();
        assert_eq!(
            applied(&build),
            vec![Feature::Door, Feature::DoorSideWindows, Feature::OtherSideWindows]
        );
        assert_eq!(build.panes.len(), 4);
        for pane in &build.panes {
            assert_relative_eq!(pane.volume(), 1.2, epsilon = 1e-6);
            assert!(pane.has_material(Material::Glass));
            assert!(!pane.has_material(Material::Building));
        }
        assert_relative_eq!(build.walls.volume(), 39.512_25 - 4.8, epsilon = 1e-6);
        assert!(build.ramp.is_none());
    }

    #[test]
    fn narrow_footprint_skips_every_opening() {
        let config = BuildConfig::default();
        let build = synth(&config, resolve(1, false), 1.0, 1.0, 1).build(1).unwrap();
        assert!(build.outcomes.iter().all(|o| !o.is_applied()));
        assert_eq!(build.outcomes.len(), 3);
        assert!(build.panes.is_empty());
        assert!(build.walls.volume() > 0.0);
    }

    #[test]
    fn alternate_windows_follow_floor_parity() {
        let config = BuildConfig::default();
        let s = synth(&config, resolve(3, false), 7.5, 7.5, 3);
        let odd = s.build(3).unwrap();
        assert!(applied(&odd).is_empty());
        let even = s.build(2).unwrap();
        assert_eq!(
            applied(&even),
            vec![
                Feature::AlternateDoorSideWindows,
                Feature::AlternateOtherSideWindows
            ]
        );
        assert_eq!(even.panes.len(), 2);
    }

    #[test]
    fn round_windows_on_odd_floors() {
        let config = BuildConfig::default();
        let flags = StyleFlags {
            round_windows_other_sides: true,
            ..bare(resolve(4, false))
        };
        let s = synth(&config, flags, 7.5, 7.5, 1);
        let build = s.build(3).unwrap();
        assert_eq!(applied(&build), vec![Feature::RoundWindows]);
        assert_eq!(build.panes.len(), 2);
        assert!(applied(&s.build(2).unwrap()).is_empty());
    }

    #[test]
    fn storeys_add_a_ramp() {
        let config = BuildConfig::default();
        let s = synth(&config, bare(resolve(2, true)), 7.5, 7.5, 2);
        let build = s.build(1).unwrap();
        assert!(build.ramp.is_some());
        assert!(applied(&build).contains(&Feature::Stairwell));

        let narrow = synth(&config, bare(resolve(2, true)), 3.0, 3.0, 2).build(1).unwrap();
        assert!(narrow.ramp.is_none());
        assert!(narrow.outcomes.contains(&FeatureOutcome::Skipped {
            feature: Feature::Stairwell,
            floor: 1,
            reason: "no space for stairs",
        }));
    }
}
