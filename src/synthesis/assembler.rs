use tracing::info;

use super::{BuildContext, FeatureOutcome, FloorSynthesizer, Footprint, RoofSynthesizer};
use crate::config::BuildConfig;
use crate::error::Result;
use crate::fitting::FittedRectangle;
use crate::solid::{Solid, SolidOps};
use crate::style::StyleFlags;

/// Role of a solid within a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    Walls,
    Glass,
    Roof,
    Stairs,
}

/// One solid of a building, tagged with its role and 1-based floor.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPart {
    pub kind: PartKind,
    pub floor: u32,
    pub solid: Solid,
}

/// Every solid of one generated building.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingMesh {
    pub parts: Vec<MeshPart>,
    /// Number of floors built.
    pub floors: u32,
    /// Applied and skipped features, floor by floor.
    pub outcomes: Vec<FeatureOutcome>,
}

impl BuildingMesh {
    /// All parts merged into one solid. Glass keeps its material.
    #[must_use]
    pub fn merged(&self) -> Solid {
        Solid::merge(self.parts.iter().map(|p| p.solid.clone()))
    }

    /// Parts of one kind, in build order.
    pub fn parts_of(&self, kind: PartKind) -> impl Iterator<Item = &MeshPart> {
        self.parts.iter().filter(move |p| p.kind == kind)
    }

    /// Triangles in the triangulated building, one per three vertices of the
    /// triangle soup.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(|p| p.solid.triangle_count()).sum()
    }
}

/// Builds every floor of a building and its roof.
///
/// One floor is built unless the style has storeys, in which case floors are
/// stacked up to what `build_height` allows; at least one is always built.
/// Multi-storey buildings get a roof slab on every floor, which doubles as
/// the ceiling carrying the stairwell opening.
///
/// # Errors
///
/// Returns [`crate::error::OperationError::SynthesisFailure`] if any floor
/// or roof fails to build.
pub fn assemble(
    rect: &FittedRectangle,
    flags: StyleFlags,
    build_height: f64,
    config: &BuildConfig,
    ops: &dyn SolidOps,
) -> Result<BuildingMesh> {
    let ctx = BuildContext {
        config,
        flags,
        footprint: Footprint::of(rect),
        floors: config.floor_count(build_height),
        ops,
    };
    let floors = FloorSynthesizer::new(ctx);
    let roofs = RoofSynthesizer::new(ctx);

    let mut mesh = BuildingMesh::default();
    let mut floor = 1;
    loop {
        let built = floors.build(floor)?;
        mesh.parts.push(MeshPart {
            kind: PartKind::Walls,
            floor,
            solid: built.walls,
        });
        mesh.parts.extend(built.panes.into_iter().map(|solid| MeshPart {
            kind: PartKind::Glass,
            floor,
            solid,
        }));
        if let Some(solid) = built.ramp {
            mesh.parts.push(MeshPart {
                kind: PartKind::Stairs,
                floor,
                solid,
            });
        }
        mesh.outcomes.extend(built.outcomes);

        let roof = roofs.build(floor)?;
        mesh.parts.push(MeshPart {
            kind: PartKind::Roof,
            floor,
            solid: roof.solid,
        });
        mesh.outcomes.extend(roof.outcomes);

        mesh.floors = floor;
        floor += 1;
        if !(flags.storeys && floor <= ctx.floors) {
            break;
        }
    }

    info!(
        floors = mesh.floors,
        parts = mesh.parts.len(),
        triangles = mesh.triangle_count(),
        "building assembled"
    );
    Ok(mesh)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::solid::{BspOps, Material};
    use crate::style::resolve;
    use crate::synthesis::Feature;
    use crate::tessellation::TessellateSolid;

    fn rect(half: f64) -> FittedRectangle {
        FittedRectangle {
            half_width: half,
            half_height: half,
            scale: 1.5,
            rotation: 0.0,
            displacement_x: 0.0,
            displacement_z: 0.0,
        }
    }

    fn count(mesh: &BuildingMesh, kind: PartKind) -> usize {
        mesh.parts_of(kind).count()
    }

    #[test]
    fn single_storey_builds_one_floor_and_one_roof() {
        let config = BuildConfig::default();
        let mesh = assemble(&rect(5.0), resolve(1, false), 41.0, &config, &BspOps).unwrap();
        assert_eq!(mesh.floors, 1);
        assert_eq!(count(&mesh, PartKind::Walls), 1);
        assert_eq!(count(&mesh, PartKind::Roof), 1);
        assert_eq!(count(&mesh, PartKind::Stairs), 0);
        assert_eq!(count(&mesh, PartKind::Glass), 4);
        assert!(mesh.merged().has_material(Material::Glass));
    }

    #[test]
    fn storeys_stack_floors_with_stairs() {
        let config = BuildConfig::default();
        let mesh = assemble(&rect(5.0), resolve(1, true), 9.0, &config, &BspOps).unwrap();
        assert_eq!(mesh.floors, 2);
        assert_eq!(count(&mesh, PartKind::Walls), 2);
        assert_eq!(count(&mesh, PartKind::Roof), 2);
        assert_eq!(count(&mesh, PartKind::Stairs), 2);
        let stairwells = mesh
            .outcomes
            .iter()
            .filter(|o| o.feature() == Feature::Stairwell && o.is_applied())
            .count();
        assert_eq!(stairwells, 2);
        let top = mesh.merged().bounds().unwrap().max.y;
        assert!((top - 8.1).abs() < 1e-9);
    }

    #[test]
    fn storeys_build_at_least_one_floor() {
        let config = BuildConfig::default();
        let mesh = assemble(&rect(5.0), resolve(2, true), 3.0, &config, &BspOps).unwrap();
        assert_eq!(mesh.floors, 1);
    }

    #[test]
    fn triangle_count_matches_tessellation() {
        let config = BuildConfig::default();
        let mesh = assemble(&rect(1.0), resolve(2, false), 8.0, &config, &BspOps).unwrap();
        let expected = TessellateSolid::new(&mesh.merged()).execute().triangle_count();
        assert_eq!(mesh.triangle_count(), expected);
        assert!(expected > 0);
    }
}
