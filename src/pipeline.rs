//! From place boundary to building: the request pipeline and the stateful
//! session that drives it.

use std::path::Path;

use tracing::{error, info, warn};

use crate::boundary::{BoundaryMetadata, BoundarySource};
use crate::config::BuildConfig;
use crate::error::{BoundaryError, ExportError, Result};
use crate::export::{Color, MeshExporter, DEFAULT_BUILDING_COLOR};
use crate::fitting::{fit, FittedRectangle};
use crate::solid::{BspOps, SolidOps};
use crate::style::resolve;
use crate::synthesis::{assemble, BuildingMesh};

/// Everything needed to generate one building.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildRequest {
    pub boundary: Option<BoundaryMetadata>,
    pub style_id: u8,
    pub storeys: bool,
}

/// Fits a rectangle into the request's boundary and builds on it.
///
/// Returns `Ok(None)` when there is no boundary or no rectangle fits.
///
/// # Errors
///
/// Returns [`crate::error::OperationError::SynthesisFailure`] if the
/// building cannot be synthesized. The failure is logged here.
pub fn generate(
    request: &BuildRequest,
    config: &BuildConfig,
    ops: &dyn SolidOps,
) -> Result<Option<BuildingMesh>> {
    let Some(boundary) = &request.boundary else {
        warn!("no boundary data, nothing to build");
        return Ok(None);
    };
    let Some(rect) = fit(boundary, &config.search) else {
        info!("no rectangle fits the boundary");
        return Ok(None);
    };
    build_fitted(
        &rect,
        boundary.build_height,
        request.style_id,
        request.storeys,
        config,
        ops,
    )
    .map(Some)
}

/// Builds on an already fitted rectangle.
///
/// # Errors
///
/// Returns [`crate::error::OperationError::SynthesisFailure`] if the
/// building cannot be synthesized. The failure is logged here.
pub fn build_fitted(
    rect: &FittedRectangle,
    build_height: f64,
    style_id: u8,
    storeys: bool,
    config: &BuildConfig,
    ops: &dyn SolidOps,
) -> Result<BuildingMesh> {
    let flags = resolve(style_id, storeys);
    assemble(rect, flags, build_height, config, ops)
        .inspect_err(|e| error!(error = %e, style_id, storeys, "building synthesis failed"))
}

/// The currently displayed place and building.
///
/// The boundary and fitted rectangle are cached per place, so style and
/// storeys changes only rebuild the geometry. Every mutation takes
/// `&mut self`, which serializes regeneration.
pub struct BuildingSession<S> {
    source: S,
    config: BuildConfig,
    ops: Box<dyn SolidOps>,
    place_id: Option<String>,
    boundary: Option<BoundaryMetadata>,
    fitted: Option<FittedRectangle>,
    style_id: u8,
    storeys: bool,
    color: Color,
    mesh: Option<BuildingMesh>,
    generations: u64,
}

impl<S: BoundarySource> BuildingSession<S> {
    /// Creates a session with style 1, one storey and BSP solid operations.
    #[must_use]
    pub fn new(source: S, config: BuildConfig) -> Self {
        Self {
            source,
            config,
            ops: Box::new(BspOps),
            place_id: None,
            boundary: None,
            fitted: None,
            style_id: 1,
            storeys: false,
            color: DEFAULT_BUILDING_COLOR,
            mesh: None,
            generations: 0,
        }
    }

    /// Replaces the solid operations backend.
    #[must_use]
    pub fn with_ops(mut self, ops: impl SolidOps + 'static) -> Self {
        self.ops = Box::new(ops);
        self
    }

    /// Shows a place. The boundary is fetched and refitted only when the id
    /// changes or `forced` is set; the building is always regenerated.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::NoBoundaryData`] if the place has no
    /// boundary, after tearing down the current building. Fetch and
    /// synthesis errors are passed through.
    pub fn load_place(&mut self, place_id: &str, forced: bool) -> Result<()> {
        let same_place = self.place_id.as_deref() == Some(place_id);
        self.place_id = Some(place_id.to_owned());

        if forced || !same_place {
            info!(place_id, "loading place");
            self.boundary = None;
            self.fitted = None;
            self.boundary = self.source.fetch(place_id)?;
            self.fitted = self
                .boundary
                .as_ref()
                .and_then(|b| fit(b, &self.config.search));
        }

        if self.boundary.is_none() {
            warn!(place_id, "place has no boundary data");
            self.mesh = None;
            return Err(BoundaryError::NoBoundaryData {
                place_id: place_id.to_owned(),
            }
            .into());
        }
        self.regenerate()
    }

    /// Switches style and rebuilds.
    ///
    /// # Errors
    ///
    /// Returns an error if synthesis fails; the previous building stays.
    pub fn set_style(&mut self, style_id: u8) -> Result<()> {
        self.style_id = style_id;
        self.regenerate()
    }

    /// Switches between one and many storeys and rebuilds.
    ///
    /// # Errors
    ///
    /// Returns an error if synthesis fails; the previous building stays.
    pub fn set_storeys(&mut self, storeys: bool) -> Result<()> {
        self.storeys = storeys;
        self.regenerate()
    }

    /// Retints the building. Geometry is untouched.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Rebuilds the building from the cached fit.
    ///
    /// With no fitted rectangle the building is torn down.
    ///
    /// # Errors
    ///
    /// Returns an error if synthesis fails, leaving the previous building in
    /// place.
    pub fn regenerate(&mut self) -> Result<()> {
        let (Some(boundary), Some(rect)) = (&self.boundary, &self.fitted) else {
            self.mesh = None;
            return Ok(());
        };
        let mesh = build_fitted(
            rect,
            boundary.build_height,
            self.style_id,
            self.storeys,
            &self.config,
            self.ops.as_ref(),
        )?;
        info!(
            place_id = self.place_id.as_deref().unwrap_or_default(),
            triangles = mesh.triangle_count(),
            "building generated"
        );
        self.mesh = Some(mesh);
        self.generations += 1;
        Ok(())
    }

    /// Writes the current building, and nothing else, through `exporter`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Empty`] when there is no building, or the
    /// exporter's error.
    pub fn export(&self, exporter: &dyn MeshExporter, path: &Path) -> Result<()> {
        let mesh = self.mesh.as_ref().ok_or(ExportError::Empty)?;
        exporter.export(mesh, self.color, path)
    }

    #[must_use]
    pub fn mesh(&self) -> Option<&BuildingMesh> {
        self.mesh.as_ref()
    }

    #[must_use]
    pub fn fitted(&self) -> Option<&FittedRectangle> {
        self.fitted.as_ref()
    }

    #[must_use]
    pub fn boundary(&self) -> Option<&BoundaryMetadata> {
        self.boundary.as_ref()
    }

    #[must_use]
    pub fn place_id(&self) -> Option<&str> {
        self.place_id.as_deref()
    }

    #[must_use]
    pub fn style_id(&self) -> u8 {
        self.style_id
    }

    #[must_use]
    pub fn storeys(&self) -> bool {
        self.storeys
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Number of buildings generated so far.
    #[must_use]
    pub fn generations(&self) -> u64 {
        self.generations
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use approx::assert_relative_eq;

    use super::*;
    use crate::boundary::{InMemoryBoundarySource, Polygon};
    use crate::error::{OperationError, PlacesmithError};
    use crate::math::Point2;
    use crate::solid::Solid;
    use crate::synthesis::{Feature, FeatureOutcome, PartKind};

    fn square(build_height: f64) -> BoundaryMetadata {
        let polygon = Polygon::new(vec![
            Point2::new(10.0, 10.0),
            Point2::new(-10.0, 10.0),
            Point2::new(-10.0, -10.0),
            Point2::new(10.0, -10.0),
        ])
        .unwrap();
        BoundaryMetadata::new(polygon, build_height).unwrap()
    }

    fn request(boundary: Option<BoundaryMetadata>, style_id: u8, storeys: bool) -> BuildRequest {
        BuildRequest {
            boundary,
            style_id,
            storeys,
        }
    }

    fn applied(mesh: &BuildingMesh, feature: Feature) -> Vec<usize> {
        mesh.outcomes
            .iter()
            .filter_map(|o| match o {
                FeatureOutcome::Applied {
                    feature: f,
                    openings,
                    ..
                } if *f == feature => Some(*openings),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn square_style_one_single_storey() {
        let config = BuildConfig::default();
        let mesh = generate(&request(Some(square(8.0)), 1, false), &config, &BspOps)
            .unwrap()
            .unwrap();
        assert_eq!(mesh.floors, 1);
        assert_eq!(applied(&mesh, Feature::Door), vec![1]);
        assert_eq!(applied(&mesh, Feature::DoorSideWindows), vec![2]);
        assert_eq!(applied(&mesh, Feature::OtherSideWindows), vec![2]);
        assert_eq!(mesh.parts_of(PartKind::Roof).count(), 1);
        assert_eq!(mesh.parts_of(PartKind::Walls).count(), 1);
        // Gable ridge above the 4 unit floor.
        let top = mesh.merged().bounds().unwrap().max.y;
        assert_relative_eq!(top, 5.85, epsilon = 1e-9);
        assert!(mesh.triangle_count() > 0);
    }

    #[test]
    fn square_with_storeys() {
        let config = BuildConfig::default();
        let mesh = generate(&request(Some(square(9.0)), 1, true), &config, &BspOps)
            .unwrap()
            .unwrap();
        assert_eq!(mesh.floors, 2);
        assert_eq!(mesh.parts_of(PartKind::Walls).count(), 2);
        // Flat roofs replace the gable.
        let top = mesh.merged().bounds().unwrap().max.y;
        assert_relative_eq!(top, 8.1, epsilon = 1e-9);
        assert_eq!(applied(&mesh, Feature::Stairwell).len(), 2);
        let roofs: Vec<_> = mesh.parts_of(PartKind::Roof).collect();
        assert_eq!(roofs.len(), 2);
        let full_slab = 15.15 * 15.15 * 0.1;
        for roof in roofs {
            assert_relative_eq!(roof.solid.volume(), full_slab - 0.76, epsilon = 1e-6);
        }
    }

    #[test]
    fn tiny_boundary_gets_bare_walls() {
        let config = BuildConfig::default();
        let polygon = Polygon::new(vec![
            Point2::new(-1.0, -1.0),
            Point2::new(1.0, -1.0),
            Point2::new(0.0, 1.0),
        ])
        .unwrap();
        let boundary = BoundaryMetadata::new(polygon, 8.0).unwrap();
        let mesh = generate(&request(Some(boundary), 1, false), &config, &BspOps)
            .unwrap()
            .unwrap();
        assert!(mesh.outcomes.iter().all(|o| !o.is_applied()));
        assert_eq!(mesh.parts_of(PartKind::Glass).count(), 0);
        let walls = mesh.parts_of(PartKind::Walls).next().unwrap();
        assert!(walls.solid.volume() > 0.0);
    }

    #[test]
    fn missing_boundary_builds_nothing() {
        let config = BuildConfig::default();
        let result = generate(&request(None, 1, false), &config, &BspOps).unwrap();
        assert!(result.is_none());
    }

    /// Counts fetches on top of an in-memory source.
    struct CountingSource {
        inner: InMemoryBoundarySource,
        fetches: Rc<Cell<usize>>,
    }

    impl BoundarySource for CountingSource {
        fn fetch(&self, place_id: &str) -> Result<Option<BoundaryMetadata>> {
            self.fetches.set(self.fetches.get() + 1);
            self.inner.fetch(place_id)
        }
    }

    fn session() -> (BuildingSession<CountingSource>, Rc<Cell<usize>>) {
        let fetches = Rc::new(Cell::new(0));
        let source = CountingSource {
            inner: InMemoryBoundarySource::new()
                .with_place("1", square(8.0))
                .with_place("2", square(9.0)),
            fetches: Rc::clone(&fetches),
        };
        (BuildingSession::new(source, BuildConfig::default()), fetches)
    }

    #[test]
    fn same_place_is_not_refetched() {
        let (mut session, fetches) = session();
        session.load_place("1", false).unwrap();
        session.load_place("1", false).unwrap();
        assert_eq!(fetches.get(), 1);
        assert_eq!(session.generations(), 2);
        session.load_place("1", true).unwrap();
        assert_eq!(fetches.get(), 2);
        let fitted = session.fitted().unwrap();
        assert_relative_eq!(fitted.scale, 1.5);
    }

    #[test]
    fn unknown_place_tears_down_the_building() {
        let (mut session, _) = session();
        session.load_place("1", false).unwrap();
        assert!(session.mesh().is_some());

        let err = session.load_place("42", false).unwrap_err();
        assert!(matches!(
            err,
            PlacesmithError::Boundary(BoundaryError::NoBoundaryData { ref place_id }) if place_id == "42"
        ));
        assert!(session.mesh().is_none());
        assert!(session.fitted().is_none());
    }

    #[test]
    fn color_only_retints() {
        let (mut session, _) = session();
        session.load_place("1", false).unwrap();
        let before = session.mesh().cloned();
        session.set_color([0.1, 0.2, 0.3]);
        assert_eq!(session.generations(), 1);
        assert_eq!(session.mesh().cloned(), before);
        assert_eq!(session.color(), [0.1, 0.2, 0.3]);
    }

    #[test]
    fn style_and_storeys_regenerate() {
        let (mut session, _) = session();
        // 9 units of height allow floor(9 / 4.1) = 2 storeys.
        session.load_place("2", false).unwrap();
        session.set_style(2).unwrap();
        assert_eq!(session.generations(), 2);
        assert_eq!(session.mesh().unwrap().outcomes[0].feature(), Feature::Door);
        assert_eq!(session.mesh().unwrap().floors, 1);
        session.set_storeys(true).unwrap();
        assert_eq!(session.generations(), 3);
        assert_eq!(session.mesh().unwrap().floors, 2);
    }

    #[test]
    fn storeys_on_a_low_budget_build_one_floor() {
        let (mut session, _) = session();
        session.load_place("1", false).unwrap();
        session.set_storeys(true).unwrap();
        let mesh = session.mesh().unwrap();
        assert_eq!(mesh.floors, 1);
        assert_eq!(mesh.parts_of(PartKind::Walls).count(), 1);
        assert_eq!(mesh.parts_of(PartKind::Roof).count(), 1);
    }

    /// BSP operations that can be told to fail every subtraction.
    struct FlakyOps {
        fail: Rc<Cell<bool>>,
    }

    impl SolidOps for FlakyOps {
        fn subtract(&self, base: &Solid, cutter: &Solid) -> Result<Solid> {
            if self.fail.get() {
                return Err(OperationError::SynthesisFailure("forced".into()).into());
            }
            BspOps.subtract(base, cutter)
        }

        fn intersect(&self, a: &Solid, b: &Solid) -> Result<Solid> {
            BspOps.intersect(a, b)
        }

        fn union(&self, a: &Solid, b: &Solid) -> Result<Solid> {
            BspOps.union(a, b)
        }

        fn extrude_polygon(
            &self,
            profile: &[Point2],
            holes: &[Vec<Point2>],
            bottom: f64,
            top: f64,
        ) -> Result<Solid> {
            BspOps.extrude_polygon(profile, holes, bottom, top)
        }
    }

    #[test]
    fn synthesis_failure_keeps_the_previous_building() {
        let fail = Rc::new(Cell::new(false));
        let (session, _) = session();
        let mut session = session.with_ops(FlakyOps {
            fail: Rc::clone(&fail),
        });
        session.load_place("1", false).unwrap();
        let before = session.mesh().cloned();

        fail.set(true);
        let err = session.set_style(3).unwrap_err();
        assert!(matches!(
            err,
            PlacesmithError::Operation(OperationError::SynthesisFailure(_))
        ));
        assert_eq!(session.mesh().cloned(), before);
        assert_eq!(session.generations(), 1);
    }

    #[test]
    fn export_needs_a_building() {
        let (session, _) = session();
        let exporter = crate::export::ObjExporter::new();
        let err = session
            .export(&exporter, Path::new("unused.obj"))
            .unwrap_err();
        assert!(matches!(err, PlacesmithError::Export(ExportError::Empty)));
    }
}
