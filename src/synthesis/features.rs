//! Opening layouts for doors and windows.
//!
//! Each planner checks the space a feature needs against the footprint and
//! falls back to fewer openings before giving up. Planning is pure; cutting
//! happens in the floor synthesizer.

use super::Footprint;
use crate::config::BuildConfig;
use crate::error::Result;
use crate::math::{Point2, Point3, Vector3};
use crate::solid::{Solid, SolidOps};
use crate::style::DoorKind;

/// How far a face-local cutter reaches either side of its wall.
const CUTTER_REACH: f64 = 1.0;

/// A volume removed from a wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cutter {
    /// Axis-aligned box.
    Block { min: Point3, max: Point3 },
    /// Faceted cylinder with its axis along x.
    Cylinder {
        center: Point3,
        radius: f64,
        length: f64,
        segments: usize,
    },
}

impl Cutter {
    fn block(x: (f64, f64), y: (f64, f64), z: (f64, f64)) -> Self {
        Self::Block {
            min: Point3::new(x.0, y.0, z.0),
            max: Point3::new(x.1, y.1, z.1),
        }
    }

    /// Builds the cutter volume.
    ///
    /// # Errors
    ///
    /// Returns an error if the cutter has no volume.
    pub fn solid(&self, ops: &dyn SolidOps) -> Result<Solid> {
        match *self {
            Self::Block { min, max } => {
                let profile = [
                    Point2::new(min.x, min.z),
                    Point2::new(max.x, min.z),
                    Point2::new(max.x, max.z),
                    Point2::new(min.x, max.z),
                ];
                ops.extrude_polygon(&profile, &[], min.y, max.y)
            }
            Self::Cylinder {
                center,
                radius,
                length,
                segments,
            } => Ok(ops
                .make_cylinder(radius, length, segments)?
                .translated(Vector3::new(center.x, center.y, center.z))),
        }
    }
}

/// Result of planning one feature.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Cut(Vec<Cutter>),
    Skip(&'static str),
}

impl Plan {
    #[must_use]
    pub fn cutters(&self) -> &[Cutter] {
        match self {
            Self::Cut(cutters) => cutters,
            Self::Skip(_) => &[],
        }
    }
}

/// Vertical extent of the rectangular window band on a floor.
fn window_band(config: &BuildConfig, offset: f64) -> (f64, f64) {
    let top = offset + config.floor_height / 2.0 + config.window_height / 2.0;
    (top - config.window_height, top)
}

/// Door through the +z face, or through both z faces for a double door.
#[must_use]
pub fn door(fp: Footprint, config: &BuildConfig, kind: DoorKind, offset: f64) -> Plan {
    if fp.w <= config.door_width + 2.0 * config.window_padding {
        return Plan::Skip("no space for door");
    }
    let half = config.door_width / 2.0;
    let bottom = offset + config.wall_thickness;
    let z = match kind {
        DoorKind::Single => (fp.h - CUTTER_REACH, fp.h + CUTTER_REACH),
        DoorKind::Double => (-fp.h - CUTTER_REACH, fp.h + CUTTER_REACH),
    };
    Plan::Cut(vec![Cutter::block(
        (-half, half),
        (bottom, bottom + config.door_height),
        z,
    )])
}

/// Windows on the door faces: two flanking the door through both faces, else
/// two across the back face, else one centred on the back face.
#[must_use]
pub fn door_side_windows(fp: Footprint, config: &BuildConfig, offset: f64) -> Plan {
    let width = 2.0 * fp.w;
    let ww = config.window_width;
    let pad = config.window_padding;
    let band = window_band(config, offset);
    let back_face = (-fp.h - CUTTER_REACH, -fp.h + CUTTER_REACH);
    let window = |center: f64, z: (f64, f64)| {
        Cutter::block((center - ww / 2.0, center + ww / 2.0), band, z)
    };

    if width > 2.0 * ww + 4.0 * pad + config.door_width {
        let half_door = config.door_width / 2.0;
        let center = (fp.w - half_door) / 2.0 + half_door;
        let through = (-2.0 * fp.h, 2.0 * fp.h);
        Plan::Cut(vec![window(center, through), window(-center, through)])
    } else if width > 2.0 * ww + 3.0 * pad {
        let spacing = (width - 2.0 * ww) / 3.0;
        let center = spacing / 2.0 + ww / 2.0;
        Plan::Cut(vec![window(center, back_face), window(-center, back_face)])
    } else if width > ww + 2.0 * pad {
        Plan::Cut(vec![window(0.0, back_face)])
    } else {
        Plan::Skip("no space for windows around doors")
    }
}

/// One window centred on the +z face.
#[must_use]
pub fn alternate_door_side_windows(fp: Footprint, config: &BuildConfig, offset: f64) -> Plan {
    let ww = config.window_width;
    if 2.0 * fp.w <= ww + 2.0 * config.window_padding {
        return Plan::Skip("no space for windows around doors");
    }
    Plan::Cut(vec![Cutter::block(
        (-ww / 2.0, ww / 2.0),
        window_band(config, offset),
        (fp.h - CUTTER_REACH, fp.h + CUTTER_REACH),
    )])
}

/// Windows through both x faces: two, else one centred.
#[must_use]
pub fn other_side_windows(fp: Footprint, config: &BuildConfig, offset: f64) -> Plan {
    let depth = 2.0 * fp.h;
    let ww = config.window_width;
    let pad = config.window_padding;
    let band = window_band(config, offset);
    let window = |center: f64| {
        Cutter::block(
            (-2.0 * fp.w, 2.0 * fp.w),
            band,
            (center - ww / 2.0, center + ww / 2.0),
        )
    };

    if depth > 2.0 * ww + 3.0 * pad {
        let spacing = (depth - 2.0 * ww) / 3.0;
        let center = spacing / 2.0 + ww / 2.0;
        Plan::Cut(vec![window(center), window(-center)])
    } else if depth > ww + 2.0 * pad {
        Plan::Cut(vec![window(0.0)])
    } else {
        Plan::Skip("no space for windows")
    }
}

/// Round windows through both x faces: two, else one centred.
///
/// With `reduced` set, the two-window layout uses the reduced segment count.
/// The one-window layout always uses the full count.
#[must_use]
pub fn round_windows(fp: Footprint, config: &BuildConfig, offset: f64, reduced: bool) -> Plan {
    let depth = 2.0 * fp.h;
    let d = config.round_window_diameter;
    let pad = config.window_padding;
    let window = |z: f64, segments: u32| Cutter::Cylinder {
        center: Point3::new(0.0, offset + config.floor_height / 2.0, z),
        radius: d / 2.0,
        length: 3.0 * fp.w,
        segments: segments as usize,
    };

    if depth > 2.0 * d + 3.0 * pad {
        let spacing = (depth - (2.0 * d + 3.0 * pad)) / 3.0;
        let center = spacing / 2.0 + d / 2.0;
        let segments = if reduced {
            config.reduced_round_window_segments
        } else {
            config.round_window_segments
        };
        Plan::Cut(vec![window(center, segments), window(-center, segments)])
    } else if depth > d + 2.0 * pad {
        // one-window layout
        Plan::Cut(vec![window(0.0, config.round_window_segments)])
    } else {
        Plan::Skip("no space for windows")
    }
}

/// One window through both x faces at the centre. The cutter spans
/// `±2h` along x, so very wide footprints leave the walls untouched.
#[must_use]
pub fn alternate_other_side_windows(fp: Footprint, config: &BuildConfig, offset: f64) -> Plan {
    let ww = config.window_width;
    if 2.0 * fp.h <= ww + 2.0 * config.window_padding {
        return Plan::Skip("no space for windows");
    }
    Plan::Cut(vec![Cutter::block(
        (-2.0 * fp.h, 2.0 * fp.h),
        window_band(config, offset),
        (-ww / 2.0, ww / 2.0),
    )])
}

/// Two tall window bands through both z faces, one each side of the door.
/// Always planned.
#[must_use]
pub fn side_windows(fp: Footprint, config: &BuildConfig, offset: f64) -> Plan {
    let top = offset + config.floor_height - 0.5;
    let band = (top - (config.floor_height - 1.0), top);
    let through = (-2.0 * fp.h, 2.0 * fp.h);
    let near = config.door_width;
    Plan::Cut(vec![
        Cutter::block((near, near + fp.w), band, through),
        Cutter::block((-near - fp.w, -near), band, through),
    ])
}
