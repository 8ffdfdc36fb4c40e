//! Maps a style selection onto the architectural features a building gets.

/// Door openings cut into the ground floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorKind {
    /// One opening on the +z face.
    Single,
    /// One opening running through both z faces.
    Double,
}

/// Roof variants; exactly one applies to a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoofKind {
    Flat,
    Gable,
    /// Flat slab with a rectangular opening.
    Hole,
}

/// Feature switches derived from a style selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleFlags {
    pub door: DoorKind,
    /// Rectangular windows on the door faces, every floor.
    pub door_side_windows: bool,
    /// Rectangular windows on the x faces, every floor.
    pub other_side_windows: bool,
    /// Round windows on the x faces, odd floors.
    pub round_windows_other_sides: bool,
    /// Full-height window bands through the door faces.
    pub side_windows: bool,
    /// One window on the +z face, even floors.
    pub alternate_floor_door_side_windows: bool,
    /// One window through the x faces, even floors.
    pub alternate_floor_other_side_windows: bool,
    pub roof: RoofKind,
    /// Multi-storey building with stairwells between floors.
    pub storeys: bool,
}

impl StyleFlags {
    const fn base(door: DoorKind, roof: RoofKind) -> Self {
        Self {
            door,
            door_side_windows: false,
            other_side_windows: false,
            round_windows_other_sides: false,
            side_windows: false,
            alternate_floor_door_side_windows: false,
            alternate_floor_other_side_windows: false,
            roof,
            storeys: false,
        }
    }
}

/// Resolves a style id and storeys switch into feature flags.
///
/// Ids outside `1..=4` resolve like style 1. Multi-storey buildings always get
/// a single door and a walkable roof: flat, or hole for style 3.
#[must_use]
pub fn resolve(style_id: u8, storeys: bool) -> StyleFlags {
    let mut flags = match style_id {
        2 => StyleFlags {
            side_windows: true,
            ..StyleFlags::base(DoorKind::Single, RoofKind::Flat)
        },
        3 => StyleFlags {
            alternate_floor_door_side_windows: true,
            alternate_floor_other_side_windows: true,
            ..StyleFlags::base(DoorKind::Double, RoofKind::Hole)
        },
        4 => StyleFlags {
            round_windows_other_sides: true,
            ..StyleFlags::base(DoorKind::Double, RoofKind::Flat)
        },
        _ => StyleFlags {
            door_side_windows: true,
            other_side_windows: true,
            ..StyleFlags::base(DoorKind::Single, RoofKind::Gable)
        },
    };

    if storeys {
        flags.storeys = true;
        flags.door = DoorKind::Single;
        if flags.roof != RoofKind::Hole {
            flags.roof = RoofKind::Flat;
        }
    }
    flags
}
