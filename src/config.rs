//! Dimensional constants and rectangle search candidates.
//!
//! Everything here has a default matching the shipped building styles; a JSON
//! file can override any subset of fields.

use std::f64::consts::PI;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Dimensions used by the floor, roof and stairwell synthesizers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Floor-to-floor height.
    pub floor_height: f64,
    /// Thickness of roof slabs, ramps and gable panels.
    pub wall_thickness: f64,
    /// Minimum clearance around doors and windows.
    pub window_padding: f64,
    pub door_width: f64,
    pub door_height: f64,
    pub window_width: f64,
    pub window_height: f64,
    pub round_window_diameter: f64,
    pub round_window_segments: u32,
    /// Segment count for round windows on buildings with more than one floor.
    pub reduced_round_window_segments: u32,
    pub stairs_width: f64,
    pub stairs_length: f64,
    /// Ridge height of gable roofs above the top of the walls.
    pub gable_height: f64,
    /// In-plane scale of flat and hole roofs, giving a visible lip.
    pub roof_overhang: f64,
    pub default_hole_factor: f64,
    /// Hole roofs whose hole factor is at or below this get no hole.
    pub min_hole_factor: f64,
    pub search: SearchGrid,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            floor_height: 4.0,
            wall_thickness: 0.1,
            window_padding: 0.2,
            door_width: 2.0,
            door_height: 3.0,
            window_width: 4.0,
            window_height: 2.0,
            round_window_diameter: 3.0,
            round_window_segments: 32,
            reduced_round_window_segments: 8,
            stairs_width: 2.0,
            stairs_length: 4.0,
            gable_height: 1.85,
            roof_overhang: 1.01,
            default_hole_factor: 2.0 / 3.0,
            min_hole_factor: 0.1,
            search: SearchGrid::default(),
        }
    }
}

impl BuildConfig {
    /// Reads a config from a JSON file. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`BuildConfig::validate`].
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::from)?;
        Self::from_json_str(&text)
    }

    /// Parses a config from JSON text. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or fails validation.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every dimension is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] for non-positive dimensions or
    /// segment counts below 3, and [`ConfigError::EmptyGrid`] for an empty
    /// search axis.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("floor_height", self.floor_height),
            ("wall_thickness", self.wall_thickness),
            ("door_width", self.door_width),
            ("door_height", self.door_height),
            ("window_width", self.window_width),
            ("window_height", self.window_height),
            ("round_window_diameter", self.round_window_diameter),
            ("stairs_width", self.stairs_width),
            ("stairs_length", self.stairs_length),
            ("gable_height", self.gable_height),
            ("roof_overhang", self.roof_overhang),
            ("default_hole_factor", self.default_hole_factor),
        ];
        for (name, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::OutOfRange { name, value }.into());
            }
        }
        if self.window_padding < 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "window_padding",
                value: self.window_padding,
            }
            .into());
        }
        for (name, segments) in [
            ("round_window_segments", self.round_window_segments),
            ("reduced_round_window_segments", self.reduced_round_window_segments),
        ] {
            if segments < 3 {
                return Err(ConfigError::OutOfRange {
                    name,
                    value: f64::from(segments),
                }
                .into());
            }
        }
        self.search.validate()
    }

    /// Number of storeys a build height allows: `floor(height / (floor + wall))`.
    #[must_use]
    pub fn floor_count(&self, build_height: f64) -> u32 {
        let floors = (build_height / (self.floor_height + self.wall_thickness)).floor();
        if floors.is_finite() && floors > 0.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let floors = floors.min(f64::from(u32::MAX)) as u32;
            floors
        } else {
            0
        }
    }
}

/// Candidate transforms enumerated by the rectangle fitter.
///
/// Enumeration nests scale, displacement x, displacement z, then rotation, in
/// the order the vectors hold them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchGrid {
    pub scales: Vec<f64>,
    pub displacements: Vec<f64>,
    /// Rotation angles in radians.
    pub rotations: Vec<f64>,
}

impl Default for SearchGrid {
    fn default() -> Self {
        Self {
            scales: vec![1.0, 0.9, 1.1, 0.8, 1.2, 0.7, 1.3, 0.5, 1.5],
            displacements: vec![
                0.0, 2.0, 4.0, 6.0, 8.0, 10.0, -2.0, -4.0, -6.0, -8.0, -10.0,
            ],
            rotations: (0..6).map(|i| f64::from(i) * PI / 6.0).collect(),
        }
    }
}

impl SearchGrid {
    /// Total number of candidates the fitter will test.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.scales.len() * self.displacements.len() * self.displacements.len() * self.rotations.len()
    }

    fn validate(&self) -> Result<()> {
        if self.scales.is_empty() {
            return Err(ConfigError::EmptyGrid("scale").into());
        }
        if self.displacements.is_empty() {
            return Err(ConfigError::EmptyGrid("displacement").into());
        }
        if self.rotations.is_empty() {
            return Err(ConfigError::EmptyGrid("rotation").into());
        }
        if let Some(&scale) = self.scales.iter().find(|s| **s <= 0.0) {
            return Err(ConfigError::OutOfRange {
                name: "scales",
                value: scale,
            }
            .into());
        }
        Ok(())
    }
}
