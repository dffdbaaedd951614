//! Configuration types for avow diagram extraction.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from an
//! external configuration file. Missing fields fall back to their defaults.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining extraction settings and the editor mode.
//! - [`ExtractionConfig`] - Unit scale and the thresholds used by resolution and validation.
//! - [`EditorMode`] - Whether diagrams are being built or compared against a solution.
//! - [`Scale`] - The unit presets offered by the editor.
//!
//! # Example
//!
//! ```
//! # use avow::config::{AppConfig, EditorMode};
//! let config = AppConfig::default();
//! assert_eq!(config.mode(), EditorMode::Builder);
//! assert_eq!(config.extraction().scale(), 1.0);
//! ```

use std::fmt;

use serde::Deserialize;

/// Top-level configuration combining extraction settings and the editor mode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Extraction configuration section.
    #[serde(default)]
    extraction: ExtractionConfig,

    /// Which editor the diagrams come from.
    #[serde(default)]
    mode: EditorMode,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the given extraction settings and mode.
    pub fn new(extraction: ExtractionConfig, mode: EditorMode) -> Self {
        Self { extraction, mode }
    }

    /// Returns the extraction configuration.
    pub fn extraction(&self) -> &ExtractionConfig {
        &self.extraction
    }

    pub fn extraction_mut(&mut self) -> &mut ExtractionConfig {
        &mut self.extraction
    }

    /// Returns the editor mode.
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
    }
}

/// Unit scale and thresholds used while extracting a diagram.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Multiplier applied to raw avow height and width.
    scale: f64,

    /// Largest gap or overlap still treated as two avows touching.
    snap_distance: f32,

    /// Number of layering rounds after which extraction gives up.
    max_layer_rounds: usize,

    /// Largest difference still treated as equal by the rectangle check.
    tolerance: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            snap_distance: 0.05,
            max_layer_rounds: 1000,
            tolerance: 0.005,
        }
    }
}

impl ExtractionConfig {
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn snap_distance(&self) -> f32 {
        self.snap_distance
    }

    pub fn max_layer_rounds(&self) -> usize {
        self.max_layer_rounds
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_snap_distance(mut self, snap_distance: f32) -> Self {
        self.snap_distance = snap_distance;
        self
    }

    pub fn with_max_layer_rounds(mut self, max_layer_rounds: usize) -> Self {
        self.max_layer_rounds = max_layer_rounds;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }
}

/// Which editor a diagram is extracted for.
///
/// In [`EditorMode::Solver`] an unconnected avow is reported as a warning
/// only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    #[default]
    Builder,
    Solver,
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builder => write!(f, "builder"),
            Self::Solver => write!(f, "solver"),
        }
    }
}

/// Unit scale presets offered by the editor, from centi to kilo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Centi,
    Deci,
    Unit,
    Deca,
    Hecto,
    Kilo,
}

impl Scale {
    /// All presets in the order the editor lists them.
    pub const ALL: [Scale; 6] = [
        Self::Centi,
        Self::Deci,
        Self::Unit,
        Self::Deca,
        Self::Hecto,
        Self::Kilo,
    ];

    /// Looks up a preset by its position in [`Scale::ALL`].
    ///
    /// ```
    /// # use avow::config::Scale;
    /// assert_eq!(Scale::from_index(3), Some(Scale::Deca));
    /// assert_eq!(Scale::from_index(6), None);
    /// ```
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The multiplier this preset applies.
    pub fn factor(self) -> f64 {
        match self {
            Self::Centi => 0.01,
            Self::Deci => 0.1,
            Self::Unit => 1.0,
            Self::Deca => 10.0,
            Self::Hecto => 100.0,
            Self::Kilo => 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.scale(), 1.0);
        assert_eq!(config.snap_distance(), 0.05);
        assert_eq!(config.max_layer_rounds(), 1000);
        assert_eq!(config.tolerance(), 0.005);
    }

    #[test]
    fn test_scale_presets() {
        let factors: Vec<f64> = Scale::ALL.iter().map(|s| s.factor()).collect();
        assert_eq!(factors, [0.01, 0.1, 1.0, 10.0, 100.0, 1000.0]);
        assert_eq!(Scale::from_index(0), Some(Scale::Centi));
        assert_eq!(Scale::from_index(5), Some(Scale::Kilo));
        assert!(Scale::from_index(42).is_none());
    }

    #[test]
    fn test_builders() {
        let config = ExtractionConfig::default()
            .with_scale(10.0)
            .with_snap_distance(0.1)
            .with_max_layer_rounds(5)
            .with_tolerance(0.01);

        assert_eq!(config.scale(), 10.0);
        assert_eq!(config.snap_distance(), 0.1);
        assert_eq!(config.max_layer_rounds(), 5);
        assert_eq!(config.tolerance(), 0.01);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(EditorMode::Builder.to_string(), "builder");
        assert_eq!(EditorMode::Solver.to_string(), "solver");
    }
}
