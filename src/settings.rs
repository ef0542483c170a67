//! Grid settings for snap behaviour
//!
//! Settings are created with defaults when a dashboard session starts and may
//! be overridden from a TOML file. Keys missing from the file keep their
//! default value:
//!
//! ```toml
//! [grid]
//! size = 25
//! snap_threshold = 8
//! snap_to_widgets = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest grid spacing accepted, in pixels
pub const MIN_GRID_SIZE: f64 = 1.0;

/// Errors that can occur when loading grid settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid grid setting '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Parameters controlling snap-to-grid behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GridSettings {
    /// Master switch: when off, snapping leaves bounds untouched
    pub enabled: bool,
    /// Grid spacing in pixels
    pub size: f64,
    /// Maximum distance (inclusive) at which a snap point attracts an edge
    pub snap_threshold: f64,
    /// Whether the grid is drawn
    pub show_grid: bool,
    pub snap_to_widgets: bool,
    pub snap_to_grid: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 20.0,
            snap_threshold: 10.0,
            show_grid: true,
            snap_to_widgets: true,
            snap_to_grid: true,
        }
    }
}

/// TOML file layout
#[derive(Deserialize)]
struct TomlSettings {
    #[serde(default)]
    grid: GridSettings,
}

impl GridSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load settings from a TOML string and validate them
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, SettingsError> {
        let parsed: TomlSettings = toml::from_str(content)?;
        parsed.grid.validate()?;
        Ok(parsed.grid)
    }

    /// Reject values the snap resolver cannot work with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.size >= MIN_GRID_SIZE) {
            return Err(SettingsError::Invalid {
                key: "size",
                reason: format!("must be at least {}px, got {}", MIN_GRID_SIZE, self.size),
            });
        }
        if !(self.snap_threshold >= 0.0) {
            return Err(SettingsError::Invalid {
                key: "snap_threshold",
                reason: format!("must not be negative, got {}", self.snap_threshold),
            });
        }
        Ok(())
    }

    /// Grid line positions from 0 up to and including `extent`.
    ///
    /// Each line is an exact multiple of the spacing. Spacings below
    /// [`MIN_GRID_SIZE`] are treated as the minimum.
    pub fn grid_lines(&self, extent: f64) -> Vec<f64> {
        if !(self.size > 0.0) || !(extent >= 0.0) {
            return vec![];
        }
        let size = self.size.max(MIN_GRID_SIZE);
        let count = (extent / size + 1e-9).floor() as usize;
        (0..=count).map(|i| i as f64 * size).collect()
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_snap_threshold(mut self, threshold: f64) -> Self {
        self.snap_threshold = threshold;
        self
    }

    pub fn with_show_grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }

    pub fn with_snap_to_widgets(mut self, snap: bool) -> Self {
        self.snap_to_widgets = snap;
        self
    }

    pub fn with_snap_to_grid(mut self, snap: bool) -> Self {
        self.snap_to_grid = snap;
        self
    }
}
