//! Widget definitions as stored in a dashboard layout

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The data panel a widget shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetType {
    ObjectsOverview,
    UsersOverview,
    BillingOverview,
    InstallationsOverview,
    WarehouseOverview,
    RecentActivity,
    Notifications,
    QuickStats,
    Chart,
    Tasks,
}

impl WidgetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetType::ObjectsOverview => "objects-overview",
            WidgetType::UsersOverview => "users-overview",
            WidgetType::BillingOverview => "billing-overview",
            WidgetType::InstallationsOverview => "installations-overview",
            WidgetType::WarehouseOverview => "warehouse-overview",
            WidgetType::RecentActivity => "recent-activity",
            WidgetType::Notifications => "notifications",
            WidgetType::QuickStats => "quick-stats",
            WidgetType::Chart => "chart",
            WidgetType::Tasks => "tasks",
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse size category. Advisory only: geometry comes from
/// [`GridPosition`] and [`Dimensions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetSize {
    Small,
    #[default]
    Medium,
    Large,
    ExtraLarge,
}

impl WidgetSize {
    /// Default span in grid cells as (width, height)
    pub fn cell_span(&self) -> (u32, u32) {
        match self {
            WidgetSize::Small => (3, 2),
            WidgetSize::Medium => (4, 3),
            WidgetSize::Large => (6, 4),
            WidgetSize::ExtraLarge => (12, 4),
        }
    }
}

/// Placement in grid-cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: u32,
    pub col: u32,
    pub width: u32,
    pub height: u32,
}

impl GridPosition {
    pub fn new(row: u32, col: u32, width: u32, height: u32) -> Self {
        Self {
            row,
            col,
            width,
            height,
        }
    }
}

/// Pixel-space size, authoritative over the cell span when present
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_min(mut self, width: f64, height: f64) -> Self {
        self.min_width = Some(width);
        self.min_height = Some(height);
        self
    }

    pub fn with_max(mut self, width: f64, height: f64) -> Self {
        self.max_width = Some(width);
        self.max_height = Some(height);
        self
    }

    /// Clamp a size into this widget's min/max limits
    pub fn clamp(&self, width: f64, height: f64) -> (f64, f64) {
        (
            clamp_axis(width, self.min_width, self.max_width),
            clamp_axis(height, self.min_height, self.max_height),
        )
    }

    /// Whether the current size respects the min/max limits
    pub fn within_limits(&self) -> bool {
        self.clamp(self.width, self.height) == (self.width, self.height)
    }
}

fn clamp_axis(value: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let value = match max {
        Some(max) => value.min(max),
        None => value,
    };
    match min {
        Some(min) => value.max(min),
        None => value,
    }
}

/// Widget-specific settings. Opaque to the layout engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Refresh interval in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Any other keys, kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A placed dashboard tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    #[serde(default)]
    pub size: WidgetSize,
    pub position: GridPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default)]
    pub config: WidgetConfig,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Widget {
    /// Create a visible widget at the origin, spanning the cells implied by `size`
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        widget_type: WidgetType,
        size: WidgetSize,
    ) -> Self {
        let (width, height) = size.cell_span();
        Self {
            id: id.into(),
            title: title.into(),
            widget_type,
            size,
            position: GridPosition::new(0, 0, width, height),
            dimensions: None,
            config: WidgetConfig::default(),
            visible: true,
        }
    }

    pub fn with_position(mut self, position: GridPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn with_config(mut self, config: WidgetConfig) -> Self {
        self.config = config;
        self
    }

    /// Mark the widget as hidden
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Title shown on the tile: the custom title if one is configured
    pub fn display_title(&self) -> &str {
        self.config
            .custom_title
            .as_deref()
            .unwrap_or(self.title.as_str())
    }
}
