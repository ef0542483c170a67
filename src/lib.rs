//! dashgrid - layout engine for dashboard widget grids
//!
//! This library decides where dashboard widgets may go: it snaps dragged and
//! resized widgets to grid lines and neighbouring widgets, detects overlaps
//! and suggests free slots, and keeps the named layouts users save.
//!
//! # Example
//!
//! ```rust
//! use dashgrid::{DashboardLayout, DashboardSession, Widget, WidgetSize, WidgetType};
//! use dashgrid::engine::Bounds;
//!
//! let mut layout = DashboardLayout::create("Overview");
//! layout
//!     .add_widget(Widget::new("stats", "Stats", WidgetType::QuickStats, WidgetSize::Small))
//!     .unwrap();
//! layout
//!     .add_widget(
//!         Widget::new("tasks", "Tasks", WidgetType::Tasks, WidgetSize::Small)
//!             .with_position(dashgrid::GridPosition::new(4, 0, 3, 2)),
//!     )
//!     .unwrap();
//!
//! // One cell per 20px grid square: "stats" covers 60x40px at the origin
//! let mut session = DashboardSession::new(layout);
//!
//! // Drop "tasks" a few pixels right of "stats"; it snaps flush against it
//! let dropped = session.widget_bounds("tasks").unwrap().moved_to(64.0, 2.0);
//! let preview = session.drag("tasks", dropped).unwrap();
//! assert_eq!(preview.bounds(), Bounds::new(60.0, 0.0, 60.0, 40.0));
//! assert!(preview.is_valid());
//! assert_eq!(session.commit(&preview), Ok(preview.bounds()));
//! ```

pub mod engine;
pub mod model;
pub mod renderer;
pub mod session;
pub mod settings;

pub use engine::{
    apply_resize_snap, apply_snap_to_grid, detect_collision, Bounds, BoundsMapper, CellGrid,
    CollisionResult, Container, ResizeDirection, SnapResult,
};
pub use model::{
    DashboardLayout, Dimensions, GridPosition, LayoutError, LayoutStore, StoreError, Widget,
    WidgetConfig, WidgetSize, WidgetType,
};
pub use renderer::SvgConfig;
pub use session::{DashboardSession, GesturePreview, SessionError};
pub use settings::{GridSettings, SettingsError};

use thiserror::Error;

/// Any error the crate can report
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("invalid resize direction: {0}")]
    ResizeDirection(#[from] engine::ParseResizeDirectionError),
}
