//! Dashboard data model: widgets, layouts and layout storage

pub mod error;
pub mod layout;
pub mod store;
pub mod widget;

pub use error::{LayoutError, StoreError};
pub use layout::DashboardLayout;
pub use store::{FileStore, LayoutStore, MemoryStore};
pub use widget::{Dimensions, GridPosition, Widget, WidgetConfig, WidgetSize, WidgetType};
