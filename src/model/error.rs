//! Error types for the layout model and layout storage

use thiserror::Error;

/// Errors raised when mutating a dashboard layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A widget with this id is already part of the layout
    #[error("duplicate widget id '{id}'")]
    DuplicateWidgetId { id: String },

    /// No widget with this id in the layout
    #[error("widget '{id}' not found in layout '{layout}'")]
    WidgetNotFound { id: String, layout: String },
}

impl LayoutError {
    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateWidgetId { id: id.into() }
    }

    pub fn not_found(id: impl Into<String>, layout: impl Into<String>) -> Self {
        Self::WidgetNotFound {
            id: id.into(),
            layout: layout.into(),
        }
    }
}

/// Errors raised by a layout store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("layout '{0}' not found")]
    LayoutNotFound(String),

    #[error("failed to access layout file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode or decode layouts: {0}")]
    Json(#[from] serde_json::Error),
}
