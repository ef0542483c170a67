//! Named, ordered collections of widget placements
//!
//! The model only guards id uniqueness. Geometry is validated by the caller
//! with the collision detector before a placement is committed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::Bounds;

use super::error::LayoutError;
use super::widget::{GridPosition, Widget};

/// A user's arrangement of dashboard widgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardLayout {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub widgets: Vec<Widget>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl DashboardLayout {
    /// New empty layout with a fresh id
    pub fn create(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            widgets: vec![],
            is_default: false,
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Append a widget. Fails without touching the list if the id is taken.
    pub fn add_widget(&mut self, widget: Widget) -> Result<(), LayoutError> {
        if self.widget(&widget.id).is_some() {
            return Err(LayoutError::duplicate(widget.id));
        }
        self.widgets.push(widget);
        Ok(())
    }

    /// Replace a widget's placement.
    ///
    /// Pixel dimensions, when the widget carries them, take the size of
    /// `new_bounds`; min/max limits are left as they are.
    pub fn update_widget_position(
        &mut self,
        id: &str,
        position: GridPosition,
        new_bounds: Bounds,
    ) -> Result<&Widget, LayoutError> {
        let widget = self.widget_mut(id)?;
        widget.position = position;
        if let Some(dims) = widget.dimensions.as_mut() {
            dims.width = new_bounds.width;
            dims.height = new_bounds.height;
        }
        Ok(&*widget)
    }

    pub fn remove_widget(&mut self, id: &str) -> Result<Widget, LayoutError> {
        let index = self
            .widgets
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| LayoutError::not_found(id, &self.name))?;
        Ok(self.widgets.remove(index))
    }

    /// Mark this layout as the default one.
    ///
    /// Clearing the flag on the user's other layouts is up to the store
    /// (see [`LayoutStore::set_default`](super::store::LayoutStore::set_default)).
    pub fn set_default(&mut self) {
        self.is_default = true;
    }

    pub fn clear_default(&mut self) {
        self.is_default = false;
    }

    /// Flip a widget's visibility and return the new state.
    /// Hidden widgets keep their position and config.
    pub fn toggle_visibility(&mut self, id: &str) -> Result<bool, LayoutError> {
        let widget = self.widget_mut(id)?;
        widget.visible = !widget.visible;
        Ok(widget.visible)
    }

    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    fn widget_mut(&mut self, id: &str) -> Result<&mut Widget, LayoutError> {
        let name = &self.name;
        self.widgets
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| LayoutError::not_found(id, name))
    }

    pub fn visible_widgets(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.iter().filter(|w| w.visible)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
