//! Dashboard editing session
//!
//! A session owns the layout being edited together with its grid settings
//! and canvas size. Gestures produce a [`GesturePreview`] (snap first, then
//! collision check on the snapped box) which is only applied on
//! [`DashboardSession::commit`]. Dropping a preview cancels the gesture.
//!
//! Widget positions are stored in cells. Unless a grid is set explicitly,
//! one cell is one grid square, so snapped bounds are stored as they are.
//! Previews are aligned to cells before the collision check, which makes
//! the previewed bounds exactly what a commit stores.

use serde::Serialize;
use thiserror::Error;

use crate::engine::{
    apply_resize_snap, apply_snap_to_grid, detect_collision_with, find_free_position, Bounds,
    BoundsMapper, CellGrid, CollisionResult, Container, ResizeDirection, SearchConfig, SnapResult,
};
use crate::model::{DashboardLayout, GridPosition, LayoutError, Widget};
use crate::settings::GridSettings;

/// Errors from session operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// The placement overlaps other visible widgets
    #[error("widget '{id}' would overlap {}", conflicts.join(", "))]
    Collision { id: String, conflicts: Vec<String> },

    /// The collision check found no free slot within the search radius
    #[error("no free slot found near the requested position for widget '{id}'")]
    NoFreeSlot { id: String },
}

/// Outcome of a drag or resize, not yet applied to the layout
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GesturePreview {
    pub widget_id: String,
    pub snap: SnapResult,
    pub collision: CollisionResult,
}

impl GesturePreview {
    /// Bounds the widget would take if committed
    pub fn bounds(&self) -> Bounds {
        self.snap.adjusted_bounds
    }

    pub fn is_valid(&self) -> bool {
        !self.collision.has_collision
    }
}

/// Editing state for one dashboard view
#[derive(Debug, Clone)]
pub struct DashboardSession {
    layout: DashboardLayout,
    settings: GridSettings,
    container: Container,
    grid: CellGrid,
    /// Cells follow `settings.size` until a grid is set with `with_grid`
    grid_from_settings: bool,
}

impl DashboardSession {
    /// Start a session with default grid settings on the default canvas
    pub fn new(layout: DashboardLayout) -> Self {
        let settings = GridSettings::default();
        Self {
            layout,
            grid: CellGrid::square(settings.size),
            settings,
            container: Container::default(),
            grid_from_settings: true,
        }
    }

    pub fn with_settings(mut self, settings: GridSettings) -> Self {
        self.settings = settings;
        self.sync_grid();
        self
    }

    pub fn with_container(mut self, container: Container) -> Self {
        self.container = container;
        self
    }

    /// Use fixed cells instead of one cell per grid square
    pub fn with_grid(mut self, grid: CellGrid) -> Self {
        self.grid = grid;
        self.grid_from_settings = false;
        self
    }

    pub fn layout(&self) -> &DashboardLayout {
        &self.layout
    }

    /// End the session, handing back the edited layout
    pub fn into_layout(self) -> DashboardLayout {
        self.layout
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    /// Change settings mid-session; cells follow a new grid size
    pub fn update_settings(&mut self, update: impl FnOnce(&mut GridSettings)) {
        update(&mut self.settings);
        self.sync_grid();
    }

    pub fn container(&self) -> Container {
        self.container
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// Current pixel bounds of a widget
    pub fn widget_bounds(&self, id: &str) -> Result<Bounds, SessionError> {
        Ok(self.grid.widget_bounds(self.require(id)?))
    }

    /// Preview moving a widget to `bounds`
    pub fn drag(&self, id: &str, bounds: Bounds) -> Result<GesturePreview, SessionError> {
        let widget = self.require(id)?;
        let mut snap = apply_snap_to_grid(
            bounds,
            &self.layout.widgets,
            id,
            &self.settings,
            self.container,
            &self.grid,
        );
        snap.settle(self.align(widget, snap.adjusted_bounds));
        Ok(self.validate(widget, snap))
    }

    /// Preview resizing a widget to `bounds` with the given edges moving.
    ///
    /// After snapping, the size is clamped to the widget's min/max limits,
    /// keeping the edge opposite each moving edge in place. Snap points the
    /// clamped edges no longer sit on are dropped from the preview.
    pub fn resize(
        &self,
        id: &str,
        bounds: Bounds,
        direction: ResizeDirection,
    ) -> Result<GesturePreview, SessionError> {
        let widget = self.require(id)?;
        let mut snap = apply_resize_snap(
            bounds,
            &self.layout.widgets,
            id,
            &self.settings,
            self.container,
            direction,
            &self.grid,
        );

        if let Some(dims) = &widget.dimensions {
            let b = snap.adjusted_bounds;
            let (width, height) = dims.clamp(b.width, b.height);
            let x = if direction.west { b.right() - width } else { b.x };
            let y = if direction.north { b.bottom() - height } else { b.y };
            snap.settle(Bounds::new(x, y, width, height));
        }

        snap.settle(self.align(widget, snap.adjusted_bounds));
        Ok(self.validate(widget, snap))
    }

    /// Apply a previewed gesture and return the stored bounds, which equal
    /// the preview's. The placement is checked again in case the layout
    /// changed since the preview was made.
    pub fn commit(&mut self, preview: &GesturePreview) -> Result<Bounds, SessionError> {
        if !preview.is_valid() {
            return Err(SessionError::Collision {
                id: preview.widget_id.clone(),
                conflicts: preview.collision.conflicting_widgets.clone(),
            });
        }
        self.place(&preview.widget_id, preview.bounds())
    }

    /// Apply a colliding preview at the detector's suggested position instead
    pub fn commit_suggested(&mut self, preview: &GesturePreview) -> Result<Bounds, SessionError> {
        if preview.is_valid() {
            return self.place(&preview.widget_id, preview.bounds());
        }
        match preview.collision.suggested_position {
            Some(bounds) => self.place(&preview.widget_id, bounds),
            None => Err(SessionError::NoFreeSlot {
                id: preview.widget_id.clone(),
            }),
        }
    }

    /// Add a widget, moving it to the first free slot if its own placement is taken
    pub fn add_widget(&mut self, mut widget: Widget) -> Result<Bounds, SessionError> {
        if self.layout.widget(&widget.id).is_some() {
            return Err(LayoutError::duplicate(widget.id).into());
        }

        let mut bounds = self.grid.widget_bounds(&widget);
        if widget.visible {
            if self.check(&widget.id, bounds).has_collision {
                let slot = find_free_position(
                    (bounds.width, bounds.height),
                    &self.layout.widgets,
                    &widget.id,
                    &self.grid,
                    self.container,
                    self.search().step,
                );
                let cell = self.grid.position_for(&slot);
                widget.position.row = cell.row;
                widget.position.col = cell.col;
                bounds = self.grid.widget_bounds(&widget);
                tracing::debug!(widget = %widget.id, x = bounds.x, y = bounds.y, "moved new widget to free slot");
            }
        }

        self.layout.add_widget(widget)?;
        Ok(bounds)
    }

    pub fn remove_widget(&mut self, id: &str) -> Result<Widget, SessionError> {
        Ok(self.layout.remove_widget(id)?)
    }

    /// Toggle visibility. A widget shown again returns to its old position,
    /// even if that spot has since been taken.
    pub fn toggle_visibility(&mut self, id: &str) -> Result<bool, SessionError> {
        let visible = self.layout.toggle_visibility(id)?;
        if visible {
            let collision = self.check(id, self.widget_bounds(id)?);
            if collision.has_collision {
                tracing::warn!(
                    widget = id,
                    conflicts = ?collision.conflicting_widgets,
                    "re-shown widget overlaps other widgets"
                );
            }
        }
        Ok(visible)
    }

    fn require(&self, id: &str) -> Result<&Widget, SessionError> {
        self.layout
            .widget(id)
            .ok_or_else(|| LayoutError::not_found(id, &self.layout.name).into())
    }

    fn sync_grid(&mut self) {
        if self.grid_from_settings {
            self.grid = CellGrid::square(self.settings.size);
        }
    }

    /// Suggestions step one cell at a time so they stay on cell boundaries
    fn search(&self) -> SearchConfig {
        SearchConfig::new().with_step(self.grid.cell_width.min(self.grid.cell_height))
    }

    /// Collision check without the suggestion search
    fn check(&self, id: &str, bounds: Bounds) -> CollisionResult {
        let no_search = SearchConfig::new().with_step(0.0);
        detect_collision_with(bounds, &self.layout.widgets, id, &self.grid, &no_search)
    }

    /// Store `bounds` on a copy of `widget`: cells for the origin, and pixel
    /// dimensions too when the widget has them
    fn apply(&self, widget: &mut Widget, bounds: Bounds) -> GridPosition {
        let position = self.grid.position_for(&bounds);
        widget.position = position;
        if let Some(dims) = widget.dimensions.as_mut() {
            dims.width = bounds.width;
            dims.height = bounds.height;
        }
        position
    }

    /// Bounds the widget would occupy once `bounds` is stored in cells
    fn align(&self, widget: &Widget, bounds: Bounds) -> Bounds {
        let mut candidate = widget.clone();
        self.apply(&mut candidate, bounds);
        self.grid.widget_bounds(&candidate)
    }

    fn validate(&self, widget: &Widget, snap: SnapResult) -> GesturePreview {
        let mut collision = detect_collision_with(
            snap.adjusted_bounds,
            &self.layout.widgets,
            &widget.id,
            &self.grid,
            &self.search(),
        );
        // Only suggest what a commit would store as-is
        collision.suggested_position = collision
            .suggested_position
            .map(|s| self.align(widget, s))
            .filter(|s| !self.check(&widget.id, *s).has_collision);

        GesturePreview {
            widget_id: widget.id.clone(),
            snap,
            collision,
        }
    }

    fn place(&mut self, id: &str, bounds: Bounds) -> Result<Bounds, SessionError> {
        let mut candidate = self.require(id)?.clone();
        let position = self.apply(&mut candidate, bounds);
        let placed = self.grid.widget_bounds(&candidate);

        if candidate.visible {
            let collision = self.check(id, placed);
            if collision.has_collision {
                return Err(SessionError::Collision {
                    id: id.to_string(),
                    conflicts: collision.conflicting_widgets,
                });
            }
        }

        self.layout.update_widget_position(id, position, bounds)?;
        tracing::debug!(widget = id, x = placed.x, y = placed.y, "committed placement");
        Ok(placed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SnapDirection;
    use crate::model::{Dimensions, WidgetSize, WidgetType};

    /// Positions are in the session's 20px cells
    fn widget(id: &str, row: u32, col: u32, width: u32, height: u32) -> Widget {
        Widget::new(id, id, WidgetType::Chart, WidgetSize::Medium)
            .with_position(GridPosition::new(row, col, width, height))
    }

    fn session(widgets: Vec<Widget>) -> DashboardSession {
        let mut layout = DashboardLayout::create("test");
        for w in widgets {
            layout.add_widget(w).unwrap();
        }
        DashboardSession::new(layout)
    }

    #[test]
    fn test_cells_follow_grid_size() {
        let mut s = session(vec![]);
        assert_eq!(s.grid(), &CellGrid::square(20.0));

        s.update_settings(|settings| settings.size = 50.0);
        assert_eq!(s.grid(), &CellGrid::square(50.0));

        let s = s
            .with_grid(CellGrid::default())
            .with_settings(GridSettings::default().with_size(25.0));
        assert_eq!(s.grid(), &CellGrid::default());
    }

    #[test]
    fn test_drag_snaps_then_checks() {
        let s = session(vec![widget("a", 0, 0, 10, 5), widget("b", 15, 0, 5, 5)]);
        // Dropped 4px into a's right edge; snap pulls it flush, no collision
        let preview = s.drag("b", Bounds::new(196.0, 0.0, 100.0, 100.0)).unwrap();
        assert!(preview.snap.snapped);
        assert_eq!(preview.bounds().x, 200.0);
        assert!(preview.is_valid());
    }

    #[test]
    fn test_drag_unknown_widget() {
        let s = session(vec![]);
        let err = s.drag("ghost", Bounds::zero()).unwrap_err();
        assert!(matches!(err, SessionError::Layout(LayoutError::WidgetNotFound { .. })));
    }

    #[test]
    fn test_commit_stores_previewed_bounds() {
        let a = widget("a", 0, 0, 1, 1).with_dimensions(Dimensions::new(240.0, 100.0));
        let mut s = session(vec![a, widget("b", 10, 0, 5, 5)]);

        // Flush against a's right edge at 240
        let preview = s.drag("b", Bounds::new(245.0, 0.0, 100.0, 100.0)).unwrap();
        assert!(preview.is_valid());
        assert_eq!(preview.bounds(), Bounds::new(240.0, 0.0, 100.0, 100.0));
        assert_eq!(s.commit(&preview), Ok(preview.bounds()));
        assert_eq!(s.layout().widget("b").unwrap().position, GridPosition::new(0, 12, 5, 5));

        // Snapped to 140, between two 100px multiples
        let preview = s.drag("b", Bounds::new(143.0, 300.0, 100.0, 100.0)).unwrap();
        assert_eq!(preview.bounds(), Bounds::new(140.0, 300.0, 100.0, 100.0));
        assert_eq!(s.commit(&preview), Ok(preview.bounds()));
        assert_eq!(s.widget_bounds("b"), Ok(preview.bounds()));
    }

    #[test]
    fn test_unsnapped_drop_previews_cell_placement() {
        let mut s = session(vec![widget("a", 0, 0, 5, 5)]);
        s.update_settings(|settings| settings.enabled = false);
        let preview = s.drag("a", Bounds::new(503.0, 7.0, 100.0, 100.0)).unwrap();
        assert!(!preview.snap.snapped);
        assert_eq!(preview.bounds(), Bounds::new(500.0, 0.0, 100.0, 100.0));
        assert_eq!(s.commit(&preview), Ok(preview.bounds()));
    }

    #[test]
    fn test_coarse_cells_preview_what_commit_stores() {
        let a = widget("a", 0, 0, 1, 1).with_dimensions(Dimensions::new(240.0, 100.0));
        let layout = session(vec![a, widget("b", 2, 0, 1, 1)]).into_layout();
        let mut s = DashboardSession::new(layout).with_grid(CellGrid::default());

        // Snaps to 240, but 100px cells can only hold 200
        let preview = s.drag("b", Bounds::new(245.0, 0.0, 100.0, 100.0)).unwrap();
        assert_eq!(preview.bounds(), Bounds::new(200.0, 0.0, 100.0, 100.0));
        // Only the y-axis alignment with a survives
        assert_eq!(preview.snap.snap_points.len(), 1);
        assert_eq!(preview.snap.snap_points[0].direction, SnapDirection::Horizontal);
        assert!(!preview.is_valid());
        assert_eq!(preview.collision.conflicting_widgets, vec!["a".to_string()]);

        let suggested = preview.collision.suggested_position.unwrap();
        assert_eq!(s.commit_suggested(&preview), Ok(suggested));
    }

    #[test]
    fn test_commit_rejects_collision() {
        let mut s = session(vec![widget("a", 0, 0, 10, 10), widget("b", 15, 0, 5, 5)]);
        let preview = s.drag("b", Bounds::new(100.0, 100.0, 100.0, 100.0)).unwrap();
        assert!(!preview.is_valid());
        let err = s.commit(&preview).unwrap_err();
        assert_eq!(
            err,
            SessionError::Collision {
                id: "b".to_string(),
                conflicts: vec!["a".to_string()],
            }
        );
        // Layout untouched
        assert_eq!(s.layout().widget("b").unwrap().position, GridPosition::new(15, 0, 5, 5));
    }

    #[test]
    fn test_commit_suggested() {
        let mut s = session(vec![widget("a", 0, 0, 10, 10), widget("b", 15, 0, 5, 5)]);
        let preview = s.drag("b", Bounds::new(100.0, 100.0, 100.0, 100.0)).unwrap();
        let suggested = preview.collision.suggested_position.unwrap();
        assert_eq!(suggested, Bounds::new(200.0, 0.0, 100.0, 100.0));
        let placed = s.commit_suggested(&preview).unwrap();
        assert_eq!(placed, suggested);
        assert!(!placed.intersects(&Bounds::new(0.0, 0.0, 200.0, 200.0)));
    }

    #[test]
    fn test_resize_clamp_drops_stale_snap() {
        let w = widget("a", 0, 0, 5, 5)
            .with_dimensions(Dimensions::new(100.0, 100.0).with_max(250.0, 250.0));
        let s = session(vec![w]);
        // The east edge snaps to the grid line at 400, then the clamp pulls it back
        let preview = s
            .resize("a", Bounds::new(0.0, 0.0, 395.0, 100.0), ResizeDirection::EAST)
            .unwrap();
        assert_eq!(preview.bounds(), Bounds::new(0.0, 0.0, 250.0, 100.0));
        assert!(!preview.snap.snapped);
        assert!(preview.snap.snap_points.is_empty());
    }

    #[test]
    fn test_resize_west_clamp_keeps_right_edge() {
        let w = widget("a", 0, 25, 5, 5)
            .with_dimensions(Dimensions::new(100.0, 100.0).with_min(80.0, 80.0));
        let s = session(vec![w]);
        let dir = "w".parse().unwrap();
        let preview = s.resize("a", Bounds::new(553.0, 0.0, 47.0, 100.0), dir).unwrap();
        assert_eq!(preview.bounds(), Bounds::new(520.0, 0.0, 80.0, 100.0));
        assert!(!preview.snap.snapped);
    }

    #[test]
    fn test_add_widget_moves_to_free_slot() {
        let mut s = session(vec![widget("a", 0, 0, 20, 15)]);
        let placed = s.add_widget(widget("b", 0, 0, 20, 15)).unwrap();
        assert_eq!(placed, Bounds::new(400.0, 0.0, 400.0, 300.0));
        assert_eq!(s.layout().widgets.len(), 2);
    }

    #[test]
    fn test_add_duplicate_widget() {
        let mut s = session(vec![widget("a", 0, 0, 1, 1)]);
        let err = s.add_widget(widget("a", 5, 5, 1, 1)).unwrap_err();
        assert_eq!(err, SessionError::Layout(LayoutError::duplicate("a")));
        assert_eq!(s.layout().widgets.len(), 1);
    }
}
