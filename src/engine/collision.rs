//! Widget collision detection and free-slot search
//!
//! A candidate box collides with a widget when the two strictly overlap.
//! Only visible widgets take part, and the widget being moved is excluded
//! from the comparison against itself.

use serde::Serialize;

use crate::model::Widget;

use super::bounds::BoundsMapper;
use super::types::{Bounds, Container};

/// Furthest distance (in pixels) the suggestion search moves away from the
/// original target. Three default container heights.
pub const MAX_SEARCH_RADIUS: f64 = 2400.0;

/// Default step between suggestion candidates, matching the default grid size
pub const DEFAULT_SEARCH_STEP: f64 = 20.0;

/// Smallest distance between search candidates; finer steps are raised to it
pub const MIN_SEARCH_STEP: f64 = 1.0;

/// Outcome of checking one candidate placement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionResult {
    pub has_collision: bool,
    /// Ids of the overlapped widgets, in layout order
    pub conflicting_widgets: Vec<String>,
    /// Nearest collision-free placement, when one exists within the search radius
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_position: Option<Bounds>,
}

impl CollisionResult {
    fn clear() -> Self {
        Self {
            has_collision: false,
            conflicting_widgets: vec![],
            suggested_position: None,
        }
    }
}

/// Parameters of the suggestion search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Distance between candidate positions
    pub step: f64,
    /// Candidates further than this from the target are not considered
    pub max_radius: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_SEARCH_STEP,
            max_radius: MAX_SEARCH_RADIUS,
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn with_max_radius(mut self, radius: f64) -> Self {
        self.max_radius = radius;
        self
    }
}

/// Check a candidate placement against every other visible widget.
pub fn detect_collision<M: BoundsMapper + ?Sized>(
    target: Bounds,
    widgets: &[Widget],
    exclude_id: &str,
    mapper: &M,
) -> CollisionResult {
    detect_collision_with(target, widgets, exclude_id, mapper, &SearchConfig::default())
}

/// [`detect_collision`] with an explicit suggestion search configuration.
pub fn detect_collision_with<M: BoundsMapper + ?Sized>(
    target: Bounds,
    widgets: &[Widget],
    exclude_id: &str,
    mapper: &M,
    search: &SearchConfig,
) -> CollisionResult {
    let obstacles = obstacles(widgets, exclude_id, mapper);
    let conflicting_widgets = conflicts(&target, &obstacles);

    if conflicting_widgets.is_empty() {
        return CollisionResult::clear();
    }

    let suggested_position = search_free_position(&target, &obstacles, search);
    tracing::debug!(
        conflicts = conflicting_widgets.len(),
        suggested = suggested_position.is_some(),
        "collision detected"
    );

    CollisionResult {
        has_collision: true,
        conflicting_widgets,
        suggested_position,
    }
}

/// First free slot for a box of `size`, scanning the container row-major
/// from the origin at `step` increments.
///
/// Falls back to the left edge just below the lowest visible widget when the
/// container has no room left.
pub fn find_free_position<M: BoundsMapper + ?Sized>(
    size: (f64, f64),
    widgets: &[Widget],
    exclude_id: &str,
    mapper: &M,
    container: Container,
    step: f64,
) -> Bounds {
    let (width, height) = size;
    let obstacles = obstacles(widgets, exclude_id, mapper);

    if step > 0.0 {
        let step = step.max(MIN_SEARCH_STEP);
        let mut y = 0.0;
        while y + height <= container.height {
            let mut x = 0.0;
            while x + width <= container.width {
                let candidate = Bounds::new(x, y, width, height);
                if is_free(&candidate, &obstacles) {
                    return candidate;
                }
                x += step;
            }
            y += step;
        }
    }

    let below = obstacles
        .iter()
        .map(|(_, b)| b.bottom())
        .fold(0.0_f64, f64::max);
    Bounds::new(0.0, below, width, height)
}

/// Visible widgets other than `exclude_id`, with their bounds
fn obstacles<'a, M: BoundsMapper + ?Sized>(
    widgets: &'a [Widget],
    exclude_id: &str,
    mapper: &M,
) -> Vec<(&'a str, Bounds)> {
    widgets
        .iter()
        .filter(|w| w.visible && w.id != exclude_id)
        .map(|w| (w.id.as_str(), mapper.widget_bounds(w)))
        .collect()
}

fn conflicts(target: &Bounds, obstacles: &[(&str, Bounds)]) -> Vec<String> {
    obstacles
        .iter()
        .filter(|(_, b)| target.intersects(b))
        .map(|(id, _)| id.to_string())
        .collect()
}

fn is_free(target: &Bounds, obstacles: &[(&str, Bounds)]) -> bool {
    !obstacles.iter().any(|(_, b)| target.intersects(b))
}

/// Walk square rings of growing radius around the target. Within a ring,
/// candidates are visited row-major: top row left to right, then each
/// following row. Only the ring's own cells are visited. Candidates above or
/// left of the origin are skipped.
fn search_free_position(
    target: &Bounds,
    obstacles: &[(&str, Bounds)],
    search: &SearchConfig,
) -> Option<Bounds> {
    if search.step <= 0.0 {
        return None;
    }
    let step = search.step.max(MIN_SEARCH_STEP);

    let rings = (search.max_radius / step).floor() as i64;
    for r in 1..=rings {
        for dy in -r..=r {
            let y = target.y + dy as f64 * step;
            if y < 0.0 {
                continue;
            }
            // Top and bottom rows span the ring; rows between hold its two sides
            let stride = if dy.abs() == r { 1 } else { 2 * r };
            let mut dx = -r;
            while dx <= r {
                let candidate = target.moved_to(target.x + dx as f64 * step, y);
                dx += stride;
                if candidate.x < 0.0 {
                    continue;
                }
                if is_free(&candidate, obstacles) {
                    return Some(candidate);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::bounds::CellGrid;
    use crate::model::{Dimensions, GridPosition, WidgetSize, WidgetType};

    fn widget(id: &str, row: u32, col: u32, width: u32, height: u32) -> Widget {
        Widget::new(id, id, WidgetType::Chart, WidgetSize::Medium)
            .with_position(GridPosition::new(row, col, width, height))
    }

    #[test]
    fn test_no_collision_in_empty_space() {
        let widgets = vec![widget("a", 0, 0, 2, 2)];
        let result = detect_collision(
            Bounds::new(300.0, 0.0, 100.0, 100.0),
            &widgets,
            "",
            &CellGrid::default(),
        );
        assert!(!result.has_collision);
        assert!(result.conflicting_widgets.is_empty());
        assert!(result.suggested_position.is_none());
    }

    #[test]
    fn test_collision_lists_conflicts_in_order() {
        let widgets = vec![
            widget("a", 0, 0, 2, 2),
            widget("b", 0, 2, 2, 2),
            widget("c", 5, 5, 1, 1),
        ];
        let result = detect_collision(
            Bounds::new(150.0, 50.0, 100.0, 100.0),
            &widgets,
            "",
            &CellGrid::default(),
        );
        assert!(result.has_collision);
        assert_eq!(result.conflicting_widgets, vec!["a", "b"]);
    }

    #[test]
    fn test_excluded_widget_ignored() {
        let widgets = vec![widget("a", 0, 0, 2, 2)];
        let result = detect_collision(
            Bounds::new(10.0, 10.0, 100.0, 100.0),
            &widgets,
            "a",
            &CellGrid::default(),
        );
        assert!(!result.has_collision);
    }

    #[test]
    fn test_hidden_widget_ignored() {
        let widgets = vec![widget("a", 0, 0, 2, 2).hidden()];
        let result = detect_collision(
            Bounds::new(10.0, 10.0, 100.0, 100.0),
            &widgets,
            "",
            &CellGrid::default(),
        );
        assert!(!result.has_collision);
    }

    #[test]
    fn test_suggestion_prefers_nearest_ring() {
        // a occupies x 0..100; target overlaps it by 10px
        let widgets = vec![widget("a", 0, 0, 1, 1)];
        let target = Bounds::new(90.0, 0.0, 50.0, 50.0);
        let result = detect_collision(target, &widgets, "", &CellGrid::default());

        // Ring 1 row-major: (70,-20) skipped, (90,-20) skipped, (110,-20) skipped,
        // (70,0) collides, (110,0) is free
        assert_eq!(result.suggested_position, Some(Bounds::new(110.0, 0.0, 50.0, 50.0)));
    }

    #[test]
    fn test_no_suggestion_beyond_radius() {
        let widgets = vec![widget("a", 0, 0, 10, 10)];
        let search = SearchConfig::new().with_step(20.0).with_max_radius(100.0);
        let result = detect_collision_with(
            Bounds::new(400.0, 400.0, 100.0, 100.0),
            &widgets,
            "",
            &CellGrid::default(),
            &search,
        );
        assert!(result.has_collision);
        assert!(result.suggested_position.is_none());
    }

    #[test]
    fn test_sub_pixel_step_searches_whole_pixels() {
        let widgets = vec![widget("a", 0, 0, 1, 1)];
        let search = SearchConfig::new().with_step(0.25);
        let result = detect_collision_with(
            Bounds::new(90.0, 0.0, 50.0, 50.0),
            &widgets,
            "",
            &CellGrid::default(),
            &search,
        );
        assert_eq!(result.suggested_position, Some(Bounds::new(100.0, 0.0, 50.0, 50.0)));

        // A wall with no gap in reach; 0.01px steps would mean 20000 rings
        let wall = vec![widget("wall", 0, 0, 40, 40)];
        let search = SearchConfig::new().with_step(0.01).with_max_radius(200.0);
        let result = detect_collision_with(
            Bounds::new(1000.0, 1000.0, 100.0, 100.0),
            &wall,
            "",
            &CellGrid::default(),
            &search,
        );
        assert!(result.has_collision);
        assert!(result.suggested_position.is_none());
    }

    #[test]
    fn test_ring_sides_visited_before_bottom_row() {
        // The ring's top row is blocked; its left side and bottom row are
        // free, and the side comes first in row-major order
        let widgets = vec![widget("top", 0, 0, 3, 1), widget("mid", 1, 1, 1, 1)];
        let search = SearchConfig::new().with_step(100.0);
        let result = detect_collision_with(
            Bounds::new(100.0, 100.0, 100.0, 100.0),
            &widgets,
            "",
            &CellGrid::default(),
            &search,
        );
        assert_eq!(result.suggested_position, Some(Bounds::new(0.0, 100.0, 100.0, 100.0)));
    }

    #[test]
    fn test_zero_step_gives_no_suggestion() {
        let widgets = vec![widget("a", 0, 0, 1, 1)];
        let search = SearchConfig::new().with_step(0.0);
        let result = detect_collision_with(
            Bounds::new(0.0, 0.0, 50.0, 50.0),
            &widgets,
            "",
            &CellGrid::default(),
            &search,
        );
        assert!(result.has_collision);
        assert!(result.suggested_position.is_none());
    }

    #[test]
    fn test_find_free_position_fills_row_first() {
        let widgets = vec![widget("a", 0, 0, 4, 3)];
        let grid = CellGrid::default();
        let slot = find_free_position((300.0, 200.0), &widgets, "", &grid, Container::default(), 20.0);
        assert_eq!(slot, Bounds::new(400.0, 0.0, 300.0, 200.0));
    }

    #[test]
    fn test_find_free_position_falls_below_when_full() {
        let widgets = vec![widget("a", 0, 0, 12, 8)];
        let grid = CellGrid::default();
        let slot = find_free_position((300.0, 200.0), &widgets, "", &grid, Container::default(), 20.0);
        assert_eq!(slot, Bounds::new(0.0, 800.0, 300.0, 200.0));
    }

    #[test]
    fn test_dimensions_used_for_collision() {
        // Cell span says 4x3 cells, but the pixel size is only 50x50
        let widgets = vec![widget("a", 0, 0, 4, 3).with_dimensions(Dimensions::new(50.0, 50.0))];
        let result = detect_collision(
            Bounds::new(50.0, 0.0, 100.0, 100.0),
            &widgets,
            "",
            &CellGrid::default(),
        );
        assert!(!result.has_collision);
    }
}
