//! Snap-to-grid resolution for drag and resize gestures
//!
//! Snap points are alignment targets tagged with a direction. A `Vertical`
//! point is a vertical line and is matched on the x axis; a `Horizontal`
//! point is matched on the y axis; `Both` (widget centers) on either axis.
//!
//! The resolver never checks collisions. Snapping may leave a widget flush
//! against a neighbour, which is not a collision; callers that need strict
//! non-overlap run the collision detector on the adjusted bounds.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::model::Widget;
use crate::settings::GridSettings;

use super::bounds::BoundsMapper;
use super::types::{Bounds, Container};

/// What a snap point was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapKind {
    Edge,
    Center,
    Grid,
}

/// Which axis a snap point constrains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapDirection {
    /// Horizontal line, matched by y-distance
    Horizontal,
    /// Vertical line, matched by x-distance
    Vertical,
    Both,
}

/// A candidate alignment target
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapPoint {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type")]
    pub kind: SnapKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget_id: Option<String>,
    pub direction: SnapDirection,
}

impl SnapPoint {
    fn grid(x: f64, y: f64, direction: SnapDirection) -> Self {
        Self {
            x,
            y,
            kind: SnapKind::Grid,
            widget_id: None,
            direction,
        }
    }

    fn widget(x: f64, y: f64, kind: SnapKind, id: &str, direction: SnapDirection) -> Self {
        Self {
            x,
            y,
            kind,
            widget_id: Some(id.to_string()),
            direction,
        }
    }

    /// Coordinate this point constrains on `axis`, if it applies to that axis
    fn coordinate(&self, axis: Axis) -> Option<f64> {
        match (axis, self.direction) {
            (Axis::X, SnapDirection::Vertical | SnapDirection::Both) => Some(self.x),
            (Axis::Y, SnapDirection::Horizontal | SnapDirection::Both) => Some(self.y),
            _ => None,
        }
    }

    /// Whether `bounds` still sits on this point: edges on edge and grid
    /// points, the center on center points
    fn touches(&self, bounds: &Bounds) -> bool {
        let on = |v: f64, at: f64| (v - at).abs() < 1e-9;
        let c = bounds.center();
        match self.direction {
            SnapDirection::Vertical => on(self.x, bounds.x) || on(self.x, bounds.right()),
            SnapDirection::Horizontal => on(self.y, bounds.y) || on(self.y, bounds.bottom()),
            SnapDirection::Both => on(self.x, c.x) || on(self.y, c.y),
        }
    }
}

/// Result of one snap pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapResult {
    pub snapped: bool,
    /// Adopted points: at most one per axis for a move
    pub snap_points: Vec<SnapPoint>,
    pub adjusted_bounds: Bounds,
}

impl SnapResult {
    fn unchanged(bounds: Bounds) -> Self {
        Self {
            snapped: false,
            snap_points: vec![],
            adjusted_bounds: bounds,
        }
    }

    /// Replace the adjusted bounds after a later step moved them.
    ///
    /// Only the adopted points the new bounds still sit on are kept, and
    /// `snapped` is cleared once none are left.
    pub fn settle(&mut self, bounds: Bounds) {
        if bounds == self.adjusted_bounds {
            return;
        }
        self.adjusted_bounds = bounds;
        self.snap_points.retain(|p| p.touches(&bounds));
        self.snapped = !self.snap_points.is_empty();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Which part of the target is being aligned on an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Start,
    Center,
    End,
}

impl Anchor {
    fn offset(self, extent: f64) -> f64 {
        match self {
            Anchor::Start => 0.0,
            Anchor::Center => extent / 2.0,
            Anchor::End => extent,
        }
    }

    /// Kinds of snap point this anchor aligns to when moving.
    /// Grid lines only pull the leading edge so the widget origin lands on the grid.
    fn accepts_on_move(self, kind: SnapKind) -> bool {
        matches!(
            (self, kind),
            (Anchor::Start, SnapKind::Edge | SnapKind::Grid)
                | (Anchor::End, SnapKind::Edge)
                | (Anchor::Center, SnapKind::Center)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    Move,
    Resize,
}

/// One axis of the target, as seen by the nearest-point search
struct Probe<'a> {
    axis: Axis,
    start: f64,
    extent: f64,
    anchors: &'a [Anchor],
    gesture: Gesture,
}

impl<'a> Probe<'a> {
    fn moving(axis: Axis, start: f64, extent: f64) -> Self {
        Self {
            axis,
            start,
            extent,
            anchors: &[Anchor::Start, Anchor::End, Anchor::Center],
            gesture: Gesture::Move,
        }
    }

    fn edge(axis: Axis, start: f64, extent: f64, anchor: &'a [Anchor]) -> Self {
        Self {
            axis,
            start,
            extent,
            anchors: anchor,
            gesture: Gesture::Resize,
        }
    }
}

/// The nearest snap point found for one axis
#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    anchor: Anchor,
    coordinate: f64,
    distance: f64,
}

/// Edges moving during a resize gesture, parsed from compass strings like `"se"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeDirection {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

/// Invalid compass string for a resize direction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseResizeDirectionError {
    #[error("empty resize direction")]
    Empty,
    #[error("unknown resize direction '{0}' (expected a combination of n, s, e, w)")]
    UnknownDirection(char),
    #[error("resize direction '{0}' moves opposite edges")]
    OpposingEdges(String),
}

impl ResizeDirection {
    pub const EAST: Self = Self {
        north: false,
        south: false,
        east: true,
        west: false,
    };

    pub fn is_empty(&self) -> bool {
        !(self.north || self.south || self.east || self.west)
    }
}

impl FromStr for ResizeDirection {
    type Err = ParseResizeDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut dir = ResizeDirection::default();
        for c in s.trim().chars() {
            match c.to_ascii_lowercase() {
                'n' => dir.north = true,
                's' => dir.south = true,
                'e' => dir.east = true,
                'w' => dir.west = true,
                other => return Err(ParseResizeDirectionError::UnknownDirection(other)),
            }
        }
        if dir.is_empty() {
            return Err(ParseResizeDirectionError::Empty);
        }
        if (dir.north && dir.south) || (dir.east && dir.west) {
            return Err(ParseResizeDirectionError::OpposingEdges(s.to_string()));
        }
        Ok(dir)
    }
}

impl fmt::Display for ResizeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (self.north, 'n'),
            (self.south, 's'),
            (self.east, 'e'),
            (self.west, 'w'),
        ];
        for (set, c) in flags {
            if set {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

/// Collect the alignment targets for a gesture.
///
/// Order matters for tie-breaking: widget edges, then widget centers, then
/// grid lines. Exact duplicates are dropped.
pub fn build_snap_points<M: BoundsMapper + ?Sized>(
    widgets: &[Widget],
    exclude_id: &str,
    settings: &GridSettings,
    container: Container,
    mapper: &M,
) -> Vec<SnapPoint> {
    let mut points = Vec::new();

    if settings.snap_to_widgets {
        let others: Vec<(&str, Bounds)> = widgets
            .iter()
            .filter(|w| w.visible && w.id != exclude_id)
            .map(|w| (w.id.as_str(), mapper.widget_bounds(w)))
            .collect();

        for (id, b) in &others {
            let edges = [
                (b.x, b.y, SnapDirection::Vertical),
                (b.right(), b.y, SnapDirection::Vertical),
                (b.x, b.y, SnapDirection::Horizontal),
                (b.x, b.bottom(), SnapDirection::Horizontal),
            ];
            for (x, y, direction) in edges {
                points.push(SnapPoint::widget(x, y, SnapKind::Edge, id, direction));
            }
        }
        for (id, b) in &others {
            let c = b.center();
            points.push(SnapPoint::widget(
                c.x,
                c.y,
                SnapKind::Center,
                id,
                SnapDirection::Both,
            ));
        }
    }

    // Grid lines are distinct by construction; only widget points can repeat
    let mut points = dedup_points(points);

    if settings.snap_to_grid {
        for x in settings.grid_lines(container.width) {
            points.push(SnapPoint::grid(x, 0.0, SnapDirection::Vertical));
        }
        for y in settings.grid_lines(container.height) {
            points.push(SnapPoint::grid(0.0, y, SnapDirection::Horizontal));
        }
    }

    points
}

fn dedup_points(points: Vec<SnapPoint>) -> Vec<SnapPoint> {
    let mut seen = HashSet::with_capacity(points.len());
    points
        .into_iter()
        .filter(|p| {
            // + 0.0 folds -0.0 into 0.0
            seen.insert(((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits(), p.kind, p.direction))
        })
        .collect()
}

/// Snap a dragged widget toward grid lines and neighbouring widgets.
///
/// The left, right and center of the target are compared against vertical
/// points, top, bottom and center against horizontal points. A point
/// within `snap_threshold` (inclusive) is a candidate; the nearest candidate
/// per axis is adopted. Width and height never change.
pub fn apply_snap_to_grid<M: BoundsMapper + ?Sized>(
    target: Bounds,
    widgets: &[Widget],
    exclude_id: &str,
    settings: &GridSettings,
    container: Container,
    mapper: &M,
) -> SnapResult {
    if !settings.enabled {
        return SnapResult::unchanged(target);
    }

    let points = build_snap_points(widgets, exclude_id, settings, container, mapper);
    let mut adjusted = target;
    let mut adopted = Vec::new();

    let probe = Probe::moving(Axis::X, target.x, target.width);
    if let Some(c) = nearest(&points, &probe, settings, |_| true) {
        adjusted.x = c.coordinate - c.anchor.offset(target.width);
        adopted.push(points[c.index].clone());
    }
    let probe = Probe::moving(Axis::Y, target.y, target.height);
    if let Some(c) = nearest(&points, &probe, settings, |_| true) {
        adjusted.y = c.coordinate - c.anchor.offset(target.height);
        adopted.push(points[c.index].clone());
    }

    finish(target, adjusted, adopted, exclude_id)
}

/// Snap the moving edges of a widget being resized.
///
/// Only edges named by `direction` move. Each snaps independently against
/// grid lines and widget edges while the opposite edge stays fixed. A snap
/// that would collapse the widget to zero or negative size is not adopted.
pub fn apply_resize_snap<M: BoundsMapper + ?Sized>(
    target: Bounds,
    widgets: &[Widget],
    exclude_id: &str,
    settings: &GridSettings,
    container: Container,
    direction: ResizeDirection,
    mapper: &M,
) -> SnapResult {
    if !settings.enabled {
        return SnapResult::unchanged(target);
    }

    let points = build_snap_points(widgets, exclude_id, settings, container, mapper);
    let mut adjusted = target;
    let mut adopted = Vec::new();

    if direction.east {
        let fits = |coord: f64| coord - target.x > 0.0;
        let probe = Probe::edge(Axis::X, target.x, target.width, &[Anchor::End]);
        if let Some(c) = nearest(&points, &probe, settings, fits) {
            adjusted.width = c.coordinate - target.x;
            adopted.push(points[c.index].clone());
        }
    }
    if direction.west {
        let right = target.right();
        let fits = |coord: f64| right - coord > 0.0;
        let probe = Probe::edge(Axis::X, target.x, target.width, &[Anchor::Start]);
        if let Some(c) = nearest(&points, &probe, settings, fits) {
            adjusted.x = c.coordinate;
            adjusted.width = right - c.coordinate;
            adopted.push(points[c.index].clone());
        }
    }
    if direction.south {
        let fits = |coord: f64| coord - target.y > 0.0;
        let probe = Probe::edge(Axis::Y, target.y, target.height, &[Anchor::End]);
        if let Some(c) = nearest(&points, &probe, settings, fits) {
            adjusted.height = c.coordinate - target.y;
            adopted.push(points[c.index].clone());
        }
    }
    if direction.north {
        let bottom = target.bottom();
        let fits = |coord: f64| bottom - coord > 0.0;
        let probe = Probe::edge(Axis::Y, target.y, target.height, &[Anchor::Start]);
        if let Some(c) = nearest(&points, &probe, settings, fits) {
            adjusted.y = c.coordinate;
            adjusted.height = bottom - c.coordinate;
            adopted.push(points[c.index].clone());
        }
    }

    finish(target, adjusted, adopted, exclude_id)
}

fn finish(
    target: Bounds,
    adjusted: Bounds,
    adopted: Vec<SnapPoint>,
    exclude_id: &str,
) -> SnapResult {
    if adopted.is_empty() {
        return SnapResult::unchanged(target);
    }
    tracing::debug!(
        widget = exclude_id,
        points = adopted.len(),
        x = adjusted.x,
        y = adjusted.y,
        "snapped"
    );
    SnapResult {
        snapped: true,
        snap_points: adopted,
        adjusted_bounds: adjusted,
    }
}

/// Nearest snap point on one axis within the threshold.
///
/// Resize gestures only align edges, so grid lines and widget edges are
/// accepted there; moves use [`Anchor::accepts_on_move`]. `fits` can veto a
/// coordinate. Ties keep the earlier point.
fn nearest<F>(
    points: &[SnapPoint],
    probe: &Probe<'_>,
    settings: &GridSettings,
    fits: F,
) -> Option<Candidate>
where
    F: Fn(f64) -> bool,
{
    let mut best: Option<Candidate> = None;

    for (index, point) in points.iter().enumerate() {
        let Some(coordinate) = point.coordinate(probe.axis) else {
            continue;
        };
        for &anchor in probe.anchors {
            let accepted = match probe.gesture {
                Gesture::Resize => point.kind != SnapKind::Center,
                Gesture::Move => anchor.accepts_on_move(point.kind),
            };
            if !accepted {
                continue;
            }
            let distance = (coordinate - (probe.start + anchor.offset(probe.extent))).abs();
            if distance > settings.snap_threshold || !fits(coordinate) {
                continue;
            }
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(Candidate {
                    index,
                    anchor,
                    coordinate,
                    distance,
                });
            }
        }
    }

    best
}
