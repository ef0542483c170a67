//! Mapping from widget placements to pixel-space bounds

use crate::model::{GridPosition, Widget};

use super::types::{Bounds, Container};

/// Computes the pixel rectangle a widget occupies.
///
/// The rendering layer owns the real cell-to-pixel conversion; any
/// `Fn(&Widget) -> Bounds` closure can stand in for it.
pub trait BoundsMapper {
    fn widget_bounds(&self, widget: &Widget) -> Bounds;
}

impl<F> BoundsMapper for F
where
    F: Fn(&Widget) -> Bounds,
{
    fn widget_bounds(&self, widget: &Widget) -> Bounds {
        self(widget)
    }
}

/// Uniform cell grid: every cell has the same pixel size and there is no gutter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGrid {
    pub cell_width: f64,
    pub cell_height: f64,
}

impl Default for CellGrid {
    fn default() -> Self {
        Self {
            cell_width: 100.0,
            cell_height: 100.0,
        }
    }
}

impl CellGrid {
    pub fn new(cell_width: f64, cell_height: f64) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }

    /// Square cells of `side` pixels, one per grid square
    pub fn square(side: f64) -> Self {
        Self::new(side, side)
    }

    /// Split the container width into `columns` square cells
    pub fn for_container(container: Container, columns: u32) -> Self {
        Self::square(container.width / columns.max(1) as f64)
    }

    /// Bounds for a bare cell position, ignoring any pixel dimensions
    pub fn position_bounds(&self, position: &GridPosition) -> Bounds {
        Bounds::new(
            position.col as f64 * self.cell_width,
            position.row as f64 * self.cell_height,
            position.width as f64 * self.cell_width,
            position.height as f64 * self.cell_height,
        )
    }

    /// Nearest cell position for a pixel rectangle. Spans are at least one cell.
    pub fn position_for(&self, bounds: &Bounds) -> GridPosition {
        GridPosition {
            row: cells(bounds.y, self.cell_height),
            col: cells(bounds.x, self.cell_width),
            width: cells(bounds.width, self.cell_width).max(1),
            height: cells(bounds.height, self.cell_height).max(1),
        }
    }
}

fn cells(pixels: f64, cell: f64) -> u32 {
    if cell <= 0.0 {
        return 0;
    }
    (pixels / cell).round().max(0.0) as u32
}

impl BoundsMapper for CellGrid {
    fn widget_bounds(&self, widget: &Widget) -> Bounds {
        let mut bounds = self.position_bounds(&widget.position);
        if let Some(dims) = &widget.dimensions {
            bounds.width = dims.width;
            bounds.height = dims.height;
        }
        bounds
    }
}
