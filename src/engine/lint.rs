//! Lint checks for saved layouts.
//!
//! Detects placements that break the layout invariants: overlapping visible
//! widgets, widgets outside the canvas, and pixel sizes outside their limits.
//! Hidden widgets are skipped.

use std::fmt;

use crate::model::{DashboardLayout, Widget};

use super::bounds::BoundsMapper;
use super::types::{Bounds, Container};

/// A lint warning about a layout defect
#[derive(Debug)]
pub struct LintWarning {
    pub category: LintCategory,
    pub message: String,
}

/// Category of lint defect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    Overlap,
    Bounds,
    Size,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Overlap => write!(f, "overlap"),
            LintCategory::Bounds => write!(f, "bounds"),
            LintCategory::Size => write!(f, "size"),
        }
    }
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

/// Run all lint checks on a layout.
pub fn check<M: BoundsMapper + ?Sized>(
    layout: &DashboardLayout,
    mapper: &M,
    container: Container,
) -> Vec<LintWarning> {
    let placed: Vec<(&Widget, Bounds)> = layout
        .visible_widgets()
        .map(|w| (w, mapper.widget_bounds(w)))
        .collect();

    let mut warnings = Vec::new();
    check_overlaps(&placed, &mut warnings);
    check_container(&placed, container, &mut warnings);
    check_sizes(&placed, &mut warnings);
    warnings
}

// ── Overlap detection ─────────────────────────────────────────────

fn check_overlaps(placed: &[(&Widget, Bounds)], warnings: &mut Vec<LintWarning>) {
    for i in 0..placed.len() {
        for j in (i + 1)..placed.len() {
            let (a, a_bounds) = &placed[i];
            let (b, b_bounds) = &placed[j];
            if let Some((w, h)) = a_bounds.overlap(b_bounds) {
                warnings.push(LintWarning {
                    category: LintCategory::Overlap,
                    message: format!(
                        "widgets \"{}\" and \"{}\" overlap by {:.0}x{:.0}px",
                        a.id, b.id, w, h
                    ),
                });
            }
        }
    }
}

// ── Canvas bounds ─────────────────────────────────────────────────

/// The canvas grows downward, so only the left, top and right sides are checked.
fn check_container(
    placed: &[(&Widget, Bounds)],
    container: Container,
    warnings: &mut Vec<LintWarning>,
) {
    for (widget, bounds) in placed {
        if bounds.x < 0.0 || bounds.y < 0.0 {
            warnings.push(LintWarning {
                category: LintCategory::Bounds,
                message: format!(
                    "widget \"{}\" starts outside the canvas at ({:.0}, {:.0})",
                    widget.id, bounds.x, bounds.y
                ),
            });
        }
        if bounds.right() > container.width {
            warnings.push(LintWarning {
                category: LintCategory::Bounds,
                message: format!(
                    "widget \"{}\" extends {:.0}px past the canvas width of {:.0}px",
                    widget.id,
                    bounds.right() - container.width,
                    container.width
                ),
            });
        }
    }
}

// ── Size limits ───────────────────────────────────────────────────

fn check_sizes(placed: &[(&Widget, Bounds)], warnings: &mut Vec<LintWarning>) {
    for (widget, _) in placed {
        let Some(dims) = &widget.dimensions else {
            continue;
        };
        if !dims.within_limits() {
            let (w, h) = dims.clamp(dims.width, dims.height);
            warnings.push(LintWarning {
                category: LintCategory::Size,
                message: format!(
                    "widget \"{}\" is {:.0}x{:.0}px, outside its limits (nearest allowed {:.0}x{:.0}px)",
                    widget.id, dims.width, dims.height, w, h
                ),
            });
        }
    }
}
