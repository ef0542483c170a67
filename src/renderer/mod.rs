//! SVG preview of a dashboard layout
//!
//! Draws the canvas, the snap grid (when shown) and every visible widget,
//! with CSS classes for styling.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::{render_layout, render_layout_highlighted};
