//! Layout engine: widget geometry, collision detection and snapping
//!
//! Data flows one way during a gesture: the candidate box is snapped first,
//! then validated against the other widgets. Nothing here holds state across
//! calls; the widget list is only read.

pub mod bounds;
pub mod collision;
pub mod lint;
pub mod snap;
pub mod types;

pub use bounds::{BoundsMapper, CellGrid};
pub use collision::{
    detect_collision, detect_collision_with, find_free_position, CollisionResult, SearchConfig,
    MAX_SEARCH_RADIUS,
};
pub use lint::{LintCategory, LintWarning};
pub use snap::{
    apply_resize_snap, apply_snap_to_grid, build_snap_points, ParseResizeDirectionError,
    ResizeDirection, SnapDirection, SnapKind, SnapPoint, SnapResult,
};
pub use types::*;
