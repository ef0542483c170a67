//! End-to-end editing: load a saved layout, drag and resize widgets through a
//! session, commit and persist the result.

use dashgrid::engine::lint;
use dashgrid::model::FileStore;
use dashgrid::{
    Bounds, CellGrid, DashboardLayout, DashboardSession, GridPosition, LayoutStore, SessionError,
    Widget, WidgetSize, WidgetType,
};
use pretty_assertions::assert_eq;

fn overview_session() -> DashboardSession {
    let layout = DashboardLayout::from_json(include_str!("fixtures/overview.json"))
        .expect("valid fixture");
    // Fixture positions are in 100px cells, coarser than the 20px snap grid
    DashboardSession::new(layout).with_grid(CellGrid::default())
}

fn position(session: &DashboardSession, id: &str) -> GridPosition {
    session.layout().widget(id).expect("widget exists").position
}

#[test]
fn test_drag_commit_and_persist() {
    let mut session = overview_session();

    // Dropped just below billing; snaps to billing's bottom edge and stats' right edge
    let preview = session
        .drag("tasks", Bounds::new(305.0, 303.0, 300.0, 200.0))
        .unwrap();
    assert!(preview.snap.snapped);
    assert_eq!(preview.bounds(), Bounds::new(300.0, 300.0, 300.0, 200.0));
    assert!(preview.is_valid());

    assert_eq!(session.commit(&preview), Ok(preview.bounds()));
    assert_eq!(position(&session, "tasks"), GridPosition::new(3, 3, 3, 2));
    assert!(lint::check(session.layout(), session.grid(), session.container()).is_empty());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layouts.json");
    let layout = session.into_layout();
    FileStore::open(&path).unwrap().save(layout.clone()).unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get(&layout.id).unwrap(), layout);
}

#[test]
fn test_colliding_drop_uses_suggestion() {
    let mut session = overview_session();

    // Centered on billing, then moved onto the nearest 100px cell
    let preview = session
        .drag("stats", Bounds::new(350.0, 50.0, 300.0, 200.0))
        .unwrap();
    assert_eq!(preview.bounds(), Bounds::new(400.0, 100.0, 300.0, 200.0));
    assert!(!preview.snap.snapped);
    assert!(!preview.is_valid());
    assert_eq!(preview.collision.conflicting_widgets, vec!["billing".to_string()]);
    assert_eq!(
        preview.collision.suggested_position,
        Some(Bounds::new(300.0, 300.0, 300.0, 200.0))
    );

    let err = session.commit(&preview).unwrap_err();
    assert!(matches!(err, SessionError::Collision { .. }));
    assert_eq!(position(&session, "stats"), GridPosition::new(0, 0, 3, 2));

    let placed = session.commit_suggested(&preview).unwrap();
    assert_eq!(Some(placed), preview.collision.suggested_position);
    assert_eq!(position(&session, "stats"), GridPosition::new(3, 3, 3, 2));
}

#[test]
fn test_resize_snaps_bottom_edge() {
    let mut session = overview_session();

    let preview = session
        .resize("billing", Bounds::new(300.0, 0.0, 400.0, 395.0), "s".parse().unwrap())
        .unwrap();
    assert_eq!(preview.bounds(), Bounds::new(300.0, 0.0, 400.0, 400.0));
    assert!(preview.is_valid());

    session.commit(&preview).unwrap();
    assert_eq!(position(&session, "billing"), GridPosition::new(0, 3, 4, 4));
}

#[test]
fn test_new_widget_goes_to_first_free_slot() {
    let mut session = overview_session();

    let placed = session
        .add_widget(Widget::new("revenue", "Revenue", WidgetType::Chart, WidgetSize::Medium))
        .unwrap();
    assert_eq!(placed, Bounds::new(300.0, 300.0, 400.0, 300.0));
    assert_eq!(position(&session, "revenue"), GridPosition::new(3, 3, 4, 3));
    assert!(lint::check(session.layout(), session.grid(), session.container()).is_empty());
}

#[test]
fn test_reshown_widget_keeps_old_spot() {
    let mut session = overview_session();

    // notifications was hidden over the stats tile
    assert_eq!(session.toggle_visibility("notifications"), Ok(true));
    assert_eq!(position(&session, "notifications"), GridPosition::new(0, 0, 3, 2));

    let warnings = lint::check(session.layout(), session.grid(), session.container());
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].to_string(),
        "overlap: widgets \"stats\" and \"notifications\" overlap by 300x200px"
    );
}

#[test]
fn test_remove_then_drop_into_freed_space() {
    let mut session = overview_session();
    let removed = session.remove_widget("billing").unwrap();
    assert_eq!(removed.widget_type, WidgetType::BillingOverview);

    let preview = session
        .drag("tasks", Bounds::new(402.0, 98.0, 300.0, 200.0))
        .unwrap();
    assert!(preview.is_valid());
    assert_eq!(preview.bounds(), Bounds::new(400.0, 100.0, 300.0, 200.0));
}

#[test]
fn test_default_cells_keep_snapped_bounds() {
    let mut layout = DashboardLayout::create("Fine");
    layout
        .add_widget(
            Widget::new("chart", "Chart", WidgetType::Chart, WidgetSize::Medium)
                .with_position(GridPosition::new(0, 0, 12, 5)),
        )
        .unwrap();
    layout
        .add_widget(
            Widget::new("tasks", "Tasks", WidgetType::Tasks, WidgetSize::Small)
                .with_position(GridPosition::new(10, 0, 5, 5)),
        )
        .unwrap();
    let mut session = DashboardSession::new(layout);

    // 240 is not a 100px multiple; with 20px cells it is stored as snapped
    let preview = session
        .drag("tasks", Bounds::new(245.0, 0.0, 100.0, 100.0))
        .unwrap();
    assert_eq!(preview.bounds(), Bounds::new(240.0, 0.0, 100.0, 100.0));
    assert_eq!(session.commit(&preview), Ok(preview.bounds()));
    assert_eq!(position(&session, "tasks"), GridPosition::new(0, 12, 5, 5));
    assert!(lint::check(session.layout(), session.grid(), session.container()).is_empty());
}
