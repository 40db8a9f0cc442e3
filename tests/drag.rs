mod common;

use common::{pointer, pointer_with, MockChart};
use egui::CursorIcon;
use plotcursor::{
    CrosshairStyle, Cursor, PanZoomConfig, PointerKind, PointerModifiers,
};

/// Points chosen so the cursor at (1, 1) sits at pixel (10, 10), with an
/// extra point at (1, 8) lying on the vertical crosshair for click tests.
fn chart() -> MockChart {
    MockChart::new(vec![(
        "alpha",
        vec![(0.0, 0.0), (1.0, 1.0), (2.0, 4.0), (1.0, 8.0)],
    )])
}

fn cursor_at_1_1(chart: &mut MockChart) -> Cursor {
    Cursor::new(chart, 1.0, 1.0, 0, true, CrosshairStyle::Both)
}

#[test]
fn target_drag_snaps_and_emits_once() {
    let mut chart = chart();
    let mut cursor = cursor_at_1_1(&mut chart);
    let rx = cursor.subscribe_position();

    assert!(cursor.handle_pointer(&mut chart, &pointer(PointerKind::Down, 10.0, 10.0)));
    assert!(cursor.is_dragging());
    assert!(cursor.handle_pointer(&mut chart, &pointer(PointerKind::Move, 15.0, 25.0)));
    assert!(cursor.handle_pointer(&mut chart, &pointer(PointerKind::Move, 19.0, 39.0)));
    // No emission while the gesture is in flight.
    assert!(rx.try_recv().is_err());

    assert!(cursor.handle_pointer(&mut chart, &pointer(PointerKind::Up, 19.0, 39.0)));
    assert!(!cursor.is_dragging());

    let event = rx.try_recv().expect("one event on release");
    assert_eq!((event.x, event.y), (2.0, 4.0));
    assert!(rx.try_recv().is_err(), "exactly one event per gesture");
}

#[test]
fn drag_disables_and_restores_pan_zoom() {
    let mut chart = chart();
    chart.pan_zoom = PanZoomConfig {
        panning_enabled: true,
        zoom_enabled: false,
    };
    let mut cursor = cursor_at_1_1(&mut chart);

    cursor.handle_pointer(&mut chart, &pointer(PointerKind::Down, 10.0, 10.0));
    assert_eq!(chart.pan_zoom, PanZoomConfig::disabled());
    assert_eq!(chart.cursor_icon, Some(CursorIcon::Move));

    cursor.handle_pointer(&mut chart, &pointer(PointerKind::Move, 12.0, 12.0));
    assert_eq!(chart.pan_zoom, PanZoomConfig::disabled());

    cursor.handle_pointer(&mut chart, &pointer(PointerKind::Up, 12.0, 12.0));
    assert_eq!(
        chart.pan_zoom,
        PanZoomConfig {
            panning_enabled: true,
            zoom_enabled: false,
        }
    );
    assert_eq!(chart.cursor_icon, None);
}

#[test]
fn vertical_line_drag_uses_x_mode() {
    let mut chart = chart();
    let mut cursor = cursor_at_1_1(&mut chart);

    // Grab the vertical line well away from the target glyph.
    assert!(cursor.handle_pointer(&mut chart, &pointer(PointerKind::Down, 10.0, 50.0)));
    assert_eq!(chart.cursor_icon, Some(CursorIcon::ResizeColumn));

    // Horizontally nearest is x = 2 even though the y pixel is far away.
    cursor.handle_pointer(&mut chart, &pointer(PointerKind::Move, 19.0, -70.0));
    cursor.handle_pointer(&mut chart, &pointer(PointerKind::Up, 19.0, -70.0));

    assert_eq!((cursor.x(), cursor.y()), (2.0, 4.0));
    assert_eq!(cursor.series(), Some(0));
}

#[test]
fn horizontal_line_drag_uses_y_mode() {
    let mut chart = chart();
    let mut cursor = cursor_at_1_1(&mut chart);

    assert!(cursor.handle_pointer(&mut chart, &pointer(PointerKind::Down, 60.0, 10.0)));
    assert_eq!(chart.cursor_icon, Some(CursorIcon::ResizeRow));

    cursor.handle_pointer(&mut chart, &pointer(PointerKind::Move, 0.0, 39.0));
    cursor.handle_pointer(&mut chart, &pointer(PointerKind::Up, 0.0, 39.0));

    assert_eq!((cursor.x(), cursor.y()), (2.0, 4.0));
}

#[test]
fn pointer_events_outside_a_gesture_are_not_consumed() {
    let mut chart = chart();
    let mut cursor = cursor_at_1_1(&mut chart);

    assert!(!cursor.handle_pointer(&mut chart, &pointer(PointerKind::Move, 10.0, 10.0)));
    assert!(!cursor.handle_pointer(&mut chart, &pointer(PointerKind::Up, 10.0, 10.0)));
    // A down far away from any visual does not start a drag.
    assert!(!cursor.handle_pointer(&mut chart, &pointer(PointerKind::Down, 500.0, 500.0)));
    assert!(!cursor.is_dragging());
}

#[test]
fn release_without_movement_selects_in_selection_mode() {
    let mut chart = chart();
    chart.selection_mode = true;
    let mut cursor = cursor_at_1_1(&mut chart);

    cursor.handle_pointer(&mut chart, &pointer(PointerKind::Down, 10.0, 10.0));
    // Moves reporting the grab position do not turn the click into a drag.
    cursor.handle_pointer(&mut chart, &pointer(PointerKind::Move, 10.0, 10.0));
    cursor.handle_pointer(&mut chart, &pointer(PointerKind::Up, 10.0, 10.0));

    assert_eq!(chart.selected_points(), vec![(0, 1)]);
    assert_eq!((cursor.x(), cursor.y()), (1.0, 1.0), "click must not move the cursor");
}

#[test]
fn click_ignores_points_beyond_search_radius() {
    let mut chart = chart();
    chart.selection_mode = true;
    let mut cursor = cursor_at_1_1(&mut chart);

    // On the vertical line but ~30 px away from the nearest data point.
    cursor.handle_pointer(&mut chart, &pointer(PointerKind::Down, 10.0, 50.0));
    cursor.handle_pointer(&mut chart, &pointer(PointerKind::Up, 10.0, 50.0));

    assert!(chart.selected_points().is_empty());
}

#[test]
fn click_outside_selection_mode_is_a_no_op() {
    let mut chart = chart();
    let mut cursor = cursor_at_1_1(&mut chart);

    cursor.handle_pointer(&mut chart, &pointer(PointerKind::Down, 10.0, 10.0));
    cursor.handle_pointer(&mut chart, &pointer(PointerKind::Up, 10.0, 10.0));

    assert!(chart.selected_points().is_empty());
}

#[test]
fn modified_clicks_toggle_an_additive_selection() {
    let mut chart = chart();
    chart.selection_mode = true;
    let mut cursor = cursor_at_1_1(&mut chart);
    let ctrl = PointerModifiers {
        ctrl: true,
        ..Default::default()
    };

    // Ctrl-click the target: selects (1, 1).
    cursor.handle_pointer(&mut chart, &pointer_with(PointerKind::Down, 10.0, 10.0, ctrl));
    cursor.handle_pointer(&mut chart, &pointer_with(PointerKind::Up, 10.0, 10.0, ctrl));
    assert_eq!(chart.selected_points(), vec![(0, 1)]);

    // Ctrl-click on the vertical line at the (1, 8) point: adds it.
    cursor.handle_pointer(&mut chart, &pointer_with(PointerKind::Down, 10.0, 80.0, ctrl));
    cursor.handle_pointer(&mut chart, &pointer_with(PointerKind::Up, 10.0, 80.0, ctrl));
    assert_eq!(chart.selected_points(), vec![(0, 1), (0, 3)]);

    // Ctrl-click the target again: toggles (1, 1) back off.
    cursor.handle_pointer(&mut chart, &pointer_with(PointerKind::Down, 10.0, 10.0, ctrl));
    cursor.handle_pointer(&mut chart, &pointer_with(PointerKind::Up, 10.0, 10.0, ctrl));
    assert_eq!(chart.selected_points(), vec![(0, 3)]);

    // A plain click selects exclusively.
    cursor.handle_pointer(&mut chart, &pointer(PointerKind::Down, 10.0, 10.0));
    cursor.handle_pointer(&mut chart, &pointer(PointerKind::Up, 10.0, 10.0));
    assert_eq!(chart.selected_points(), vec![(0, 1)]);
}

#[test]
fn idle_release_still_emits_for_observers() {
    let mut chart = chart();
    let mut cursor = cursor_at_1_1(&mut chart);
    let rx = cursor.subscribe_position();

    cursor.handle_pointer(&mut chart, &pointer(PointerKind::Down, 10.0, 10.0));
    cursor.handle_pointer(&mut chart, &pointer(PointerKind::Up, 10.0, 10.0));

    let event = rx.try_recv().expect("release emits even without movement");
    assert_eq!((event.x, event.y), (1.0, 1.0));
}
