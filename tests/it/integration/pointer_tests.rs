//! Pointer Interaction Integration Tests
//!
//! Press/move/release sequences against an edit-mode canvas with three
//! notes:
//!
//! ```text
//!   A (100,100)        B (500,100)
//!   C (100,500)
//! ```
//!
//! Each note is 300x200 of content plus the 28px header.

use crate::helpers::{CanvasFixture, TestCanvasBuilder, assert_position, header_point};
use dockboard::canvas::{Key, KeyOutcome, Modifiers, PointerOutcome};
use dockboard::geometry::{Point, Rect, Size};
use dockboard::item::{CursorHint, ItemId};

fn three_notes() -> CanvasFixture {
    TestCanvasBuilder::new()
        .with_item("note", (100.0, 100.0))
        .with_item("note", (500.0, 100.0))
        .with_item("note", (100.0, 500.0))
        .editing()
        .build()
}

fn header(fixture: &CanvasFixture, index: usize) -> Point {
    header_point(fixture.canvas.item(fixture.ids[index]).unwrap())
}

fn click(fixture: &mut CanvasFixture, point: Point, modifiers: Modifiers) -> PointerOutcome {
    fixture.canvas.pointer_down(point, modifiers);
    fixture.canvas.pointer_up(point)
}

fn drag(fixture: &mut CanvasFixture, from: Point, to: Point, modifiers: Modifiers) -> PointerOutcome {
    fixture.canvas.pointer_down(from, modifiers);
    fixture.canvas.pointer_move(Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0));
    fixture.canvas.pointer_up(to)
}

fn selected(fixture: &CanvasFixture) -> Vec<ItemId> {
    fixture.canvas.selected_ids()
}

// ============================================================================
// Selection refinement
// ============================================================================

#[test]
fn test_plain_click_selects_only_that_item() {
    let mut fixture = three_notes();
    let (a, b) = (header(&fixture, 0), header(&fixture, 1));

    click(&mut fixture, a, Modifiers::NONE);
    assert_eq!(selected(&fixture), vec![fixture.ids[0]]);

    click(&mut fixture, b, Modifiers::NONE);
    assert_eq!(selected(&fixture), vec![fixture.ids[1]]);
    assert!(fixture.canvas.item(fixture.ids[1]).unwrap().is_selected());
    assert!(!fixture.canvas.item(fixture.ids[0]).unwrap().is_selected());
}

#[test]
fn test_modifier_click_toggles_membership() {
    let mut fixture = three_notes();
    let (a, b) = (header(&fixture, 0), header(&fixture, 1));

    click(&mut fixture, a, Modifiers::NONE);
    click(&mut fixture, b, Modifiers::CONTROL);
    assert_eq!(selected(&fixture), vec![fixture.ids[0], fixture.ids[1]]);

    // Deselecting does not start a move, so the release has nothing to do.
    let down = fixture.canvas.pointer_down(b, Modifiers::SHIFT);
    assert_eq!(down, PointerOutcome::Handled);
    assert!(fixture.canvas.interaction().is_idle());
    assert_eq!(fixture.canvas.pointer_up(b), PointerOutcome::Ignored);
    assert_eq!(selected(&fixture), vec![fixture.ids[0]]);
}

#[test]
fn test_plain_click_on_group_member_collapses_on_release() {
    let mut fixture = three_notes();
    let (a, b) = (header(&fixture, 0), header(&fixture, 1));
    click(&mut fixture, a, Modifiers::NONE);
    click(&mut fixture, b, Modifiers::SHIFT);

    fixture.canvas.pointer_down(a, Modifiers::NONE);
    // Still a group while the button is down, so a drag would move both.
    assert_eq!(selected(&fixture).len(), 2);
    fixture.canvas.pointer_up(a);

    assert_eq!(selected(&fixture), vec![fixture.ids[0]]);
}

#[test]
fn test_pressing_empty_space_clears_selection() {
    let mut fixture = three_notes();
    let a = header(&fixture, 0);
    click(&mut fixture, a, Modifiers::NONE);

    let outcome = click(&mut fixture, Point::new(1000.0, 700.0), Modifiers::NONE);
    assert_eq!(outcome, PointerOutcome::Handled);
    assert!(selected(&fixture).is_empty());
}

#[test]
fn test_content_click_is_forwarded_in_local_coordinates() {
    let mut fixture = TestCanvasBuilder::new().with_item("note", (100.0, 100.0)).build();
    let id = fixture.ids[0];

    let outcome = fixture
        .canvas
        .pointer_down(Point::new(150.0, 170.0), Modifiers::NONE);
    assert_eq!(
        outcome,
        PointerOutcome::Forwarded {
            item_id: id,
            local: Point::new(50.0, 70.0),
        }
    );
    assert!(selected(&fixture).is_empty());

    fixture.canvas.set_edit_mode(true);
    let outcome = fixture
        .canvas
        .pointer_down(Point::new(150.0, 170.0), Modifiers::NONE);
    assert_eq!(
        outcome,
        PointerOutcome::Forwarded {
            item_id: id,
            local: Point::new(50.0, 42.0),
        }
    );
    assert_eq!(selected(&fixture), vec![id]);
    assert_eq!(
        *fixture.log.borrow(),
        vec!["click:50,70", "edit:true", "click:50,42"]
    );
}

#[test]
fn test_view_mode_ignores_empty_space() {
    let mut fixture = TestCanvasBuilder::new().with_item("note", (100.0, 100.0)).build();
    let outcome = fixture
        .canvas
        .pointer_down(Point::new(900.0, 700.0), Modifiers::NONE);
    assert_eq!(outcome, PointerOutcome::Ignored);
    assert!(fixture.canvas.interaction().is_idle());
}

// ============================================================================
// Moving
// ============================================================================

#[test]
fn test_drag_moves_whole_selection() {
    let mut fixture = three_notes();
    let (a, b) = (header(&fixture, 0), header(&fixture, 1));
    click(&mut fixture, a, Modifiers::NONE);
    click(&mut fixture, b, Modifiers::SHIFT);

    let outcome = drag(&mut fixture, a, a + Point::new(40.0, 60.0), Modifiers::NONE);
    assert_eq!(outcome, PointerOutcome::Committed);

    assert_position(&fixture.canvas, fixture.ids[0], 140.0, 160.0);
    assert_position(&fixture.canvas, fixture.ids[1], 540.0, 160.0);
    assert_position(&fixture.canvas, fixture.ids[2], 100.0, 500.0);
    // A real move keeps the group selected.
    assert_eq!(selected(&fixture).len(), 2);
    assert!(fixture.canvas.is_dirty());
}

#[test]
fn test_group_move_is_clamped_as_a_unit() {
    let mut fixture = three_notes();
    let (a, b) = (header(&fixture, 0), header(&fixture, 1));
    click(&mut fixture, a, Modifiers::NONE);
    click(&mut fixture, b, Modifiers::SHIFT);

    drag(&mut fixture, a, a + Point::new(-200.0, -500.0), Modifiers::NONE);
    assert_position(&fixture.canvas, fixture.ids[0], 0.0, 0.0);
    assert_position(&fixture.canvas, fixture.ids[1], 400.0, 0.0);

    let a = header(&fixture, 0);
    drag(&mut fixture, a, a + Point::new(1000.0, 0.0), Modifiers::NONE);
    assert_position(&fixture.canvas, fixture.ids[0], 500.0, 0.0);
    assert_position(&fixture.canvas, fixture.ids[1], 900.0, 0.0);
    assert_eq!(
        fixture.canvas.item(fixture.ids[1]).unwrap().bounds().right(),
        1200.0
    );
}

#[test]
fn test_moving_down_grows_the_scene() {
    let mut fixture = three_notes();
    let c = header(&fixture, 2);
    drag(&mut fixture, c, c + Point::new(0.0, 1000.0), Modifiers::NONE);

    assert_position(&fixture.canvas, fixture.ids[2], 100.0, 1500.0);
    assert_eq!(fixture.canvas.scene_size().height, 1500.0 + 228.0 + 50.0);
}

#[test]
fn test_release_without_motion_is_not_a_commit() {
    let mut fixture = three_notes();
    let a = header(&fixture, 0);
    let outcome = click(&mut fixture, a, Modifiers::NONE);
    assert_eq!(outcome, PointerOutcome::Handled);
    assert!(!fixture.canvas.is_dirty());
}

#[test]
fn test_escape_restores_moved_items() {
    let mut fixture = three_notes();
    let a = header(&fixture, 0);
    fixture.canvas.pointer_down(a, Modifiers::NONE);
    fixture.canvas.pointer_move(a + Point::new(300.0, 300.0));
    assert_position(&fixture.canvas, fixture.ids[0], 400.0, 400.0);

    assert_eq!(
        fixture.canvas.key_press(Key::Escape, Modifiers::NONE),
        KeyOutcome::Handled
    );
    assert_position(&fixture.canvas, fixture.ids[0], 100.0, 100.0);
    assert!(fixture.canvas.interaction().is_idle());
    assert!(selected(&fixture).is_empty());

    // The release after a cancel does nothing.
    assert_eq!(
        fixture.canvas.pointer_up(a + Point::new(300.0, 300.0)),
        PointerOutcome::Ignored
    );
}

#[test]
fn test_press_while_busy_is_ignored() {
    let mut fixture = three_notes();
    let (a, b) = (header(&fixture, 0), header(&fixture, 1));
    fixture.canvas.pointer_down(a, Modifiers::NONE);
    assert_eq!(
        fixture.canvas.pointer_down(b, Modifiers::NONE),
        PointerOutcome::Ignored
    );
    assert_eq!(selected(&fixture), vec![fixture.ids[0]]);
}

// ============================================================================
// Resizing
// ============================================================================

#[test]
fn test_bottom_right_resize() {
    let mut fixture = three_notes();
    let outcome = drag(
        &mut fixture,
        Point::new(400.0, 328.0),
        Point::new(500.0, 400.0),
        Modifiers::NONE,
    );
    assert_eq!(outcome, PointerOutcome::Committed);

    let item = fixture.canvas.item(fixture.ids[0]).unwrap();
    assert_eq!(item.position(), Point::new(100.0, 100.0));
    assert_eq!(item.content_size(), Size::new(400.0, 272.0));
    assert_eq!(selected(&fixture), vec![fixture.ids[0]]);
}

#[test]
fn test_top_left_resize_stops_at_floor() {
    let mut fixture = three_notes();
    drag(
        &mut fixture,
        Point::new(100.0, 100.0),
        Point::new(500.0, 500.0),
        Modifiers::NONE,
    );

    let item = fixture.canvas.item(fixture.ids[0]).unwrap();
    assert_eq!(item.bounds(), Rect::new(350.0, 250.0, 50.0, 78.0));
    assert_eq!(item.content_size(), Size::new(50.0, 50.0));
}

#[test]
fn test_right_edge_resize_is_clamped_to_scene() {
    let mut fixture = three_notes();
    assert_eq!(
        fixture.canvas.cursor_at(Point::new(800.0, 200.0)),
        CursorHint::ResizeHorizontal
    );

    drag(
        &mut fixture,
        Point::new(800.0, 200.0),
        Point::new(1500.0, 200.0),
        Modifiers::NONE,
    );
    let item = fixture.canvas.item(fixture.ids[1]).unwrap();
    assert_eq!(item.bounds().right(), 1200.0);
    assert_eq!(item.position(), Point::new(500.0, 100.0));
}

#[test]
fn test_left_edge_resize_is_clamped_to_scene_origin() {
    let mut fixture = three_notes();
    drag(
        &mut fixture,
        Point::new(100.0, 200.0),
        Point::new(-300.0, 200.0),
        Modifiers::NONE,
    );
    let item = fixture.canvas.item(fixture.ids[0]).unwrap();
    assert_eq!(item.bounds(), Rect::new(0.0, 100.0, 400.0, 228.0));
}

#[test]
fn test_escape_restores_resized_item() {
    let mut fixture = three_notes();
    fixture
        .canvas
        .pointer_down(Point::new(400.0, 328.0), Modifiers::NONE);
    fixture.canvas.pointer_move(Point::new(600.0, 600.0));
    fixture.canvas.key_press(Key::Escape, Modifiers::NONE);

    let item = fixture.canvas.item(fixture.ids[0]).unwrap();
    assert_eq!(item.bounds(), Rect::new(100.0, 100.0, 300.0, 228.0));
}

// ============================================================================
// Rubber band
// ============================================================================

#[test]
fn test_rubber_band_selects_intersecting_items() {
    let mut fixture = three_notes();
    fixture
        .canvas
        .pointer_down(Point::new(50.0, 50.0), Modifiers::NONE);
    fixture.canvas.pointer_move(Point::new(650.0, 350.0));

    assert_eq!(
        fixture.canvas.interaction().band_rect(),
        Some(Rect::new(50.0, 50.0, 600.0, 300.0))
    );
    assert_eq!(selected(&fixture), vec![fixture.ids[0], fixture.ids[1]]);

    let outcome = fixture.canvas.pointer_up(Point::new(650.0, 350.0));
    assert_eq!(outcome, PointerOutcome::Handled);
    assert_eq!(selected(&fixture), vec![fixture.ids[0], fixture.ids[1]]);
    assert!(fixture.canvas.interaction().is_idle());
}

#[test]
fn test_rubber_band_shrinks_live() {
    let mut fixture = three_notes();
    fixture
        .canvas
        .pointer_down(Point::new(50.0, 50.0), Modifiers::NONE);
    fixture.canvas.pointer_move(Point::new(650.0, 350.0));
    fixture.canvas.pointer_move(Point::new(300.0, 350.0));
    assert_eq!(selected(&fixture), vec![fixture.ids[0]]);
}

#[test]
fn test_tiny_band_selects_nothing() {
    let mut fixture = three_notes();
    let a = header(&fixture, 0);
    click(&mut fixture, a, Modifiers::NONE);

    drag(
        &mut fixture,
        Point::new(95.0, 60.0),
        Point::new(98.0, 63.0),
        Modifiers::NONE,
    );
    assert!(selected(&fixture).is_empty());
}

#[test]
fn test_additive_band_keeps_prior_selection() {
    let mut fixture = three_notes();
    let c = header(&fixture, 2);
    click(&mut fixture, c, Modifiers::NONE);

    drag(
        &mut fixture,
        Point::new(50.0, 50.0),
        Point::new(650.0, 350.0),
        Modifiers::SHIFT,
    );
    assert_eq!(selected(&fixture), fixture.ids);
}
