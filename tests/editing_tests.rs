//! End-to-end editing scenarios driven through the event dispatch.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use thotindex::document::Document;
use thotindex::editor::{Editor, InputEvent};
use thotindex::geometry::{Point, Rect};
use thotindex::types::{ImageInfo, Mode, RowId};

// ================================================================
// Test helpers
// ================================================================

/// A 2000x3000 page with three rows, viewed at exactly 0.5 zoom
/// (1000x1500 viewport) so screen/image conversions are exact.
fn editor_with_rows() -> Editor {
    let mut doc = Document::new(
        ImageInfo::new(2000, 3000),
        vec!["BBox".into(), "Name".into(), "Date".into()],
    );
    doc.push_loaded_row(
        Rect::new(300.0, 200.0, 400.0, 200.0),
        vec![String::new(), "Dupont".into(), "1891".into()],
    );
    doc.push_loaded_row(
        Rect::new(300.0, 800.0, 400.0, 200.0),
        vec![String::new(), "Martin".into(), "1892".into()],
    );
    doc.push_loaded_row(
        Rect::new(300.0, 1400.0, 400.0, 200.0),
        vec![String::new(), "Bernard".into(), "1893".into()],
    );
    Editor::new(doc, 1000.0, 1500.0)
}

/// Screen coordinates of an image-space point under the current view.
fn screen(editor: &Editor, x: f32, y: f32) -> (f32, f32) {
    let p = editor.view().transform.to_screen(Point::new(x, y));
    (p.x, p.y)
}

fn press(editor: &mut Editor, x: f32, y: f32) {
    let (sx, sy) = screen(editor, x, y);
    editor.handle(InputEvent::PointerDown { x: sx, y: sy });
}

fn drag_to(editor: &mut Editor, x: f32, y: f32) {
    let (sx, sy) = screen(editor, x, y);
    editor.handle(InputEvent::PointerMove { x: sx, y: sy });
}

fn release(editor: &mut Editor) {
    editor.handle(InputEvent::PointerUp);
}

fn row_id(editor: &Editor, index: usize) -> RowId {
    editor.document().row_at(index).unwrap().id
}

fn rect_of(editor: &Editor, index: usize) -> Rect {
    editor.document().row_at(index).unwrap().rect
}

// ================================================================
// Scenario: box move drag
// ================================================================

#[test]
fn drag_moves_one_box_and_undo_restores_it() {
    let mut editor = editor_with_rows();
    let before_1 = rect_of(&editor, 0);
    let before_2 = rect_of(&editor, 1);
    let before_3 = rect_of(&editor, 2);

    // Grab row 2's body and drag by (50, 20) image pixels.
    press(&mut editor, 400.0, 900.0);
    drag_to(&mut editor, 430.0, 910.0);
    drag_to(&mut editor, 450.0, 920.0);
    release(&mut editor);

    let moved = rect_of(&editor, 1);
    assert_eq!(moved.x, before_2.x + 50.0);
    assert_eq!(moved.y, before_2.y + 20.0);
    assert_eq!((moved.w, moved.h), (before_2.w, before_2.h));
    assert_eq!(rect_of(&editor, 0), before_1);
    assert_eq!(rect_of(&editor, 2), before_3);

    // One drag gesture = one undo step.
    assert_eq!(editor.undo_depth(), 1);
    editor.handle(InputEvent::Undo);
    assert_eq!(rect_of(&editor, 1), before_2);
    assert_eq!(editor.undo_depth(), 0);
}

#[test]
fn drag_that_goes_nowhere_pushes_nothing() {
    let mut editor = editor_with_rows();
    press(&mut editor, 400.0, 900.0);
    release(&mut editor);
    assert_eq!(editor.undo_depth(), 0);
}

#[test]
fn drag_clamps_to_image_bounds() {
    let mut editor = editor_with_rows();
    press(&mut editor, 400.0, 300.0);
    drag_to(&mut editor, -5000.0, -5000.0);
    release(&mut editor);
    let moved = rect_of(&editor, 0);
    assert_eq!((moved.x, moved.y), (0.0, 0.0));
    assert_eq!((moved.w, moved.h), (400.0, 200.0));
}

#[test]
fn resize_handle_drag_changes_extent_only() {
    let mut editor = editor_with_rows();
    let before = rect_of(&editor, 1);
    // Bottom-right corner of row 2's box.
    press(&mut editor, before.right(), before.bottom());
    drag_to(&mut editor, before.right() + 60.0, before.bottom() + 30.0);
    release(&mut editor);
    let resized = rect_of(&editor, 1);
    assert_eq!((resized.x, resized.y), (before.x, before.y));
    assert_eq!(resized.w, before.w + 60.0);
    assert_eq!(resized.h, before.h + 30.0);
}

// ================================================================
// Scenario: box creation
// ================================================================

#[test]
fn creation_mode_draws_a_new_row_and_undo_removes_it() {
    let mut editor = editor_with_rows();
    editor.handle(InputEvent::ToggleCreateMode);
    assert_eq!(editor.view().mode, Mode::CreatingBox);

    press(&mut editor, 100.0, 100.0);
    drag_to(&mut editor, 300.0, 140.0);
    release(&mut editor);

    assert_eq!(editor.document().row_count(), 4);
    let created = editor.document().row_at(3).unwrap();
    assert_eq!(created.rect, Rect::new(100.0, 100.0, 200.0, 40.0));
    assert!(created.cells.iter().all(String::is_empty));
    assert_eq!(created.cells.len(), 3);
    assert_eq!(editor.view().selected, Some(created.id));
    // Mode stays armed for multiple adds.
    assert_eq!(editor.view().mode, Mode::CreatingBox);

    editor.handle(InputEvent::Undo);
    assert_eq!(editor.document().row_count(), 3);
    assert_eq!(editor.view().selected, None);
}

#[test]
fn escape_cancels_drawing_without_committing() {
    let mut editor = editor_with_rows();
    editor.handle(InputEvent::ToggleCreateMode);
    press(&mut editor, 100.0, 100.0);
    drag_to(&mut editor, 300.0, 140.0);
    editor.handle(InputEvent::Escape);
    release(&mut editor);

    assert_eq!(editor.document().row_count(), 3);
    assert_eq!(editor.undo_depth(), 0);
    assert_eq!(editor.view().mode, Mode::Normal);
}

#[test]
fn click_without_drag_creates_nothing() {
    let mut editor = editor_with_rows();
    editor.handle(InputEvent::ToggleCreateMode);
    press(&mut editor, 100.0, 100.0);
    release(&mut editor);
    assert_eq!(editor.document().row_count(), 3);
}

// ================================================================
// Scenario: calibration is advisory
// ================================================================

#[test]
fn calibration_move_touches_no_row_and_no_history() {
    let mut editor = editor_with_rows();
    let rects: Vec<Rect> = (0..3).map(|i| rect_of(&editor, i)).collect();

    editor.set_calibration_center(1, 0.3);

    for (i, rect) in rects.iter().enumerate() {
        assert_eq!(rect_of(&editor, i), *rect);
    }
    assert_eq!(editor.undo_depth(), 0);
    // It still marks the document dirty so the sidecar gets saved.
    assert!(editor.is_dirty());
}

#[test]
fn toggle_calibration_flips_visibility_only() {
    let mut editor = editor_with_rows();
    assert!(editor.view().calibration_visible);
    editor.handle(InputEvent::ToggleCalibration);
    assert!(!editor.view().calibration_visible);
    assert_eq!(editor.undo_depth(), 0);
}

// ================================================================
// Selection
// ================================================================

#[test]
fn box_click_and_table_click_agree_on_selection() {
    let mut editor = editor_with_rows();
    let id = row_id(&editor, 1);

    press(&mut editor, 400.0, 900.0);
    release(&mut editor);
    let via_box = editor.view().selected;

    editor.select_row(None);
    editor.handle(InputEvent::TableCellClicked { row: 1, column: 2 });
    let via_table = editor.view().selected;

    assert_eq!(via_box, Some(id));
    assert_eq!(via_box, via_table);
}

#[test]
fn click_on_empty_canvas_clears_selection() {
    let mut editor = editor_with_rows();
    press(&mut editor, 400.0, 900.0);
    release(&mut editor);
    assert!(editor.view().selected.is_some());

    press(&mut editor, 1900.0, 2900.0);
    release(&mut editor);
    assert_eq!(editor.view().selected, None);
}

#[test]
fn overlapping_boxes_select_topmost() {
    let mut doc = Document::new(ImageInfo::new(1000, 1000), vec!["BBox".into(), "Name".into()]);
    doc.push_loaded_row(
        Rect::new(0.0, 0.0, 400.0, 400.0),
        vec![String::new(), "a".into()],
    );
    let top = doc.push_loaded_row(
        Rect::new(200.0, 200.0, 400.0, 400.0),
        vec![String::new(), "b".into()],
    );
    let mut editor = Editor::new(doc, 1000.0, 1000.0);
    press(&mut editor, 300.0, 300.0);
    release(&mut editor);
    assert_eq!(editor.view().selected, Some(top));
}

#[test]
fn delete_selected_clears_selection_and_is_undoable() {
    let mut editor = editor_with_rows();
    let id = row_id(&editor, 1);
    editor.select_row(Some(id));
    editor.handle(InputEvent::DeleteSelected);

    assert_eq!(editor.document().row_count(), 2);
    assert_eq!(editor.view().selected, None);

    editor.handle(InputEvent::Undo);
    assert_eq!(editor.document().row_count(), 3);
    assert_eq!(row_id(&editor, 1), id);
}

// ================================================================
// Cell edits
// ================================================================

#[test]
fn noop_cell_edit_does_not_grow_history() {
    let mut editor = editor_with_rows();
    editor.handle(InputEvent::CellEdited {
        row: 1,
        column: 1,
        value: "Martin".into(),
    });
    assert_eq!(editor.undo_depth(), 0);
    assert!(!editor.is_dirty());

    editor.handle(InputEvent::CellEdited {
        row: 1,
        column: 1,
        value: "Marchand".into(),
    });
    assert_eq!(editor.undo_depth(), 1);
    assert!(editor.is_dirty());
}

#[test]
fn revert_cell_restores_loaded_value_via_history() {
    let mut editor = editor_with_rows();
    let id = row_id(&editor, 0);
    editor.commit_cell_edit(id, 1, "Wrong".into());
    assert!(editor.document().is_modified(id, 1));

    assert!(editor.revert_cell(id, 1));
    assert!(!editor.document().is_modified(id, 1));
    assert_eq!(editor.document().row(id).unwrap().cells[1], "Dupont");

    // The revert itself is undoable.
    editor.handle(InputEvent::Undo);
    assert_eq!(editor.document().row(id).unwrap().cells[1], "Wrong");
}

// ================================================================
// View navigation
// ================================================================

#[test]
fn pan_and_zoom_do_not_touch_history() {
    let mut editor = editor_with_rows();
    editor.handle(InputEvent::Pan { dx: 30.0, dy: -10.0 });
    editor.handle(InputEvent::ZoomIn {
        pivot_x: 500.0,
        pivot_y: 700.0,
    });
    editor.handle(InputEvent::ZoomOut {
        pivot_x: 100.0,
        pivot_y: 100.0,
    });
    editor.handle(InputEvent::ZoomReset);
    assert_eq!(editor.undo_depth(), 0);
    assert!(!editor.is_dirty());
}

#[test]
fn focus_on_cell_centers_calibration_marker() {
    let mut editor = editor_with_rows();
    let t = editor.focus_on_cell(1, 1).unwrap();
    // The marker's image x lands in the horizontal middle of the viewport.
    let marker_x = editor.document().calibration().center(1) * 2000.0;
    let on_screen = t.to_screen(Point::new(marker_x, 0.0));
    assert!((on_screen.x - 500.0).abs() < 1.0);
}

#[test]
fn replace_document_clears_history_and_selection() {
    let mut editor = editor_with_rows();
    press(&mut editor, 400.0, 900.0);
    drag_to(&mut editor, 450.0, 920.0);
    release(&mut editor);
    assert_eq!(editor.undo_depth(), 1);

    let fresh = Document::new(ImageInfo::new(500, 500), vec!["BBox".into(), "Name".into()]);
    editor.replace_document(fresh);
    assert_eq!(editor.undo_depth(), 0);
    assert_eq!(editor.view().selected, None);
    editor.handle(InputEvent::Undo);
    assert_eq!(editor.document().row_count(), 0);
}
