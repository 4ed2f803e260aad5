//! Input event dispatch for [`Editor`].
//!
//! The host translates device input into this closed event set; the
//! mapping from events to editor calls lives in one `handle` function so
//! it can be tested without any input-device wiring.

use log::debug;

use super::{DragState, Editor};
use crate::command::Command;
use crate::document::Document;
use crate::geometry::{Point, Transform};
use crate::types::{Mode, RowId};

/// Discrete input events. Pointer coordinates are screen-space pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    /// Move the image by a screen-space delta. Not undoable.
    Pan { dx: f32, dy: f32 },
    /// Zoom one step in, anchored at a screen-space pivot. Not undoable.
    ZoomIn { pivot_x: f32, pivot_y: f32 },
    /// Zoom one step out, anchored at a screen-space pivot. Not undoable.
    ZoomOut { pivot_x: f32, pivot_y: f32 },
    /// Fit the image back into the viewport.
    ZoomReset,
    ToggleCalibration,
    /// Arm or disarm box-creation mode.
    ToggleCreateMode,
    /// Cancel the in-flight gesture and leave creation mode.
    Escape,
    Undo,
    /// Delete the selected row.
    DeleteSelected,
    /// A table cell edit was committed by the host's text editor.
    CellEdited {
        row: usize,
        column: usize,
        value: String,
    },
    /// A table cell was clicked: select the row and focus its box.
    TableCellClicked { row: usize, column: usize },
}

/// What a pointer press lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    None,
    /// Inside a box body: starts a move drag.
    Body(RowId),
    /// Near a box's bottom-right corner: starts a resize drag.
    ResizeHandle(RowId),
}

/// Determine what a screen-space point lands on. The handle tolerance is
/// given in screen pixels and divided by the zoom so it stays a constant
/// size on screen. Later rows win (topmost drawing order).
pub fn hit_test(doc: &Document, transform: Transform, x: f32, y: f32, margin: f32) -> HitTarget {
    let p = transform.to_image(Point::new(x, y));
    let m = if transform.zoom > 0.0 {
        margin / transform.zoom
    } else {
        margin
    };
    for row in doc.rows().iter().rev() {
        let rect = row.rect;
        if rect.w <= 0.0 || rect.h <= 0.0 {
            continue;
        }
        if (p.x - rect.right()).abs() <= m && (p.y - rect.bottom()).abs() <= m {
            return HitTarget::ResizeHandle(row.id);
        }
        if rect.contains(p) {
            return HitTarget::Body(row.id);
        }
    }
    HitTarget::None
}

impl Editor {
    /// Dispatch one input event.
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => self.pointer_down(x, y),
            InputEvent::PointerMove { x, y } => self.pointer_move(x, y),
            InputEvent::PointerUp => self.pointer_up(),
            InputEvent::Pan { dx, dy } => self.view_mut().transform.pan_by(dx, dy),
            InputEvent::ZoomIn { pivot_x, pivot_y } => {
                let step = self.zoom_step();
                self.view_mut()
                    .transform
                    .zoom_by(step, Point::new(pivot_x, pivot_y));
            }
            InputEvent::ZoomOut { pivot_x, pivot_y } => {
                let step = self.zoom_step();
                self.view_mut()
                    .transform
                    .zoom_by(1.0 / step, Point::new(pivot_x, pivot_y));
            }
            InputEvent::ZoomReset => self.reset_zoom(),
            InputEvent::ToggleCalibration => {
                let view = self.view_mut();
                view.calibration_visible = !view.calibration_visible;
            }
            InputEvent::ToggleCreateMode => self.toggle_create_mode(),
            InputEvent::Escape => self.cancel_gesture(),
            InputEvent::Undo => self.undo(),
            InputEvent::DeleteSelected => self.delete_selected(),
            InputEvent::CellEdited { row, column, value } => {
                if let Some(id) = self.document().row_at(row).map(|r| r.id) {
                    self.commit_cell_edit(id, column, value);
                }
            }
            InputEvent::TableCellClicked { row, column } => {
                let id = self.document().row_at(row).map(|r| r.id);
                self.select_row(id);
                if id.is_some() {
                    self.focus_on_cell(row, column);
                }
            }
        }
    }

    fn pointer_down(&mut self, x: f32, y: f32) {
        let p = self.view().transform.to_image(Point::new(x, y));

        if self.view().mode == Mode::CreatingBox {
            self.set_drag(DragState::Drawing {
                start: p,
                current: p,
            });
            return;
        }

        match hit_test(
            self.document(),
            self.view().transform,
            x,
            y,
            self.resize_margin(),
        ) {
            HitTarget::ResizeHandle(id) => {
                let Some(original) = self.document().row(id).map(|r| r.rect) else {
                    return;
                };
                self.select_row(Some(id));
                self.set_drag(DragState::Resizing {
                    id,
                    start: p,
                    current: p,
                    original,
                });
            }
            HitTarget::Body(id) => {
                let Some(original) = self.document().row(id).map(|r| r.rect) else {
                    return;
                };
                self.select_row(Some(id));
                self.set_drag(DragState::Moving {
                    id,
                    start: p,
                    current: p,
                    original,
                });
            }
            HitTarget::None => self.select_row(None),
        }
    }

    fn pointer_move(&mut self, x: f32, y: f32) {
        let p = self.view().transform.to_image(Point::new(x, y));
        // Intermediate moves only update the transient preview; the
        // document stays untouched until release.
        match *self.drag() {
            DragState::Moving {
                id,
                start,
                original,
                ..
            } => self.set_drag(DragState::Moving {
                id,
                start,
                current: p,
                original,
            }),
            DragState::Resizing {
                id,
                start,
                original,
                ..
            } => self.set_drag(DragState::Resizing {
                id,
                start,
                current: p,
                original,
            }),
            DragState::Drawing { start, .. } => {
                self.set_drag(DragState::Drawing { start, current: p });
            }
            DragState::Idle => {}
        }
    }

    fn pointer_up(&mut self) {
        match self.drag().clone() {
            DragState::Moving { id, original, .. } | DragState::Resizing { id, original, .. } => {
                let target = self.drag_target_rect();
                self.set_drag(DragState::Idle);
                // One command per gesture; a drag that went nowhere
                // pushes nothing.
                if target != original {
                    self.execute(Command::SetRect {
                        id,
                        from: original,
                        to: target,
                    });
                }
            }
            DragState::Drawing { start, current } => {
                self.set_drag(DragState::Idle);
                let drawn = crate::geometry::Rect::from_corners(start, current);
                // A click without a drag draws nothing.
                if drawn.w < 1.0 || drawn.h < 1.0 {
                    return;
                }
                let rect = self.document().clamp_rect(drawn);
                let id = self.document().peek_next_id();
                debug!("creating {} at {:?}", id, rect);
                self.execute(Command::AddRow { id, rect });
                self.select_row(Some(id));
                // Creation mode stays armed for multiple adds.
            }
            DragState::Idle => {}
        }
    }

    fn toggle_create_mode(&mut self) {
        self.set_drag(DragState::Idle);
        let view = self.view_mut();
        view.mode = match view.mode {
            Mode::Normal => Mode::CreatingBox,
            Mode::CreatingBox => Mode::Normal,
        };
    }

    fn cancel_gesture(&mut self) {
        self.set_drag(DragState::Idle);
        self.view_mut().mode = Mode::Normal;
    }
}
