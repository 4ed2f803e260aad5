//! Interaction controller for the transcription editor.
//!
//! `Editor` owns the document, the view state, and the undo stack, and is
//! the only way input reaches them:
//! - Document mutations go through the command engine so undo is total.
//! - Pan/zoom/selection/creation-mode mutate `ViewState` directly and are
//!   not undoable.
//! - Drag gestures keep a transient preview and commit a single command on
//!   release.
//!
//! Renderers read `document()`, `view()`, and `display_rect()`; hosts poll
//! `take_dirty()` when idle to drive autosave.

mod events;

pub use events::{hit_test, HitTarget, InputEvent};

use log::debug;

use crate::calibration::Calibration;
use crate::command::{Command, UndoStack};
use crate::document::Document;
use crate::geometry::{Point, Rect, Transform};
use crate::types::{Mode, RowId, ViewState};

/// In-flight pointer gesture. `Moving`/`Resizing`/`Drawing` hold the
/// preview state that becomes one command on release. Points are in
/// image space.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) enum DragState {
    #[default]
    Idle,
    /// Box body grabbed; the whole rect follows the pointer.
    Moving {
        id: RowId,
        start: Point,
        current: Point,
        original: Rect,
    },
    /// Bottom-right handle grabbed; width/height follow the pointer.
    Resizing {
        id: RowId,
        start: Point,
        current: Point,
        original: Rect,
    },
    /// Creation mode press; a new box spans `start` to the pointer.
    Drawing { start: Point, current: Point },
}

/// The editing session: document + view + history + dirty tracking.
pub struct Editor {
    doc: Document,
    view: ViewState,
    undo: UndoStack,
    drag: DragState,
    /// Resize-handle tolerance in screen pixels (divided by zoom for hit
    /// testing in image space).
    resize_margin: f32,
    zoom_step: f32,
    dirty: bool,
}

impl Editor {
    pub fn new(doc: Document, viewport_w: f32, viewport_h: f32) -> Self {
        let mut view = ViewState::new(viewport_w, viewport_h);
        view.transform = Transform::fit(viewport_w, viewport_h, doc.image().rect());
        Self {
            doc,
            view,
            undo: UndoStack::new(),
            drag: DragState::default(),
            resize_margin: 10.0,
            zoom_step: 1.2,
            dirty: false,
        }
    }

    /// Apply UI parameters from the configuration.
    pub fn with_ui_params(mut self, resize_margin: f32, zoom_step: f32) -> Self {
        self.resize_margin = resize_margin;
        self.zoom_step = zoom_step.max(1.01);
        self
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.depth()
    }

    /// Replace the document wholesale (new image/TSV pair). Clears the
    /// undo history, the selection, and any in-flight gesture.
    pub fn replace_document(&mut self, doc: Document) {
        self.doc = doc;
        self.undo.clear();
        self.drag = DragState::Idle;
        self.view.selected = None;
        self.view.mode = Mode::Normal;
        self.reset_zoom();
        self.dirty = false;
    }

    /// Whether a committed change awaits persisting; clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The rect to draw for a row: the drag preview while that row is
    /// being moved or resized, its committed rect otherwise.
    pub fn display_rect(&self, id: RowId) -> Option<Rect> {
        match self.drag {
            DragState::Moving { id: drag_id, .. } | DragState::Resizing { id: drag_id, .. }
                if drag_id == id =>
            {
                self.preview_rect()
            }
            _ => self.doc.row(id).map(|r| r.rect),
        }
    }

    /// The in-progress creation rectangle, if drawing.
    pub fn drawing_rect(&self) -> Option<Rect> {
        match self.drag {
            DragState::Drawing { start, current } => Some(Rect::from_corners(start, current)),
            _ => None,
        }
    }

    pub(crate) fn preview_rect(&self) -> Option<Rect> {
        match self.drag {
            DragState::Moving { .. } | DragState::Resizing { .. } | DragState::Drawing { .. } => {
                Some(self.drag_target_rect())
            }
            DragState::Idle => None,
        }
    }

    /// Rect the current gesture would commit, clamped.
    pub(crate) fn drag_target_rect(&self) -> Rect {
        match self.drag {
            DragState::Idle => Rect::ZERO,
            DragState::Moving {
                start,
                current,
                original,
                ..
            } => self
                .doc
                .clamp_rect(original.translated(current.x - start.x, current.y - start.y)),
            DragState::Resizing {
                start,
                current,
                original,
                ..
            } => self.doc.clamp_rect(Rect {
                w: original.w + (current.x - start.x),
                h: original.h + (current.y - start.y),
                ..original
            }),
            DragState::Drawing { start, current } => {
                self.doc.clamp_rect(Rect::from_corners(start, current))
            }
        }
    }

    /// Single shared selection path used by both box clicks and table
    /// clicks, so the two can never disagree.
    pub fn select_row(&mut self, id: Option<RowId>) {
        let id = id.filter(|id| self.doc.row(*id).is_some());
        if self.view.selected != id {
            debug!("selection -> {:?}", id);
            self.view.selected = id;
        }
    }

    /// Commit a cell edit. Pushes nothing when the value is unchanged.
    pub fn commit_cell_edit(&mut self, id: RowId, column: usize, value: String) {
        let Some(row) = self.doc.row(id) else {
            return;
        };
        let Some(from) = row.cells.get(column).cloned() else {
            return;
        };
        if from == value {
            return;
        }
        self.execute(Command::SetCell {
            id,
            column,
            from,
            to: value,
        });
    }

    /// Revert a cell to its originally loaded value, through the undo
    /// stack like any other edit.
    pub fn revert_cell(&mut self, id: RowId, column: usize) -> bool {
        let Some(original) = self.doc.original_cell(id, column).map(str::to_string) else {
            return false;
        };
        self.commit_cell_edit(id, column, original);
        true
    }

    /// Delete the selected row as one undoable command.
    pub fn delete_selected(&mut self) {
        let Some(id) = self.view.selected else {
            return;
        };
        let Some(index) = self.doc.row_index(id) else {
            return;
        };
        let Some(row) = self.doc.row(id).cloned() else {
            return;
        };
        self.execute(Command::DeleteRow { index, row });
        self.view.selected = None;
    }

    /// Move a row to a new index (explicit reorder).
    pub fn reorder_row(&mut self, from: usize, to: usize) {
        if from == to || from >= self.doc.row_count() || to >= self.doc.row_count() {
            return;
        }
        self.execute(Command::MoveRow { from, to });
    }

    /// Undo the latest command. Clears the selection if the selected row
    /// no longer exists afterwards. Silent no-op on an empty stack.
    pub fn undo(&mut self) {
        if self.undo.undo(&mut self.doc) {
            self.dirty = true;
            if let Some(id) = self.view.selected {
                if self.doc.row(id).is_none() {
                    self.view.selected = None;
                }
            }
        }
    }

    /// Move a calibration marker. Not undoable; marks the document dirty
    /// so the sidecar gets rewritten.
    pub fn set_calibration_center(&mut self, column: usize, ratio: f32) {
        let columns = self.doc.column_count();
        self.doc.calibration_mut().set_center(column, ratio, columns);
        self.dirty = true;
    }

    pub fn calibration(&self) -> &Calibration {
        self.doc.calibration()
    }

    /// Fit the whole image back into the viewport.
    pub fn reset_zoom(&mut self) {
        self.view.transform =
            Transform::fit(self.view.viewport_w, self.view.viewport_h, self.doc.image().rect());
    }

    /// Focus the view on a row's vertical band, horizontally centered on
    /// the column's calibration marker. Returns the new transform.
    pub fn focus_on_cell(&mut self, row_index: usize, column: usize) -> Option<Transform> {
        let row = self.doc.row_at(row_index)?;
        let image = self.doc.image();
        #[allow(clippy::cast_precision_loss)]
        let image_w = image.width as f32;
        let center_x = self.doc.calibration().center(column) * image_w;
        let view_w = image_w / 5.0;
        let target = Rect {
            x: center_x - view_w / 2.0,
            y: row.rect.y,
            w: view_w,
            h: row.rect.h,
        };
        let t = Transform::fit(self.view.viewport_w, self.view.viewport_h, target);
        self.view.transform = t;
        Some(t)
    }

    pub(crate) fn execute(&mut self, command: Command) {
        self.undo.execute(&mut self.doc, command);
        self.dirty = true;
    }

    pub(crate) fn drag(&self) -> &DragState {
        &self.drag
    }

    pub(crate) fn set_drag(&mut self, drag: DragState) {
        self.drag = drag;
    }

    pub(crate) fn resize_margin(&self) -> f32 {
        self.resize_margin
    }

    pub(crate) fn zoom_step(&self) -> f32 {
        self.zoom_step
    }

    pub(crate) fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }
}
