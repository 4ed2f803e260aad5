//! Reversible document mutations and the undo stack.
//!
//! Every document-mutating operation goes through [`UndoStack::execute`];
//! nothing else may touch the rows. Each command carries the prior state
//! it needs to revert itself exactly once. View navigation and calibration
//! moves are transient UI state and never appear here.

use crate::document::Document;
use crate::geometry::Rect;
use crate::types::{Row, RowId};

/// Maximum retained undo depth; the oldest entry is dropped beyond this.
pub const MAX_UNDO: usize = 50;

/// An atomic, reversible document mutation.
#[derive(Debug, Clone)]
pub enum Command {
    /// Move/resize a box. One drag gesture coalesces into one of these.
    SetRect { id: RowId, from: Rect, to: Rect },
    /// Change one cell's text.
    SetCell {
        id: RowId,
        column: usize,
        from: String,
        to: String,
    },
    /// Append a new row with empty cells (box-creation gesture).
    AddRow { id: RowId, rect: Rect },
    /// Delete a row; the full row is kept for revert.
    DeleteRow { index: usize, row: Row },
    /// Reorder: move the row at `from` to `to`.
    MoveRow { from: usize, to: usize },
}

impl Command {
    fn apply(&self, doc: &mut Document) {
        match self {
            Command::SetRect { id, to, .. } => {
                doc.set_rect(*id, *to);
            }
            Command::SetCell { id, column, to, .. } => {
                doc.set_cell(*id, *column, to.clone());
            }
            Command::AddRow { id, rect } => {
                doc.add_row_with_id(*id, *rect);
            }
            Command::DeleteRow { row, .. } => {
                doc.delete_row(row.id);
            }
            Command::MoveRow { from, to } => {
                doc.move_row(*from, *to);
            }
        }
    }

    fn revert(&self, doc: &mut Document) {
        match self {
            Command::SetRect { id, from, .. } => {
                doc.set_rect(*id, *from);
            }
            Command::SetCell {
                id, column, from, ..
            } => {
                doc.set_cell(*id, *column, from.clone());
            }
            Command::AddRow { id, .. } => {
                doc.delete_row(*id);
            }
            Command::DeleteRow { index, row } => {
                doc.insert_row_at(*index, row.clone());
            }
            Command::MoveRow { from, to } => {
                doc.move_row(*to, *from);
            }
        }
    }
}

/// Ordered stack of applied commands.
#[derive(Debug, Default)]
pub struct UndoStack {
    stack: Vec<Command>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a command and push it. Drops the oldest entry past
    /// [`MAX_UNDO`].
    pub fn execute(&mut self, doc: &mut Document, command: Command) {
        command.apply(doc);
        if self.stack.len() >= MAX_UNDO {
            self.stack.remove(0);
        }
        self.stack.push(command);
    }

    /// Revert the most recent command. Silent no-op when empty; returns
    /// whether anything was undone.
    pub fn undo(&mut self, doc: &mut Document) -> bool {
        match self.stack.pop() {
            Some(command) => {
                command.revert(doc);
                true
            }
            None => false,
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Forget all history (document replaced wholesale).
    pub fn clear(&mut self) {
        self.stack.clear();
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::ImageInfo;

    fn doc_with_rows(n: usize) -> Document {
        let mut d = Document::new(
            ImageInfo::new(2000, 3000),
            vec!["BBox".into(), "Name".into()],
        );
        for i in 0..n {
            #[allow(clippy::cast_precision_loss)]
            d.push_loaded_row(
                Rect::new(100.0, 100.0 * i as f32, 300.0, 60.0),
                vec![String::new(), format!("row {i}")],
            );
        }
        d
    }

    fn snapshot(doc: &Document) -> Vec<Row> {
        doc.rows().to_vec()
    }

    #[test]
    fn undo_restores_exact_prior_state_for_mixed_sequence() {
        let mut doc = doc_with_rows(3);
        let mut undo = UndoStack::new();
        let before = snapshot(&doc);
        let id0 = doc.rows()[0].id;
        let id1 = doc.rows()[1].id;

        let from = doc.row(id1).unwrap().rect;
        let to = doc.clamp_rect(from.translated(50.0, 20.0));
        undo.execute(&mut doc, Command::SetRect { id: id1, from, to });
        undo.execute(
            &mut doc,
            Command::SetCell {
                id: id0,
                column: 1,
                from: "row 0".into(),
                to: "corrected".into(),
            },
        );
        let new_id = RowId(99);
        undo.execute(
            &mut doc,
            Command::AddRow {
                id: new_id,
                rect: Rect::new(5.0, 5.0, 50.0, 20.0),
            },
        );
        undo.execute(&mut doc, Command::MoveRow { from: 0, to: 2 });
        let index = doc.row_index(id0).unwrap();
        let row = doc.row(id0).unwrap().clone();
        undo.execute(&mut doc, Command::DeleteRow { index, row });

        assert_eq!(undo.depth(), 5);
        while undo.undo(&mut doc) {}
        assert_eq!(snapshot(&doc), before);
    }

    #[test]
    fn undo_on_empty_stack_is_a_noop() {
        let mut doc = doc_with_rows(1);
        let mut undo = UndoStack::new();
        let before = snapshot(&doc);
        assert!(!undo.undo(&mut doc));
        assert_eq!(snapshot(&doc), before);
    }

    #[test]
    fn history_is_capped() {
        let mut doc = doc_with_rows(1);
        let id = doc.rows()[0].id;
        let mut undo = UndoStack::new();
        for i in 0..(MAX_UNDO + 10) {
            let from = doc.row(id).unwrap().cells[1].clone();
            undo.execute(
                &mut doc,
                Command::SetCell {
                    id,
                    column: 1,
                    from,
                    to: format!("v{i}"),
                },
            );
        }
        assert_eq!(undo.depth(), MAX_UNDO);
    }

    #[test]
    fn delete_then_undo_restores_position_and_contents() {
        let mut doc = doc_with_rows(3);
        let mut undo = UndoStack::new();
        let id1 = doc.rows()[1].id;
        let before = snapshot(&doc);

        let index = doc.row_index(id1).unwrap();
        let row = doc.row(id1).unwrap().clone();
        undo.execute(&mut doc, Command::DeleteRow { index, row });
        assert_eq!(doc.row_count(), 2);

        assert!(undo.undo(&mut doc));
        assert_eq!(snapshot(&doc), before);
    }
}
