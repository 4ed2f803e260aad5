//! Transient view state. Not persisted and never part of undo history.

use crate::geometry::Transform;
use crate::types::RowId;

/// Pointer interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Clicks select and drag existing boxes.
    #[default]
    Normal,
    /// The next press starts drawing a new box.
    CreatingBox,
}

/// Everything the view needs that is not document state: zoom/pan,
/// viewport size, selection, interaction mode, calibration guide
/// visibility.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub transform: Transform,
    pub viewport_w: f32,
    pub viewport_h: f32,
    pub selected: Option<RowId>,
    pub mode: Mode,
    pub calibration_visible: bool,
}

impl ViewState {
    pub fn new(viewport_w: f32, viewport_h: f32) -> Self {
        Self {
            transform: Transform::default(),
            viewport_w,
            viewport_h,
            selected: None,
            mode: Mode::Normal,
            calibration_visible: true,
        }
    }
}
