//! Rows and the image they annotate.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Stable row identifier, unique within a session and never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct RowId(pub u64);

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row#{}", self.0)
    }
}

/// One transcribed register entry: a bounding box on the scan plus the
/// ordered cell values. The box is in image-pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub rect: Rect,
    pub cells: Vec<String>,
}

/// Pixel dimensions of the decoded page scan. The core never decodes
/// images; the host hands it the size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Full image extent as a rectangle at the origin.
    pub fn rect(&self) -> Rect {
        #[allow(clippy::cast_precision_loss)]
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }
}
