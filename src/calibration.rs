//! Column calibration markers.
//!
//! Each data column gets a horizontal center, stored as a ratio of the
//! image width (0.0 to 1.0). The markers only drive guide rendering and
//! focus-on-cell centering; moving one never touches any row. Column 0 is
//! the bounding-box column and carries no marker.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Movable column-center markers, keyed by column index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Calibration {
    centers: BTreeMap<usize, f32>,
}

impl Calibration {
    /// Default calibration: centers equally spaced across the image,
    /// `(i + 0.5) / num_columns` for each data column.
    pub fn equally_spaced(num_columns: usize) -> Self {
        let mut centers = BTreeMap::new();
        if num_columns > 0 {
            #[allow(clippy::cast_precision_loss)]
            for i in 1..num_columns {
                centers.insert(i, (i as f32 + 0.5) / num_columns as f32);
            }
        }
        Self { centers }
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Center ratio for a column, 0.5 when the column has no marker.
    pub fn center(&self, column: usize) -> f32 {
        self.centers.get(&column).copied().unwrap_or(0.5)
    }

    /// Marker position in image pixels.
    pub fn position_x(&self, column: usize, image_width: u32) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let w = image_width as f32;
        self.center(column) * w
    }

    /// Markers in column order as `(column, ratio)` pairs.
    pub fn markers(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.centers.iter().map(|(&c, &r)| (c, r))
    }

    /// Move a column's center and redistribute every later column equally
    /// across the remaining space, so the guides keep their left-to-right
    /// order. Column 0 is ignored. The ratio is clamped to [0, 1].
    pub fn set_center(&mut self, column: usize, ratio: f32, num_columns: usize) {
        if column == 0 || column >= num_columns {
            return;
        }
        let ratio = ratio.clamp(0.0, 1.0);
        self.centers.insert(column, ratio);

        let remaining = num_columns - 1 - column;
        if remaining > 0 {
            #[allow(clippy::cast_precision_loss)]
            let chunk = (1.0 - ratio) / remaining as f32;
            for i in 0..remaining {
                #[allow(clippy::cast_precision_loss)]
                let center = ratio + (i as f32 + 0.5) * chunk;
                self.centers.insert(column + 1 + i, center);
            }
        }
    }

    /// Remove a column's marker; `center` falls back to 0.5.
    pub fn remove(&mut self, column: usize) -> bool {
        self.centers.remove(&column).is_some()
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

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn default_spacing() {
        let c = Calibration::equally_spaced(4);
        assert!(approx(c.center(1), 1.5 / 4.0));
        assert!(approx(c.center(2), 2.5 / 4.0));
        assert!(approx(c.center(3), 3.5 / 4.0));
        // No marker for the bbox column.
        assert_eq!(c.markers().count(), 3);
    }

    #[test]
    fn moving_a_center_redistributes_later_columns() {
        let mut c = Calibration::equally_spaced(4);
        c.set_center(1, 0.2, 4);
        assert!(approx(c.center(1), 0.2));
        // Remaining space (0.2, 1.0] split into two chunks of 0.4,
        // centers in the middle of each chunk.
        assert!(approx(c.center(2), 0.4));
        assert!(approx(c.center(3), 0.8));
    }

    #[test]
    fn last_column_moves_alone() {
        let mut c = Calibration::equally_spaced(3);
        let before = c.center(1);
        c.set_center(2, 0.9, 3);
        assert!(approx(c.center(2), 0.9));
        assert!(approx(c.center(1), before));
    }

    #[test]
    fn bbox_column_and_out_of_range_ignored() {
        let mut c = Calibration::equally_spaced(3);
        let snapshot = c.clone();
        c.set_center(0, 0.1, 3);
        c.set_center(7, 0.1, 3);
        assert_eq!(c, snapshot);
    }

    #[test]
    fn ratio_is_clamped() {
        let mut c = Calibration::equally_spaced(3);
        c.set_center(2, 4.0, 3);
        assert!(approx(c.center(2), 1.0));
    }

    #[test]
    fn sidecar_json_roundtrip() {
        let mut c = Calibration::equally_spaced(3);
        c.set_center(1, 0.25, 3);
        let json = serde_json::to_string(&c).unwrap();
        let back: Calibration = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }

    #[test]
    fn position_x_scales_by_image_width() {
        let c = Calibration::equally_spaced(2);
        assert!(approx(c.position_x(1, 2000), 1500.0));
    }
}
