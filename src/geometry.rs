//! Image/screen coordinate transforms under zoom and pan.
//!
//! All document geometry lives in image-pixel space; the view maps it to
//! screen space with `screen = image * zoom + pan`. The two conversions are
//! exact inverses up to f32 rounding.

/// Minimum zoom factor the view will accept.
pub const MIN_ZOOM: f32 = 0.05;
/// Maximum zoom factor the view will accept.
pub const MAX_ZOOM: f32 = 32.0;

/// A point in either image or screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, `x`/`y` at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        w: 0.0,
        h: 0.0,
    };

    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle spanning two corner points, normalized to positive extents.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            w: (a.x - b.x).abs(),
            h: (a.y - b.y).abs(),
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// True when `p` lies inside the rectangle (edges inclusive).
    pub fn contains(&self, p: Point) -> bool {
        self.w > 0.0
            && self.h > 0.0
            && p.x >= self.x
            && p.x <= self.right()
            && p.y >= self.y
            && p.y <= self.bottom()
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// View transform: zoom factor plus the screen position of the image origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl Transform {
    /// Convert an image-space point to screen space.
    pub fn to_screen(&self, p: Point) -> Point {
        Point {
            x: p.x * self.zoom + self.pan_x,
            y: p.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space point to image space.
    pub fn to_image(&self, p: Point) -> Point {
        Point {
            x: (p.x - self.pan_x) / self.zoom,
            y: (p.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert an image-space rectangle to screen space.
    pub fn rect_to_screen(&self, r: Rect) -> Rect {
        let tl = self.to_screen(Point::new(r.x, r.y));
        Rect {
            x: tl.x,
            y: tl.y,
            w: r.w * self.zoom,
            h: r.h * self.zoom,
        }
    }

    /// Convert a screen-space rectangle to image space.
    pub fn rect_to_image(&self, r: Rect) -> Rect {
        let tl = self.to_image(Point::new(r.x, r.y));
        Rect {
            x: tl.x,
            y: tl.y,
            w: r.w / self.zoom,
            h: r.h / self.zoom,
        }
    }

    /// Multiply the zoom by `factor`, keeping the image point under the
    /// screen-space `pivot` fixed. The factor is clamped so the resulting
    /// zoom stays within `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn zoom_by(&mut self, factor: f32, pivot: Point) {
        let old_zoom = self.zoom;
        let new_zoom = (old_zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let ratio = new_zoom / old_zoom;
        self.pan_x = pivot.x - (pivot.x - self.pan_x) * ratio;
        self.pan_y = pivot.y - (pivot.y - self.pan_y) * ratio;
        self.zoom = new_zoom;
    }

    /// Move the image by `(dx, dy)` screen pixels.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Transform that fits `rect` into a `vw` x `vh` viewport, preserving
    /// aspect ratio and centering the rectangle. Degenerate rectangles
    /// yield the identity transform.
    pub fn fit(vw: f32, vh: f32, rect: Rect) -> Self {
        if rect.w <= 0.0 || rect.h <= 0.0 || vw <= 0.0 || vh <= 0.0 {
            return Self::default();
        }
        let zoom = (vw / rect.w).min(vh / rect.h).clamp(MIN_ZOOM, MAX_ZOOM);
        Self {
            zoom,
            pan_x: (vw - rect.w * zoom) / 2.0 - rect.x * zoom,
            pan_y: (vh - rect.h * zoom) / 2.0 - rect.y * zoom,
        }
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
    use test_case::test_case;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test_case(1.0, 0.0, 0.0 ; "identity")]
    #[test_case(2.5, 100.0, -40.0 ; "zoomed and panned")]
    #[test_case(0.1, -3.0, 7.5 ; "zoomed out")]
    fn roundtrip_screen_image(zoom: f32, pan_x: f32, pan_y: f32) {
        let t = Transform { zoom, pan_x, pan_y };
        let p = Point::new(123.5, 678.25);
        let back = t.to_image(t.to_screen(p));
        assert!(approx(back.x, p.x) && approx(back.y, p.y));
    }

    #[test]
    fn zoom_pivot_stays_fixed() {
        let mut t = Transform {
            zoom: 1.5,
            pan_x: 30.0,
            pan_y: -10.0,
        };
        let pivot = Point::new(400.0, 250.0);
        let before = t.to_image(pivot);
        t.zoom_by(1.1, pivot);
        let after = t.to_image(pivot);
        assert!(approx(before.x, after.x) && approx(before.y, after.y));
    }

    #[test]
    fn zoom_clamps_to_bounds() {
        let mut t = Transform::default();
        for _ in 0..200 {
            t.zoom_by(1.2, Point::default());
        }
        assert_eq!(t.zoom, MAX_ZOOM);
        for _ in 0..400 {
            t.zoom_by(1.0 / 1.2, Point::default());
        }
        assert_eq!(t.zoom, MIN_ZOOM);
    }

    #[test]
    fn fit_preserves_aspect_and_centers() {
        // Wide viewport, tall rect: height is the binding dimension.
        let t = Transform::fit(800.0, 600.0, Rect::new(100.0, 200.0, 100.0, 300.0));
        assert!(approx(t.zoom, 2.0));
        // Rect center maps to viewport center.
        let c = t.to_screen(Point::new(150.0, 350.0));
        assert!(approx(c.x, 400.0) && approx(c.y, 300.0));
    }

    #[test]
    fn fit_degenerate_rect_is_identity() {
        let t = Transform::fit(800.0, 600.0, Rect::ZERO);
        assert_eq!(t, Transform::default());
    }

    #[test]
    fn rect_from_corners_normalizes() {
        let r = Rect::from_corners(Point::new(50.0, 10.0), Point::new(20.0, 40.0));
        assert_eq!(r, Rect::new(20.0, 10.0, 30.0, 30.0));
    }

    #[test]
    fn contains_is_edge_inclusive_and_rejects_empty() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(30.0, 30.0)));
        assert!(!r.contains(Point::new(31.0, 20.0)));
        assert!(!Rect::ZERO.contains(Point::new(0.0, 0.0)));
    }
}
