//! Rendering-surface geometry and coordinate normalization.
//!
//! The controller sees the remote screen as a video element of arbitrary size.
//! Pixel positions on that element are meaningless to the remote device, so
//! every position is expressed as a fraction of the surface's width and height
//! before it goes on the wire.
//!
//! # Clamping law
//!
//! Every [`NormalizedPoint`] satisfies `0.0 <= x <= 1.0` and `0.0 <= y <= 1.0`.
//! Raw positions outside the surface clamp to the nearest edge rather than
//! being rejected, so dragging past the video border keeps the remote pointer
//! pinned to the border.

/// Client-space bounds of the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceBounds {
    /// X of the surface's left edge in client coordinates.
    pub left: f64,
    /// Y of the surface's top edge in client coordinates.
    pub top: f64,
    /// Width in client pixels.
    pub width: f64,
    /// Height in client pixels.
    pub height: f64,
}

impl SurfaceBounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Returns `true` if the surface has a positive, finite area.
    ///
    /// A collapsed or hidden surface reports zero width or height; such a
    /// surface cannot be used as a divisor.
    pub fn is_usable(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Converts a raw client position into unit-square coordinates.
    ///
    /// Returns `None` when the surface is not usable or the position is not a
    /// number; the caller drops the event in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rc_core::SurfaceBounds;
    ///
    /// let bounds = SurfaceBounds::new(100.0, 50.0, 400.0, 300.0);
    /// let p = bounds.normalize(300.0, 200.0).unwrap();
    /// assert_eq!((p.x(), p.y()), (0.5, 0.5));
    /// ```
    pub fn normalize(&self, client_x: f64, client_y: f64) -> Option<NormalizedPoint> {
        if !self.is_usable() {
            return None;
        }
        let x = (client_x - self.left) / self.width;
        let y = (client_y - self.top) / self.height;
        if x.is_nan() || y.is_nan() {
            return None;
        }
        Some(NormalizedPoint::clamped(x, y))
    }
}

/// A position expressed as a fraction of the surface's width and height.
///
/// Construction goes through [`NormalizedPoint::new`] (validating) or
/// [`NormalizedPoint::clamped`] (saturating), so an out-of-range point cannot
/// exist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPoint {
    x: f64,
    y: f64,
}

impl NormalizedPoint {
    /// The top-left corner.
    pub const ORIGIN: NormalizedPoint = NormalizedPoint { x: 0.0, y: 0.0 };

    /// Returns a point if both coordinates already lie in `[0, 1]`.
    pub fn new(x: f64, y: f64) -> Option<Self> {
        let in_range = |v: f64| (0.0..=1.0).contains(&v);
        (in_range(x) && in_range(y)).then_some(Self { x, y })
    }

    /// Clamps both coordinates into `[0, 1]`.
    ///
    /// `NaN` has no meaningful nearest edge and maps to `0.0`.
    pub fn clamped(x: f64, y: f64) -> Self {
        let clamp = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self {
            x: clamp(x),
            y: clamp(y),
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> SurfaceBounds {
        SurfaceBounds::new(100.0, 50.0, 400.0, 300.0)
    }

    #[test]
    fn test_normalize_center_of_surface() {
        // Arrange / Act
        let p = bounds().normalize(300.0, 200.0).expect("usable surface");

        // Assert
        assert_eq!(p.x(), 0.5);
        assert_eq!(p.y(), 0.5);
    }

    #[test]
    fn test_normalize_outside_left_edge_clamps_to_zero() {
        let p = bounds().normalize(50.0, 50.0).unwrap();
        assert_eq!((p.x(), p.y()), (0.0, 0.0));
    }

    #[test]
    fn test_normalize_beyond_bottom_right_clamps_to_one() {
        let p = bounds().normalize(10_000.0, 10_000.0).unwrap();
        assert_eq!((p.x(), p.y()), (1.0, 1.0));
    }

    #[test]
    fn test_normalize_surface_corners_are_inclusive() {
        let b = bounds();
        let top_left = b.normalize(100.0, 50.0).unwrap();
        let bottom_right = b.normalize(500.0, 350.0).unwrap();
        assert_eq!((top_left.x(), top_left.y()), (0.0, 0.0));
        assert_eq!((bottom_right.x(), bottom_right.y()), (1.0, 1.0));
    }

    #[test]
    fn test_zero_width_surface_drops_event() {
        let b = SurfaceBounds::new(0.0, 0.0, 0.0, 300.0);
        assert!(!b.is_usable());
        assert!(b.normalize(10.0, 10.0).is_none());
    }

    #[test]
    fn test_zero_height_surface_drops_event() {
        let b = SurfaceBounds::new(0.0, 0.0, 400.0, 0.0);
        assert!(b.normalize(10.0, 10.0).is_none());
    }

    #[test]
    fn test_negative_dimensions_are_not_usable() {
        let b = SurfaceBounds::new(0.0, 0.0, -400.0, 300.0);
        assert!(b.normalize(10.0, 10.0).is_none());
    }

    #[test]
    fn test_nan_position_is_dropped() {
        assert!(bounds().normalize(f64::NAN, 10.0).is_none());
    }

    #[test]
    fn test_infinite_position_clamps() {
        let p = bounds().normalize(f64::INFINITY, f64::NEG_INFINITY).unwrap();
        assert_eq!((p.x(), p.y()), (1.0, 0.0));
    }

    #[test]
    fn test_clamping_law_holds_across_a_grid_of_raw_positions() {
        // Walk a grid that extends well beyond the surface on every side.
        let b = bounds();
        let mut raw_x = -1_000.0;
        while raw_x <= 1_600.0 {
            let mut raw_y = -1_000.0;
            while raw_y <= 1_400.0 {
                let p = b.normalize(raw_x, raw_y).expect("finite input on usable surface");
                assert!((0.0..=1.0).contains(&p.x()), "x out of range for ({raw_x}, {raw_y})");
                assert!((0.0..=1.0).contains(&p.y()), "y out of range for ({raw_x}, {raw_y})");
                raw_y += 37.5;
            }
            raw_x += 41.25;
        }
    }

    #[test]
    fn test_normalized_point_new_rejects_out_of_range() {
        assert!(NormalizedPoint::new(1.0, 0.0).is_some());
        assert!(NormalizedPoint::new(1.01, 0.0).is_none());
        assert!(NormalizedPoint::new(0.5, -0.1).is_none());
        assert!(NormalizedPoint::new(f64::NAN, 0.5).is_none());
    }

    #[test]
    fn test_clamped_maps_nan_to_zero() {
        let p = NormalizedPoint::clamped(f64::NAN, 2.0);
        assert_eq!((p.x(), p.y()), (0.0, 1.0));
    }
}
