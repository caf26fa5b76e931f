use glam::{Mat4, Vec3};

use maquette_engine::coords::{Rect, Vec2};
use maquette_engine::scene::{TextureImage, TexturedQuadCmd};

use crate::error::FrameError;

/// World-space z offset per layer unit.
///
/// Stacked frames are separated by this step so their transforms never end up
/// coplanar.
pub const LAYER_DEPTH_STEP: f32 = 0.1;

/// Hit-test tolerance band around frame edges, in world units.
///
/// The vertical band is scaled by the frame's aspect ratio, so the band is
/// visually symmetric on non-square frames.
const HIT_MARGIN: f32 = 0.5;

/// Classification of a world point relative to a frame's bounds.
///
/// Drives both the cursor icon and the drag mode picked on pointer-down:
/// the interior moves, the edges resize, the exterior deselects.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CursorZone {
    Outside,
    Interior,
    EdgeBottom,
    EdgeLeft,
    EdgeTop,
    EdgeRight,
}

/// A textured, axis-aligned rectangular widget with a depth layer.
///
/// The model transform is kept deterministically derived from the extent and
/// layer: `translate(x0, y0, 0) * scale(w, h, 1) * translate(0, 0, 0.1*layer)`.
/// Interactive mutation updates both the extent and the transform
/// incrementally; [`set_extent`](Frame::set_extent) rebuilds from scratch.
#[derive(Debug, Clone)]
pub struct Frame {
    bounds: Rect,
    layer: i32,
    model: Mat4,
    image: TextureImage,
}

impl Frame {
    /// Creates a frame covering `bounds` at layer 0 with an image payload.
    pub fn new(bounds: Rect, image: TextureImage) -> Self {
        let model = Mat4::from_translation(Vec3::new(bounds.min.x, bounds.min.y, 0.0))
            * Mat4::from_scale(Vec3::new(bounds.width(), bounds.height(), 1.0));

        Self {
            bounds,
            layer: 0,
            model,
            image,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    pub fn layer(&self) -> i32 {
        self.layer
    }

    #[inline]
    pub fn model(&self) -> Mat4 {
        self.model
    }

    #[inline]
    pub fn image(&self) -> &TextureImage {
        &self.image
    }

    /// Draw command for the external rasterizer.
    pub fn to_draw_cmd(&self) -> TexturedQuadCmd {
        TexturedQuadCmd {
            model: self.model,
            image: self.image.clone(),
        }
    }

    /// Strict interior containment of a world point.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        self.bounds.contains(p)
    }

    /// Classifies a world point against the interior / edge-band / exterior
    /// regions.
    ///
    /// The classification order matters: interior first, then the definite
    /// exterior, then the four edge bands bottom / left / top / right.
    pub fn cursor_zone(&self, p: Vec2) -> CursorZone {
        let Rect { min, max } = self.bounds;
        let d = HIT_MARGIN;
        let ar = self.bounds.width() / self.bounds.height();

        if p.x > min.x + d && p.x < max.x - d && p.y > min.y + d * ar && p.y < max.y - d * ar {
            CursorZone::Interior
        } else if p.x < min.x - d || p.x > max.x + d || p.y < min.y - d * ar || p.y > max.y + d * ar
        {
            CursorZone::Outside
        } else if p.y > min.y - d * ar && p.y < min.y + d * ar {
            CursorZone::EdgeBottom
        } else if p.x > min.x - d && p.x < min.x + d {
            CursorZone::EdgeLeft
        } else if p.y > max.y - d * ar && p.y < max.y + d * ar {
            CursorZone::EdgeTop
        } else if p.x > max.x - d && p.x < max.x + d {
            CursorZone::EdgeRight
        } else {
            CursorZone::Outside
        }
    }

    /// Translates the frame by the world-space delta `to - from`.
    ///
    /// Width and height are preserved exactly. The transform carries the
    /// extent scale, so the delta is divided back out before post-multiplying.
    pub fn translate(&mut self, from: Vec2, to: Vec2) {
        let dp = to - from;
        let w = self.bounds.width();
        let h = self.bounds.height();

        self.model = self.model * Mat4::from_translation(Vec3::new(dp.x / w, dp.y / h, 0.0));
        self.bounds = self.bounds.translate(dp);
    }

    /// Resizes by dragging the far corner: the origin corner stays fixed and
    /// `(x1, y1)` shifts by `to - from`.
    ///
    /// Fails with [`FrameError::DegenerateAnchor`] when the drag starts
    /// exactly on the origin corner in either axis, which would make the
    /// scale factor divide by zero. No minimum size is enforced; dragging
    /// past the origin inverts the extent.
    pub fn resize(&mut self, from: Vec2, to: Vec2) -> Result<(), FrameError> {
        let origin = self.bounds.min;
        if from.x == origin.x || from.y == origin.y {
            return Err(FrameError::DegenerateAnchor);
        }

        let sx = (to.x - origin.x) / (from.x - origin.x);
        let sy = (to.y - origin.y) / (from.y - origin.y);

        self.model = self.model * Mat4::from_scale(Vec3::new(sx, sy, 1.0));
        self.bounds.max = self.bounds.max + (to - from);
        Ok(())
    }

    /// Moves the frame to depth layer `l`.
    ///
    /// The transform shifts by `0.1 * (l - current)` along z; consecutive
    /// layer changes compose to the same offset as a single direct change.
    pub fn set_layer(&mut self, l: i32) {
        let dz = LAYER_DEPTH_STEP * (l - self.layer) as f32;
        self.model = self.model * Mat4::from_translation(Vec3::new(0.0, 0.0, dz));
        self.layer = l;
    }

    /// Replaces the extent and rebuilds the transform from scratch.
    ///
    /// This is the safe, idempotent alternative to incremental
    /// [`resize`](Frame::resize): the current layer's depth offset is
    /// reapplied on top of a fresh translate + scale.
    pub fn set_extent(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.model = Mat4::from_translation(Vec3::new(bounds.min.x, bounds.min.y, 0.0))
            * Mat4::from_scale(Vec3::new(bounds.width(), bounds.height(), 1.0))
            * Mat4::from_translation(Vec3::new(0.0, 0.0, LAYER_DEPTH_STEP * self.layer as f32));
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    const EPS: f32 = 1e-4;

    fn image() -> TextureImage {
        TextureImage::from_rgba8(1, 1, vec![255; 4])
    }

    fn frame(x0: f32, y0: f32, x1: f32, y1: f32) -> Frame {
        Frame::new(Rect::new(x0, y0, x1, y1), image())
    }

    fn mat_close(a: Mat4, b: Mat4) -> bool {
        a.to_cols_array()
            .iter()
            .zip(b.to_cols_array().iter())
            .all(|(x, y)| (x - y).abs() < EPS)
    }

    // ── transform derivation ──────────────────────────────────────────────

    #[test]
    fn model_maps_unit_square_to_bounds() {
        let f = frame(25.0, 25.0, 75.0, 50.0);
        let bl = f.model() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let tr = f.model() * Vec4::new(1.0, 1.0, 0.0, 1.0);

        assert!((bl.x - 25.0).abs() < EPS && (bl.y - 25.0).abs() < EPS);
        assert!((tr.x - 75.0).abs() < EPS && (tr.y - 50.0).abs() < EPS);
    }

    #[test]
    fn set_layer_offsets_depth() {
        let mut f = frame(0.0, 0.0, 10.0, 10.0);
        f.set_layer(5);
        let p = f.model() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((p.z - 0.5).abs() < EPS);
    }

    #[test]
    fn layer_offsets_compose() {
        // setLayer(l1) then setLayer(l2) == setLayer(l2) directly.
        let mut a = frame(0.0, 0.0, 10.0, 10.0);
        a.set_layer(3);
        a.set_layer(7);

        let mut b = frame(0.0, 0.0, 10.0, 10.0);
        b.set_layer(7);

        assert!(mat_close(a.model(), b.model()));
        assert_eq!(a.layer(), 7);
    }

    #[test]
    fn set_extent_is_idempotent() {
        let mut a = frame(0.0, 0.0, 10.0, 10.0);
        a.set_layer(2);
        a.set_extent(Rect::new(5.0, 5.0, 20.0, 15.0));

        let once = a.model();
        a.set_extent(Rect::new(5.0, 5.0, 20.0, 15.0));

        assert!(mat_close(a.model(), once));
        assert_eq!(a.bounds(), Rect::new(5.0, 5.0, 20.0, 15.0));
    }

    #[test]
    fn set_extent_reapplies_layer_offset() {
        let mut f = frame(0.0, 0.0, 10.0, 10.0);
        f.set_layer(4);
        f.set_extent(Rect::new(1.0, 1.0, 5.0, 5.0));

        let p = f.model() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((p.z - 0.4).abs() < EPS);
    }

    // ── translate ─────────────────────────────────────────────────────────

    #[test]
    fn translate_preserves_size() {
        let mut f = frame(25.0, 25.0, 75.0, 50.0);
        f.translate(Vec2::new(30.0, 30.0), Vec2::new(13.5, -2.25));

        assert!((f.bounds().width() - 50.0).abs() < EPS);
        assert!((f.bounds().height() - 25.0).abs() < EPS);
    }

    #[test]
    fn translate_moves_bounds_and_transform_together() {
        let mut f = frame(0.0, 0.0, 10.0, 10.0);
        f.translate(Vec2::new(2.0, 2.0), Vec2::new(7.0, 4.0));

        assert_eq!(f.bounds(), Rect::new(5.0, 2.0, 15.0, 12.0));

        // The transform's image of the unit square tracks the bounds.
        let bl = f.model() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((bl.x - 5.0).abs() < EPS && (bl.y - 2.0).abs() < EPS);
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_shifts_far_corner_only() {
        let mut f = frame(0.0, 0.0, 100.0, 100.0);
        f.resize(Vec2::new(100.0, 100.0), Vec2::new(150.0, 150.0)).unwrap();

        assert_eq!(f.bounds(), Rect::new(0.0, 0.0, 150.0, 150.0));
        assert!((f.bounds().width() - 150.0).abs() < EPS);
    }

    #[test]
    fn resize_scales_transform() {
        let mut f = frame(0.0, 0.0, 100.0, 100.0);
        f.resize(Vec2::new(100.0, 100.0), Vec2::new(150.0, 150.0)).unwrap();

        let tr = f.model() * Vec4::new(1.0, 1.0, 0.0, 1.0);
        assert!((tr.x - 150.0).abs() < EPS && (tr.y - 150.0).abs() < EPS);
    }

    #[test]
    fn resize_rejects_degenerate_anchor() {
        let mut f = frame(0.0, 0.0, 100.0, 100.0);
        let before = f.bounds();

        assert_eq!(
            f.resize(Vec2::new(0.0, 50.0), Vec2::new(10.0, 60.0)),
            Err(FrameError::DegenerateAnchor)
        );
        assert_eq!(
            f.resize(Vec2::new(50.0, 0.0), Vec2::new(60.0, 10.0)),
            Err(FrameError::DegenerateAnchor)
        );

        // Rejected resizes leave the frame untouched.
        assert_eq!(f.bounds(), before);
    }

    #[test]
    fn resize_can_invert_the_extent() {
        // No minimum-size clamp: dragging far past the origin flips x1 below
        // x0 and the extent reports a negative width.
        let mut f = frame(0.0, 0.0, 10.0, 10.0);
        f.resize(Vec2::new(9.0, 9.0), Vec2::new(-15.0, 5.0)).unwrap();
        assert!(f.bounds().width() < 0.0);
    }

    // ── hit testing ───────────────────────────────────────────────────────

    #[test]
    fn contains_is_strict_interior() {
        let f = frame(0.0, 0.0, 100.0, 100.0);
        assert!(f.contains(Vec2::new(50.0, 50.0)));
        assert!(!f.contains(Vec2::new(150.0, 150.0)));
        assert!(!f.contains(Vec2::new(0.0, 50.0)));
    }

    #[test]
    fn cursor_zone_square_frame() {
        // d = 0.5 and aspect ratio 1 on a 100x100 frame.
        let f = frame(0.0, 0.0, 100.0, 100.0);

        assert_eq!(f.cursor_zone(Vec2::new(50.0, 50.0)), CursorZone::Interior);
        assert_eq!(f.cursor_zone(Vec2::new(200.0, 200.0)), CursorZone::Outside);
        assert_eq!(f.cursor_zone(Vec2::new(0.3, 50.0)), CursorZone::EdgeLeft);
        assert_eq!(f.cursor_zone(Vec2::new(99.8, 50.0)), CursorZone::EdgeRight);
        assert_eq!(f.cursor_zone(Vec2::new(50.0, 0.3)), CursorZone::EdgeBottom);
        assert_eq!(f.cursor_zone(Vec2::new(50.0, 99.8)), CursorZone::EdgeTop);
    }

    #[test]
    fn cursor_zone_corner_prefers_bottom_edge() {
        // The bottom band is classified before left, so a corner point in
        // both bands reports EdgeBottom.
        let f = frame(0.0, 0.0, 100.0, 100.0);
        assert_eq!(f.cursor_zone(Vec2::new(0.2, 0.2)), CursorZone::EdgeBottom);
    }

    #[test]
    fn cursor_zone_scales_vertical_band_by_aspect_ratio() {
        // 100x10 frame: ar = 10, so the vertical band is d*ar = 5 wide.
        let f = frame(0.0, 0.0, 100.0, 10.0);
        assert_eq!(f.cursor_zone(Vec2::new(50.0, 4.0)), CursorZone::EdgeBottom);
        assert_eq!(f.cursor_zone(Vec2::new(50.0, 16.0)), CursorZone::Outside);
    }
}
