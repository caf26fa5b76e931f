use glam::{Mat4, Vec3, Vec4};

use crate::coords::{Vec2, Viewport};

use super::CameraError;

/// Projection + view matrices for the canvas.
///
/// Both matrices are fixed at construction; interaction never mutates them.
/// The default setup frames the ~100-unit canvas cube: an orthographic
/// projection over (-10, 110) on every axis, viewed from `(0, 0, 100)`
/// looking at the origin with +Y up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    projection: Mat4,
    view: Mat4,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            projection: Mat4::orthographic_rh_gl(-10.0, 110.0, -10.0, 110.0, -10.0, 110.0),
            view: Mat4::look_at_rh(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO, Vec3::Y),
        }
    }

    /// Creates a camera from explicit matrices.
    pub fn from_matrices(projection: Mat4, view: Mat4) -> Self {
        Self { projection, view }
    }

    /// Combined `projection * view` matrix, as uploaded to shaders.
    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Maps a window pixel onto the world-space canvas plane.
    ///
    /// The pixel is first converted to normalized device coordinates
    /// (`xndc = 2x/w - 1`, `yndc = 1 - 2y/h`; the Y flip accounts for the
    /// top-left pixel origin), then transformed by the inverse of
    /// `projection * view` at depth 0.
    ///
    /// The viewport is validated before the divide, and the combined matrix
    /// before inversion; see [`CameraError`].
    pub fn unproject(&self, px: f32, py: f32, viewport: Viewport) -> Result<Vec2, CameraError> {
        if !viewport.is_valid() {
            return Err(CameraError::EmptyViewport);
        }

        let pv = self.view_projection();
        if pv.determinant().abs() <= f32::EPSILON {
            return Err(CameraError::Singular);
        }

        let xndc = 2.0 * px / viewport.width - 1.0;
        let yndc = 1.0 - 2.0 * py / viewport.height;

        let world = pv.inverse() * Vec4::new(xndc, yndc, 0.0, 1.0);
        Ok(Vec2::new(world.x, world.y))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    /// Camera whose unprojection maps pixel (x, y) in a 100x100 window to
    /// world (x, 100 - y): an orthographic view of (0, 100) on both axes
    /// with an identity view.
    fn unit_camera() -> Camera {
        Camera::from_matrices(
            Mat4::orthographic_rh_gl(0.0, 100.0, 0.0, 100.0, -1.0, 1.0),
            Mat4::IDENTITY,
        )
    }

    fn vp(w: f32, h: f32) -> Viewport {
        Viewport::new(w, h)
    }

    // ── unproject ─────────────────────────────────────────────────────────

    #[test]
    fn unproject_center_of_unit_camera() {
        let p = unit_camera().unproject(50.0, 50.0, vp(100.0, 100.0)).unwrap();
        assert!((p.x - 50.0).abs() < EPS);
        assert!((p.y - 50.0).abs() < EPS);
    }

    #[test]
    fn unproject_flips_pixel_y() {
        // Pixel y = 0 is the top of the window, which is world y = 100 here.
        let p = unit_camera().unproject(0.0, 0.0, vp(100.0, 100.0)).unwrap();
        assert!((p.x - 0.0).abs() < EPS);
        assert!((p.y - 100.0).abs() < EPS);
    }

    #[test]
    fn unproject_default_camera_corners() {
        // The default projection spans (-10, 110) on both axes.
        let cam = Camera::new();
        let top_left = cam.unproject(0.0, 0.0, vp(800.0, 600.0)).unwrap();
        assert!((top_left.x - -10.0).abs() < EPS);
        assert!((top_left.y - 110.0).abs() < EPS);

        let bottom_right = cam.unproject(800.0, 600.0, vp(800.0, 600.0)).unwrap();
        assert!((bottom_right.x - 110.0).abs() < EPS);
        assert!((bottom_right.y - -10.0).abs() < EPS);
    }

    #[test]
    fn unproject_is_independent_of_window_size() {
        // The same relative pixel position lands on the same world point.
        let cam = Camera::new();
        let a = cam.unproject(200.0, 150.0, vp(800.0, 600.0)).unwrap();
        let b = cam.unproject(400.0, 300.0, vp(1600.0, 1200.0)).unwrap();
        assert!((a.x - b.x).abs() < EPS);
        assert!((a.y - b.y).abs() < EPS);
    }

    // ── errors ────────────────────────────────────────────────────────────

    #[test]
    fn unproject_rejects_zero_viewport() {
        let cam = Camera::new();
        assert_eq!(
            cam.unproject(10.0, 10.0, vp(0.0, 600.0)),
            Err(CameraError::EmptyViewport)
        );
        assert_eq!(
            cam.unproject(10.0, 10.0, vp(800.0, 0.0)),
            Err(CameraError::EmptyViewport)
        );
    }

    #[test]
    fn unproject_rejects_singular_matrix() {
        let cam = Camera::from_matrices(Mat4::ZERO, Mat4::IDENTITY);
        assert_eq!(
            cam.unproject(10.0, 10.0, vp(100.0, 100.0)),
            Err(CameraError::Singular)
        );
    }
}
