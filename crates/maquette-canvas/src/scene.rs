use slab::Slab;

use maquette_engine::camera::Camera;
use maquette_engine::coords::{Vec2, Viewport};
use maquette_engine::scene::{DrawCmd, DrawList, ZIndex};

use crate::frame::Frame;
use crate::shape::Shape;

/// Stable handle to a shape owned by a [`CanvasScene`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ShapeId(usize);

/// Owned collection of shapes.
///
/// The scene exclusively owns every shape it is given; handles stay valid
/// until the shape is removed. Iteration order is slot order, which matches
/// insertion order as long as shapes are not removed and re-added — the
/// pick tie-break below relies on that ordering.
#[derive(Debug, Default)]
pub struct CanvasScene {
    shapes: Slab<Shape>,
}

impl CanvasScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of a shape and returns its handle.
    pub fn insert(&mut self, shape: impl Into<Shape>) -> ShapeId {
        ShapeId(self.shapes.insert(shape.into()))
    }

    /// Removes and returns a shape; `None` if the handle is stale.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        self.shapes.try_remove(id.0)
    }

    #[inline]
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.0)
    }

    #[inline]
    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(id.0)
    }

    /// The frame behind `id`, if the handle is live and the shape is one.
    #[inline]
    pub fn frame(&self, id: ShapeId) -> Option<&Frame> {
        self.get(id).and_then(Shape::as_frame)
    }

    #[inline]
    pub fn frame_mut(&mut self, id: ShapeId) -> Option<&mut Frame> {
        self.get_mut(id).and_then(Shape::as_frame_mut)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.shapes.iter().map(|(k, s)| (ShapeId(k), s))
    }

    /// Topmost-frame pick at a world point.
    ///
    /// Scans every frame containing the point and keeps the one with the
    /// greatest layer; on equal layers the first-scanned frame wins (strict
    /// `>`). Frames at layer 0 or below never pick — the background canvas
    /// lives there and stays unselectable. An empty scene returns `None`.
    pub fn pick(&self, world: Vec2) -> Option<ShapeId> {
        let mut best: Option<(ShapeId, i32)> = None;

        for (id, shape) in self.iter() {
            let Some(frame) = shape.as_frame() else {
                continue;
            };
            if frame.layer() <= 0 || !frame.contains(world) {
                continue;
            }
            if best.is_none_or(|(_, layer)| frame.layer() > layer) {
                best = Some((id, frame.layer()));
            }
        }

        best.map(|(id, _)| id)
    }

    /// [`pick`](CanvasScene::pick) at a window pixel, unprojected through
    /// `camera`. Unprojection failures (zero-area window) pick nothing.
    pub fn pick_pixel(
        &self,
        px: f32,
        py: f32,
        camera: &Camera,
        viewport: Viewport,
    ) -> Option<ShapeId> {
        match camera.unproject(px, py, viewport) {
            Ok(world) => self.pick(world),
            Err(err) => {
                log::debug!("pick skipped: {err}");
                None
            }
        }
    }

    /// Lowers every visible shape into the draw stream.
    ///
    /// Frames draw at their layer; meshes at their own z-index.
    pub fn emit(&self, out: &mut DrawList) {
        for (_, shape) in self.iter() {
            match shape {
                Shape::Mesh(mesh) => {
                    if mesh.visible() {
                        out.push(mesh.z_index(), DrawCmd::Mesh(mesh.to_draw_cmd()));
                    }
                }
                Shape::Frame(frame) => {
                    out.push(
                        ZIndex::new(frame.layer()),
                        DrawCmd::TexturedQuad(frame.to_draw_cmd()),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Mat4;

    use maquette_engine::coords::Rect;
    use maquette_engine::scene::TextureImage;

    use super::*;

    fn image() -> TextureImage {
        TextureImage::from_rgba8(1, 1, vec![255; 4])
    }

    fn frame_at(scene: &mut CanvasScene, rect: Rect, layer: i32) -> ShapeId {
        let mut f = Frame::new(rect, image());
        f.set_layer(layer);
        scene.insert(f)
    }

    /// Camera whose unprojection maps pixel (x, y) in a 100x100 window to
    /// world (x, 100 - y).
    fn unit_camera() -> Camera {
        Camera::from_matrices(
            Mat4::orthographic_rh_gl(0.0, 100.0, 0.0, 100.0, -1.0, 1.0),
            Mat4::IDENTITY,
        )
    }

    // ── pick ──────────────────────────────────────────────────────────────

    #[test]
    fn pick_on_empty_scene_is_none() {
        let scene = CanvasScene::new();
        assert_eq!(scene.pick(Vec2::new(50.0, 50.0)), None);
    }

    #[test]
    fn pick_hits_a_containing_frame() {
        let mut scene = CanvasScene::new();
        let id = frame_at(&mut scene, Rect::new(0.0, 0.0, 100.0, 100.0), 3);

        assert_eq!(scene.pick(Vec2::new(50.0, 50.0)), Some(id));
        assert_eq!(scene.pick(Vec2::new(150.0, 150.0)), None);
    }

    #[test]
    fn pick_returns_topmost_layer() {
        let mut scene = CanvasScene::new();
        let _low = frame_at(&mut scene, Rect::new(0.0, 0.0, 100.0, 100.0), 1);
        let high = frame_at(&mut scene, Rect::new(0.0, 0.0, 100.0, 100.0), 5);

        assert_eq!(scene.pick(Vec2::new(50.0, 50.0)), Some(high));
    }

    #[test]
    fn pick_only_considers_containing_frames() {
        // The highest layer in the scene does not contain the point; the
        // lower, containing frame must win.
        let mut scene = CanvasScene::new();
        let inside = frame_at(&mut scene, Rect::new(0.0, 0.0, 50.0, 50.0), 2);
        let _outside = frame_at(&mut scene, Rect::new(60.0, 60.0, 100.0, 100.0), 9);

        assert_eq!(scene.pick(Vec2::new(25.0, 25.0)), Some(inside));
    }

    #[test]
    fn pick_tie_breaks_to_first_inserted() {
        let mut scene = CanvasScene::new();
        let first = frame_at(&mut scene, Rect::new(0.0, 0.0, 100.0, 100.0), 4);
        let _second = frame_at(&mut scene, Rect::new(0.0, 0.0, 100.0, 100.0), 4);

        assert_eq!(scene.pick(Vec2::new(50.0, 50.0)), Some(first));
    }

    #[test]
    fn pick_ignores_background_layers() {
        let mut scene = CanvasScene::new();
        let _canvas = frame_at(&mut scene, Rect::new(0.0, 0.0, 100.0, 100.0), -1);
        let _zero = frame_at(&mut scene, Rect::new(0.0, 0.0, 100.0, 100.0), 0);

        assert_eq!(scene.pick(Vec2::new(50.0, 50.0)), None);
    }

    #[test]
    fn pick_pixel_unprojects_through_the_camera() {
        let mut scene = CanvasScene::new();
        let id = frame_at(&mut scene, Rect::new(0.0, 0.0, 100.0, 100.0), 3);
        let vp = Viewport::new(100.0, 100.0);

        assert_eq!(scene.pick_pixel(50.0, 50.0, &unit_camera(), vp), Some(id));
        // A zero-area window cannot pick.
        assert_eq!(
            scene.pick_pixel(50.0, 50.0, &unit_camera(), Viewport::new(0.0, 0.0)),
            None
        );
    }

    // ── emit ──────────────────────────────────────────────────────────────

    #[test]
    fn emit_orders_frames_by_layer() {
        let mut scene = CanvasScene::new();
        let _top = frame_at(&mut scene, Rect::new(0.0, 0.0, 10.0, 10.0), 100);
        let _canvas = frame_at(&mut scene, Rect::new(0.0, 0.0, 100.0, 100.0), -1);

        let mut list = DrawList::new();
        scene.emit(&mut list);

        // Canvas (layer -1) paints before the layer-100 frame.
        assert_eq!(list.indices_in_paint_order(), &[1, 0]);
    }
}
