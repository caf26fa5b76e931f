use maquette_engine::camera::Camera;
use maquette_engine::coords::Viewport;
use maquette_engine::paint::Color;
use maquette_engine::scene::{DrawCmd, DrawList, MeshCmd, MeshTopology, ZIndex};
use maquette_engine::window::CursorIcon;

use crate::frame::CursorZone;
use crate::scene::{CanvasScene, ShapeId};

/// Draw layer for the selection outline: above every frame.
const OUTLINE_Z: ZIndex = ZIndex::new(1000);

/// Outline color (dark teal, opaque).
const OUTLINE_COLOR: Color = Color::new(0.0, 0.3, 0.3, 1.0);

/// What a drag does to the targeted frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DragMode {
    Move,
    Resize,
}

/// Interaction state machine.
///
/// `Idle` — nothing selected. `Selected` — a frame is selected, no button
/// held. `Dragging` — the button went down on the selected frame's interior
/// (move) or edge band (resize) and pointer motion mutates it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum InteractionState {
    Idle,
    Selected(ShapeId),
    Dragging { target: ShapeId, mode: DragMode },
}

/// Pointer-driven selection / move / resize controller.
///
/// The controller owns all interaction state explicitly; it holds no
/// references into the scene and addresses frames by handle. Pointer events
/// arrive in pixel coordinates and are unprojected through the camera per
/// event, so window resizes between events are handled naturally.
#[derive(Debug)]
pub struct SelectionController {
    state: InteractionState,
    /// Pixel position of the previous pointer event; drags apply the world
    /// delta between consecutive events.
    last_pointer: Option<(f32, f32)>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self {
            state: InteractionState::Idle,
            last_pointer: None,
        }
    }

    #[inline]
    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// The selected frame, in any non-idle state.
    pub fn selected(&self) -> Option<ShapeId> {
        match self.state {
            InteractionState::Idle => None,
            InteractionState::Selected(id) => Some(id),
            InteractionState::Dragging { target, .. } => Some(target),
        }
    }

    /// Primary-button press at pixel `(x, y)`.
    ///
    /// Keeps the current selection when the press lands inside its hit zone
    /// (the resize band extends outside the frame, so a press there must not
    /// trigger a re-pick); otherwise re-picks the topmost frame under the
    /// cursor, deselecting when nothing is hit. The zone under the press
    /// chooses the drag mode.
    pub fn on_pointer_down(
        &mut self,
        scene: &CanvasScene,
        camera: &Camera,
        viewport: Viewport,
        x: f32,
        y: f32,
    ) {
        self.last_pointer = Some((x, y));

        let world = match camera.unproject(x, y, viewport) {
            Ok(p) => p,
            Err(err) => {
                log::warn!("pointer-down ignored: {err}");
                return;
            }
        };

        let kept = self.selected().filter(|&id| {
            scene
                .frame(id)
                .is_some_and(|f| f.cursor_zone(world) != CursorZone::Outside)
        });

        let target = kept.or_else(|| scene.pick(world));

        self.state = match target {
            None => InteractionState::Idle,
            Some(id) => match scene.frame(id).map(|f| f.cursor_zone(world)) {
                Some(CursorZone::Interior) => InteractionState::Dragging {
                    target: id,
                    mode: DragMode::Move,
                },
                Some(CursorZone::Outside) | None => InteractionState::Selected(id),
                Some(_) => InteractionState::Dragging {
                    target: id,
                    mode: DragMode::Resize,
                },
            },
        };
    }

    /// Pointer motion at pixel `(x, y)`, with or without the button held.
    ///
    /// While dragging, applies the world-space delta since the previous
    /// event to the target frame (move or resize); the change is kept
    /// incrementally, there is no rollback on release. Always returns the
    /// cursor icon for the current hover position.
    pub fn on_pointer_move(
        &mut self,
        scene: &mut CanvasScene,
        camera: &Camera,
        viewport: Viewport,
        x: f32,
        y: f32,
    ) -> CursorIcon {
        if let InteractionState::Dragging { target, mode } = self.state {
            if let Some((lx, ly)) = self.last_pointer {
                let from = camera.unproject(lx, ly, viewport);
                let to = camera.unproject(x, y, viewport);

                match (from, to) {
                    (Ok(from), Ok(to)) => {
                        if let Some(frame) = scene.frame_mut(target) {
                            match mode {
                                DragMode::Move => frame.translate(from, to),
                                DragMode::Resize => {
                                    if let Err(err) = frame.resize(from, to) {
                                        // Degenerate anchor: skip this delta,
                                        // keep dragging.
                                        log::warn!("resize skipped: {err}");
                                    }
                                }
                            }
                        }
                    }
                    (Err(err), _) | (_, Err(err)) => {
                        log::debug!("drag delta skipped: {err}");
                    }
                }
            }
        }

        self.last_pointer = Some((x, y));
        self.cursor_icon(scene, camera, viewport, x, y)
    }

    /// Primary-button release: a drag settles back into plain selection.
    pub fn on_pointer_up(&mut self) {
        if let InteractionState::Dragging { target, .. } = self.state {
            self.state = InteractionState::Selected(target);
        }
    }

    /// Cursor feedback for the current pointer position.
    ///
    /// Purely a function of the selected frame's cursor zone: crosshair over
    /// the interior, axis arrows over the edge bands, default otherwise.
    pub fn cursor_icon(
        &self,
        scene: &CanvasScene,
        camera: &Camera,
        viewport: Viewport,
        x: f32,
        y: f32,
    ) -> CursorIcon {
        let Some(frame) = self.selected().and_then(|id| scene.frame(id)) else {
            return CursorIcon::Default;
        };
        let Ok(world) = camera.unproject(x, y, viewport) else {
            return CursorIcon::Default;
        };

        match frame.cursor_zone(world) {
            CursorZone::Interior => CursorIcon::Crosshair,
            CursorZone::EdgeBottom | CursorZone::EdgeTop => CursorIcon::NsResize,
            CursorZone::EdgeLeft | CursorZone::EdgeRight => CursorIcon::EwResize,
            CursorZone::Outside => CursorIcon::Default,
        }
    }

    /// Pushes the selection outline for the selected frame, if any.
    ///
    /// The outline is a disposable overlay recomputed from the frame's
    /// current bounds every frame, so it tracks moves and resizes for free.
    pub fn emit_overlay(&self, scene: &CanvasScene, out: &mut DrawList) {
        let Some(frame) = self.selected().and_then(|id| scene.frame(id)) else {
            return;
        };

        let b = frame.bounds();
        let (x0, y0, x1, y1) = (b.min.x, b.min.y, b.max.x, b.max.y);

        // Four segments as a line list around the bounds.
        let vertices = vec![
            [x0, y0, 0.0], [x1, y0, 0.0],
            [x1, y0, 0.0], [x1, y1, 0.0],
            [x1, y1, 0.0], [x0, y1, 0.0],
            [x0, y1, 0.0], [x0, y0, 0.0],
        ];
        let colors = vec![OUTLINE_COLOR; vertices.len()];

        out.push(
            OUTLINE_Z,
            DrawCmd::Mesh(MeshCmd {
                topology: MeshTopology::Lines,
                vertices,
                colors,
                indices: None,
                model: glam::Mat4::IDENTITY,
            }),
        );
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use glam::Mat4;

    use maquette_engine::coords::Rect;
    use maquette_engine::scene::TextureImage;

    use crate::frame::Frame;

    use super::*;

    const VP: Viewport = Viewport::new(100.0, 100.0);

    // Drag deltas round-trip through NDC, so bounds land within float noise
    // of the target, not exactly on it.
    const EPS: f32 = 1e-3;

    fn rect_close(a: Rect, b: Rect) -> bool {
        (a.min.x - b.min.x).abs() < EPS
            && (a.min.y - b.min.y).abs() < EPS
            && (a.max.x - b.max.x).abs() < EPS
            && (a.max.y - b.max.y).abs() < EPS
    }

    /// Camera whose unprojection maps pixel (x, y) in a 100x100 window to
    /// world (x, 100 - y).
    fn unit_camera() -> Camera {
        Camera::from_matrices(
            Mat4::orthographic_rh_gl(0.0, 100.0, 0.0, 100.0, -1.0, 1.0),
            Mat4::IDENTITY,
        )
    }

    /// Pixel coordinates landing on world point (wx, wy) under `unit_camera`.
    fn pixel_at(wx: f32, wy: f32) -> (f32, f32) {
        (wx, 100.0 - wy)
    }

    fn scene_with_frame(rect: Rect, layer: i32) -> (CanvasScene, ShapeId) {
        let mut scene = CanvasScene::new();
        let mut f = Frame::new(rect, TextureImage::from_rgba8(1, 1, vec![255; 4]));
        f.set_layer(layer);
        let id = scene.insert(f);
        (scene, id)
    }

    fn press(c: &mut SelectionController, scene: &CanvasScene, wx: f32, wy: f32) {
        let (x, y) = pixel_at(wx, wy);
        c.on_pointer_down(scene, &unit_camera(), VP, x, y);
    }

    fn drag_to(c: &mut SelectionController, scene: &mut CanvasScene, wx: f32, wy: f32) {
        let (x, y) = pixel_at(wx, wy);
        c.on_pointer_move(scene, &unit_camera(), VP, x, y);
    }

    // ── selection transitions ─────────────────────────────────────────────

    #[test]
    fn press_on_interior_selects_and_starts_move() {
        let (scene, id) = scene_with_frame(Rect::new(10.0, 10.0, 60.0, 60.0), 1);
        let mut c = SelectionController::new();

        press(&mut c, &scene, 30.0, 30.0);

        assert_eq!(
            c.state(),
            InteractionState::Dragging { target: id, mode: DragMode::Move }
        );
    }

    #[test]
    fn press_on_edge_band_starts_resize() {
        let (scene, id) = scene_with_frame(Rect::new(10.0, 10.0, 60.0, 60.0), 1);
        let mut c = SelectionController::new();

        // Just inside the right edge band (d = 0.5).
        press(&mut c, &scene, 59.8, 30.0);

        assert_eq!(
            c.state(),
            InteractionState::Dragging { target: id, mode: DragMode::Resize }
        );
    }

    #[test]
    fn press_on_empty_space_deselects() {
        let (scene, _id) = scene_with_frame(Rect::new(10.0, 10.0, 60.0, 60.0), 1);
        let mut c = SelectionController::new();

        press(&mut c, &scene, 30.0, 30.0);
        c.on_pointer_up();
        press(&mut c, &scene, 90.0, 90.0);

        assert_eq!(c.state(), InteractionState::Idle);
    }

    #[test]
    fn press_keeps_selection_inside_resize_band_outside_frame() {
        // The edge band extends HIT_MARGIN outside the bounds; pressing
        // there must keep (and resize) the selected frame, not deselect.
        let (scene, id) = scene_with_frame(Rect::new(10.0, 10.0, 60.0, 60.0), 1);
        let mut c = SelectionController::new();

        press(&mut c, &scene, 30.0, 30.0);
        c.on_pointer_up();
        press(&mut c, &scene, 60.3, 30.0);

        assert_eq!(
            c.state(),
            InteractionState::Dragging { target: id, mode: DragMode::Resize }
        );
    }

    #[test]
    fn press_picks_topmost_of_overlapping_frames() {
        let mut scene = CanvasScene::new();
        let mut low = Frame::new(
            Rect::new(0.0, 0.0, 80.0, 80.0),
            TextureImage::from_rgba8(1, 1, vec![255; 4]),
        );
        low.set_layer(1);
        scene.insert(low);

        let mut high = Frame::new(
            Rect::new(0.0, 0.0, 80.0, 80.0),
            TextureImage::from_rgba8(1, 1, vec![255; 4]),
        );
        high.set_layer(5);
        let high_id = scene.insert(high);

        let mut c = SelectionController::new();
        press(&mut c, &scene, 40.0, 40.0);

        assert_eq!(c.selected(), Some(high_id));
    }

    #[test]
    fn release_settles_into_selected() {
        let (scene, id) = scene_with_frame(Rect::new(10.0, 10.0, 60.0, 60.0), 1);
        let mut c = SelectionController::new();

        press(&mut c, &scene, 30.0, 30.0);
        c.on_pointer_up();

        assert_eq!(c.state(), InteractionState::Selected(id));
    }

    // ── drag side effects ─────────────────────────────────────────────────

    #[test]
    fn move_drag_translates_the_frame() {
        let (mut scene, id) = scene_with_frame(Rect::new(10.0, 10.0, 60.0, 60.0), 1);
        let mut c = SelectionController::new();

        press(&mut c, &scene, 30.0, 30.0);
        drag_to(&mut c, &mut scene, 35.0, 40.0);

        let b = scene.frame(id).unwrap().bounds();
        assert!(rect_close(b, Rect::new(15.0, 20.0, 65.0, 70.0)));
        // Width and height survive the move.
        assert!((b.width() - 50.0).abs() < EPS);
        assert!((b.height() - 50.0).abs() < EPS);
    }

    #[test]
    fn resize_drag_moves_the_far_corner() {
        let (mut scene, id) = scene_with_frame(Rect::new(10.0, 10.0, 60.0, 60.0), 1);
        let mut c = SelectionController::new();

        press(&mut c, &scene, 59.8, 30.0);
        drag_to(&mut c, &mut scene, 69.8, 30.0);

        let b = scene.frame(id).unwrap().bounds();
        assert_eq!(b.min, maquette_engine::coords::Vec2::new(10.0, 10.0));
        assert!((b.max.x - 70.0).abs() < EPS);
    }

    #[test]
    fn incremental_drag_is_kept_on_release() {
        let (mut scene, id) = scene_with_frame(Rect::new(10.0, 10.0, 60.0, 60.0), 1);
        let mut c = SelectionController::new();

        press(&mut c, &scene, 30.0, 30.0);
        drag_to(&mut c, &mut scene, 40.0, 30.0);
        drag_to(&mut c, &mut scene, 50.0, 30.0);
        c.on_pointer_up();

        // Two +10 deltas applied incrementally, no rollback on release.
        assert!((scene.frame(id).unwrap().bounds().min.x - 30.0).abs() < EPS);
        assert_eq!(c.state(), InteractionState::Selected(id));
    }

    #[test]
    fn hover_without_drag_mutates_nothing() {
        let (mut scene, id) = scene_with_frame(Rect::new(10.0, 10.0, 60.0, 60.0), 1);
        let before = scene.frame(id).unwrap().bounds();

        let mut c = SelectionController::new();
        press(&mut c, &scene, 30.0, 30.0);
        c.on_pointer_up();
        drag_to(&mut c, &mut scene, 50.0, 50.0);

        assert_eq!(scene.frame(id).unwrap().bounds(), before);
    }

    // ── cursor feedback ───────────────────────────────────────────────────

    #[test]
    fn cursor_icon_tracks_zones_of_the_selection() {
        let (mut scene, _id) = scene_with_frame(Rect::new(10.0, 10.0, 60.0, 60.0), 1);
        let mut c = SelectionController::new();
        press(&mut c, &scene, 30.0, 30.0);
        c.on_pointer_up();

        let cam = unit_camera();
        let icon_at = |c: &mut SelectionController, scene: &mut CanvasScene, wx: f32, wy: f32| {
            let (x, y) = pixel_at(wx, wy);
            c.on_pointer_move(scene, &cam, VP, x, y)
        };

        assert_eq!(icon_at(&mut c, &mut scene, 30.0, 30.0), CursorIcon::Crosshair);
        assert_eq!(icon_at(&mut c, &mut scene, 30.0, 59.8), CursorIcon::NsResize);
        assert_eq!(icon_at(&mut c, &mut scene, 10.2, 30.0), CursorIcon::EwResize);
        assert_eq!(icon_at(&mut c, &mut scene, 90.0, 90.0), CursorIcon::Default);
    }

    #[test]
    fn cursor_icon_is_default_with_no_selection() {
        let (scene, _id) = scene_with_frame(Rect::new(10.0, 10.0, 60.0, 60.0), 1);
        let c = SelectionController::new();
        assert_eq!(
            c.cursor_icon(&scene, &unit_camera(), VP, 30.0, 30.0),
            CursorIcon::Default
        );
    }

    // ── overlay ───────────────────────────────────────────────────────────

    #[test]
    fn overlay_follows_the_selected_bounds() {
        let (mut scene, _id) = scene_with_frame(Rect::new(10.0, 10.0, 60.0, 60.0), 1);
        let mut c = SelectionController::new();

        press(&mut c, &scene, 30.0, 30.0);
        drag_to(&mut c, &mut scene, 35.0, 30.0);

        let mut list = DrawList::new();
        c.emit_overlay(&scene, &mut list);

        assert_eq!(list.len(), 1);
        let DrawCmd::Mesh(mesh) = &list.items()[0].cmd else {
            panic!("overlay must be a line mesh");
        };
        assert_eq!(mesh.topology, MeshTopology::Lines);
        // First vertex is the moved bottom-left corner.
        assert!((mesh.vertices[0][0] - 15.0).abs() < EPS);
        assert!((mesh.vertices[0][1] - 10.0).abs() < EPS);
    }

    #[test]
    fn overlay_is_empty_when_idle() {
        let (scene, _id) = scene_with_frame(Rect::new(10.0, 10.0, 60.0, 60.0), 1);
        let c = SelectionController::new();

        let mut list = DrawList::new();
        c.emit_overlay(&scene, &mut list);
        assert!(list.is_empty());
    }
}
