//! Interactive canvas demo.
//!
//! Builds a small scene — colored axis lines, a white background canvas, and
//! two textured frames — and runs the windowed event loop. Frames are
//! selected with the left mouse button, moved from their interior, and
//! resized from their edges. Space pauses scene updates, Escape quits.

use std::time::{Duration, Instant};

use anyhow::Result;
use winit::dpi::LogicalSize;

use maquette_canvas::{CanvasScene, Frame, MeshShape, SelectionController};
use maquette_engine::camera::Camera;
use maquette_engine::core::{App, AppControl, FrameCtx};
use maquette_engine::device::GpuInit;
use maquette_engine::input::{
    InputEvent, Key, KeyState, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent,
};
use maquette_engine::logging::{LoggingConfig, init_logging};
use maquette_engine::paint::Color;
use maquette_engine::render::SceneRenderer;
use maquette_engine::scene::{DrawList, MeshTopology, TextureImage};
use maquette_engine::window::{Runtime, RuntimeConfig};

use maquette_engine::coords::{Rect, Vec2};

const TITLE_REFRESH: Duration = Duration::from_secs(1);

struct DemoApp {
    camera: Camera,
    scene: CanvasScene,
    controller: SelectionController,
    renderer: SceneRenderer,
    draw_list: DrawList,
    clear_color: Color,
    paused: bool,
    last_title_update: Option<Instant>,
}

impl DemoApp {
    fn new(scene: CanvasScene) -> Self {
        Self {
            camera: Camera::new(),
            scene,
            controller: SelectionController::new(),
            renderer: SceneRenderer::new(),
            draw_list: DrawList::new(),
            clear_color: Color::rgb(0.5, 0.5, 0.5),
            paused: false,
            last_title_update: None,
        }
    }

    fn handle_input(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let viewport = ctx.window.viewport();

        for ev in &ctx.input_frame.events {
            match ev {
                InputEvent::PointerButton(PointerButtonEvent {
                    button: MouseButton::Left,
                    state: MouseButtonState::Pressed,
                    x,
                    y,
                    ..
                }) => {
                    self.controller
                        .on_pointer_down(&self.scene, &self.camera, viewport, *x, *y);
                }

                InputEvent::PointerButton(PointerButtonEvent {
                    button: MouseButton::Left,
                    state: MouseButtonState::Released,
                    ..
                }) => {
                    self.controller.on_pointer_up();
                }

                InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                    let icon = self.controller.on_pointer_move(
                        &mut self.scene,
                        &self.camera,
                        viewport,
                        *x,
                        *y,
                    );
                    ctx.window.set_cursor(icon);
                }

                InputEvent::Key {
                    key: Key::Escape,
                    state: KeyState::Pressed,
                    ..
                } => {
                    log::info!("escape pressed, exiting");
                    return AppControl::Exit;
                }

                InputEvent::Key {
                    key: Key::Space,
                    state: KeyState::Pressed,
                    repeat: false,
                    ..
                } => {
                    self.paused = !self.paused;
                    log::info!("{}", if self.paused { "paused" } else { "resumed" });
                }

                _ => {}
            }
        }

        AppControl::Continue
    }

    fn refresh_title(&mut self, ctx: &FrameCtx<'_, '_>) {
        let due = self
            .last_title_update
            .is_none_or(|last| ctx.time.now.saturating_duration_since(last) >= TITLE_REFRESH);
        if !due {
            return;
        }

        let paused = if self.paused { "  [paused]" } else { "" };
        ctx.window
            .set_title(&format!("maquette  ·  {:.1} fps{paused}", ctx.time.fps));
        self.last_title_update = Some(ctx.time.now);
    }
}

impl App for DemoApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.handle_input(ctx) == AppControl::Exit {
            return AppControl::Exit;
        }

        self.refresh_title(ctx);

        // While paused the previous draw list keeps redrawing as-is.
        if !self.paused {
            self.draw_list.clear();
            self.scene.emit(&mut self.draw_list);
            self.controller.emit_overlay(&self.scene, &mut self.draw_list);
        }

        let camera = &self.camera;
        let renderer = &mut self.renderer;
        let draw_list = &mut self.draw_list;

        ctx.render(self.clear_color, |rctx, target| {
            renderer.render(rctx, target, camera, draw_list);
        })
    }
}

/// Six-vertex axis cross from the original demo: red X, green Y, blue Z.
fn axis_lines() -> MeshShape {
    let mut axis = MeshShape::new(MeshTopology::Lines);
    axis.set_vertices(vec![
        [0.0, 50.0, 0.0],
        [100.0, 50.0, 0.0],
        [50.0, 0.0, 0.0],
        [50.0, 100.0, 0.0],
        [0.0, 0.0, 0.0],
        [0.0, 0.0, 100.0],
    ]);
    axis.set_colors(vec![
        Color::new(1.0, 0.0, 0.0, 0.5),
        Color::new(1.0, 0.0, 0.0, 0.5),
        Color::new(0.0, 1.0, 0.0, 0.5),
        Color::new(0.0, 1.0, 0.0, 0.5),
        Color::new(0.0, 0.8, 1.0, 0.5),
        Color::new(0.0, 0.8, 1.0, 0.5),
    ]);
    axis
}

/// 3x2 test card with one saturated color per texel.
fn test_card() -> TextureImage {
    #[rustfmt::skip]
    let pixels = vec![
        0, 0, 255, 255,    0, 255, 0, 255,      0, 255, 255, 255,
        255, 0, 0, 255,    255, 255, 255, 255,  255, 255, 0, 255,
    ];
    TextureImage::from_rgba8(3, 2, pixels)
}

fn build_scene() -> Result<CanvasScene> {
    let mut scene = CanvasScene::new();

    scene.insert(axis_lines());

    // White background canvas, below every pickable layer.
    let canvas_pixels = vec![255u8; 2 * 2 * 4];
    let mut canvas = Frame::new(
        Rect::new(0.0, 0.0, 100.0, 100.0),
        TextureImage::from_rgba8(2, 2, canvas_pixels),
    );
    canvas.set_layer(-1);
    scene.insert(canvas);

    let card = test_card();

    let mut f1 = Frame::new(Rect::new(25.0, 25.0, 75.0, 50.0), card.clone());
    f1.set_layer(100);
    f1.resize(Vec2::new(50.0, 50.0), Vec2::new(75.0, 75.0))?;
    scene.insert(f1);

    let mut f2 = Frame::new(Rect::new(0.0, 0.0, 50.0, 50.0), card);
    f2.set_layer(1);
    f2.resize(Vec2::new(25.0, 25.0), Vec2::new(50.0, 50.0))?;
    scene.insert(f2);

    Ok(scene)
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let scene = build_scene()?;
    let app = DemoApp::new(scene);

    Runtime::run(
        RuntimeConfig {
            title: "maquette".to_string(),
            initial_size: LogicalSize::new(1024.0, 1024.0),
        },
        GpuInit::default(),
        app,
    )
}
