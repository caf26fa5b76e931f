use crate::camera::Camera;
use crate::scene::{DrawCmd, DrawList};

use super::shapes::{MeshBatch, TexturedQuadBatch};
use super::{RenderCtx, RenderTarget};

/// Draws a full `DrawList` in back-to-front order.
///
/// Both batches are staged and uploaded first, then a single render pass
/// records every item in paint order, switching pipelines as the item kind
/// changes. One pass keeps layer ordering exact across mesh and quad items.
#[derive(Default)]
pub struct SceneRenderer {
    meshes: MeshBatch,
    quads: TexturedQuadBatch,
}

enum SequencedDraw {
    Mesh(usize),
    Quad(usize),
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders `draw_list` into `target` through `camera`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &Camera,
        draw_list: &mut DrawList,
    ) {
        let view_proj = camera.view_projection();

        self.meshes.begin();
        self.quads.begin();

        let mut sequence = Vec::with_capacity(draw_list.len());
        for item in draw_list.iter_in_paint_order() {
            match &item.cmd {
                DrawCmd::Mesh(cmd) => {
                    if let Some(i) = self.meshes.stage(cmd, view_proj) {
                        sequence.push(SequencedDraw::Mesh(i));
                    }
                }
                DrawCmd::TexturedQuad(cmd) => {
                    if let Some(i) = self.quads.stage(cmd, view_proj) {
                        sequence.push(SequencedDraw::Quad(i));
                    }
                }
            }
        }

        if sequence.is_empty() {
            return;
        }

        self.meshes.upload(ctx);
        self.quads.upload(ctx);

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("maquette scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for draw in &sequence {
            match draw {
                SequencedDraw::Mesh(i) => self.meshes.record(&mut rpass, *i),
                SequencedDraw::Quad(i) => self.quads.record(&mut rpass, *i),
            }
        }
    }
}
