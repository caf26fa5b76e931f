use std::collections::HashMap;

use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::render::RenderCtx;
use crate::scene::{TextureId, TexturedQuadCmd};

use super::common::{
    alpha_blend, object_bind_group_layout, stage_object_uniform, QuadVertex, OBJECT_UBO_STRIDE,
    QUAD_INDICES, QUAD_VERTICES,
};

/// Batch for textured frame quads.
///
/// All quads share one unit-square vertex/index buffer; the per-draw MVP maps
/// it onto the frame's world rectangle. Texture payloads are uploaded once
/// per `TextureId` and cached with their bind groups.
#[derive(Default)]
pub struct TexturedQuadBatch {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    object_bgl: Option<wgpu::BindGroupLayout>,
    object_bind_group: Option<wgpu::BindGroup>,
    object_ubo: Option<wgpu::Buffer>,
    ubo_capacity: usize, // bytes

    texture_bgl: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,
    textures: HashMap<TextureId, wgpu::BindGroup>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    // CPU staging, rebuilt each frame.
    uniforms: Vec<u8>,
    draws: Vec<QuadDraw>,
    pending_uploads: Vec<TexturedQuadCmd>,
}

struct QuadDraw {
    texture: TextureId,
    ubo_offset: u32,
}

impl TexturedQuadBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards staged data from the previous frame.
    ///
    /// The texture cache is kept; payloads are immutable per `TextureId`.
    pub fn begin(&mut self) {
        self.uniforms.clear();
        self.draws.clear();
        self.pending_uploads.clear();
    }

    /// Stages one quad command; returns its draw index for `record`.
    pub fn stage(&mut self, cmd: &TexturedQuadCmd, view_proj: Mat4) -> Option<usize> {
        let id = cmd.image.id();
        if !self.textures.contains_key(&id) {
            self.pending_uploads.push(cmd.clone());
        }

        let ubo_offset = stage_object_uniform(&mut self.uniforms, view_proj * cmd.model);
        self.draws.push(QuadDraw {
            texture: id,
            ubo_offset,
        });
        Some(self.draws.len() - 1)
    }

    /// Creates/grows GPU resources, uploads staged uniforms and any textures
    /// seen for the first time.
    pub fn upload(&mut self, ctx: &RenderCtx<'_>) {
        if self.draws.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_ubo_capacity(ctx, self.uniforms.len());
        self.upload_pending_textures(ctx);

        if let Some(ubo) = self.object_ubo.as_ref() {
            ctx.queue.write_buffer(ubo, 0, &self.uniforms);
        }
    }

    /// Records the draw call for one staged quad into an open pass.
    pub fn record(&self, rpass: &mut wgpu::RenderPass<'_>, draw_idx: usize) {
        let Some(draw) = self.draws.get(draw_idx) else { return };
        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(object_bg) = self.object_bind_group.as_ref() else { return };
        let Some(texture_bg) = self.textures.get(&draw.texture) else { return };
        let Some(vbo) = self.quad_vbo.as_ref() else { return };
        let Some(ibo) = self.quad_ibo.as_ref() else { return };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, object_bg, &[draw.ubo_offset]);
        rpass.set_bind_group(1, texture_bg, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader_src = include_str!("shaders/textured.wgsl");
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("maquette textured shader"),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let object_bgl = object_bind_group_layout(ctx.device, "maquette textured object bgl");

        let texture_bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("maquette textured texture bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("maquette textured pipeline layout"),
                bind_group_layouts: &[&object_bgl, &texture_bgl],
                immediate_size: 0,
            });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("maquette textured pipeline"),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[QuadVertex::layout()],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: Some(alpha_blend()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),

                multiview_mask: None,
                cache: None,
            });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.object_bgl = Some(object_bgl);
        self.texture_bgl = Some(texture_bgl);

        // Cached bind groups reference the old layouts; rebuild everything.
        self.object_bind_group = None;
        self.sampler = None;
        self.textures.clear();
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("maquette textured quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("maquette textured quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn ensure_ubo_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.ubo_capacity
            && self.object_ubo.is_some()
            && self.object_bind_group.is_some()
        {
            return;
        }

        let new_cap = required.next_power_of_two().max(4 * OBJECT_UBO_STRIDE);
        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("maquette textured object ubo"),
            size: new_cap as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        if let Some(bgl) = self.object_bgl.as_ref() {
            self.object_bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("maquette textured object bind group"),
                layout: bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &ubo,
                        offset: 0,
                        size: Some(super::common::object_ubo_min_binding_size()),
                    }),
                }],
            }));
        }

        self.object_ubo = Some(ubo);
        self.ubo_capacity = new_cap;
    }

    fn upload_pending_textures(&mut self, ctx: &RenderCtx<'_>) {
        if self.pending_uploads.is_empty() {
            return;
        }
        let Some(texture_bgl) = self.texture_bgl.as_ref() else { return };

        let sampler = self.sampler.get_or_insert_with(|| {
            ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("maquette textured sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Nearest,
                min_filter: wgpu::FilterMode::Nearest,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            })
        });

        for cmd in self.pending_uploads.drain(..) {
            let image = &cmd.image;
            if self.textures.contains_key(&image.id()) {
                continue;
            }

            let size = wgpu::Extent3d {
                width: image.width().max(1),
                height: image.height().max(1),
                depth_or_array_layers: 1,
            };

            let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("maquette frame texture"),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });

            ctx.queue.write_texture(
                texture.as_image_copy(),
                image.pixels(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * image.width()),
                    rows_per_image: Some(image.height()),
                },
                size,
            );

            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

            let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("maquette frame texture bind group"),
                layout: texture_bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            });

            self.textures.insert(image.id(), bind_group);
        }
    }
}
