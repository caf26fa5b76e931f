use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::render::RenderCtx;
use crate::scene::{MeshCmd, MeshTopology};

use super::common::{alpha_blend, object_bind_group_layout, stage_object_uniform, OBJECT_UBO_STRIDE};

/// Batch for colored point/line/triangle meshes.
///
/// Vertex data for all staged meshes is concatenated into one vertex buffer;
/// each draw binds its MVP through a dynamic-offset uniform and draws its
/// slice (optionally indexed, with a base vertex).
#[derive(Default)]
pub struct MeshBatch {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipelines: Option<MeshPipelines>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    object_ubo: Option<wgpu::Buffer>,
    ubo_capacity: usize, // bytes

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize, // vertices
    ibo: Option<wgpu::Buffer>,
    ibo_capacity: usize, // indices

    // CPU staging, rebuilt each frame.
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
    uniforms: Vec<u8>,
    draws: Vec<MeshDraw>,
}

struct MeshPipelines {
    points: wgpu::RenderPipeline,
    lines: wgpu::RenderPipeline,
    triangles: wgpu::RenderPipeline,
}

struct MeshDraw {
    topology: MeshTopology,
    vertex_range: Range<u32>,
    /// Index range + base vertex for indexed triangle meshes.
    indexed: Option<(Range<u32>, i32)>,
    ubo_offset: u32,
}

impl MeshBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards staged data from the previous frame.
    pub fn begin(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.uniforms.clear();
        self.draws.clear();
    }

    /// Stages one mesh command; returns its draw index for `record`.
    ///
    /// Commands with mismatched vertex/color counts are skipped with a
    /// warning rather than rejected hard — a bad shape should not take the
    /// whole frame down.
    pub fn stage(&mut self, cmd: &MeshCmd, view_proj: Mat4) -> Option<usize> {
        if cmd.vertices.is_empty() {
            return None;
        }
        if cmd.vertices.len() != cmd.colors.len() {
            log::warn!(
                "mesh skipped: {} vertices but {} colors",
                cmd.vertices.len(),
                cmd.colors.len()
            );
            return None;
        }

        let base_vertex = self.vertices.len() as u32;
        self.vertices.extend(
            cmd.vertices
                .iter()
                .zip(&cmd.colors)
                .map(|(&pos, &c)| MeshVertex {
                    pos,
                    color: c.to_array(),
                }),
        );
        let vertex_range = base_vertex..self.vertices.len() as u32;

        let indexed = match (&cmd.indices, cmd.topology) {
            (Some(ids), MeshTopology::Triangles) => {
                let start = self.indices.len() as u32;
                self.indices.extend_from_slice(ids);
                Some((start..self.indices.len() as u32, base_vertex as i32))
            }
            (Some(_), _) => {
                log::warn!("index list ignored for non-triangle topology");
                None
            }
            (None, _) => None,
        };

        let ubo_offset = stage_object_uniform(&mut self.uniforms, view_proj * cmd.model);

        self.draws.push(MeshDraw {
            topology: cmd.topology,
            vertex_range,
            indexed,
            ubo_offset,
        });
        Some(self.draws.len() - 1)
    }

    /// Creates/grows GPU resources and uploads the staged data.
    pub fn upload(&mut self, ctx: &RenderCtx<'_>) {
        if self.draws.is_empty() {
            return;
        }

        self.ensure_pipelines(ctx);
        self.ensure_vertex_capacity(ctx, self.vertices.len());
        self.ensure_index_capacity(ctx, self.indices.len());
        self.ensure_ubo_capacity(ctx, self.uniforms.len());

        if let Some(vbo) = self.vbo.as_ref() {
            ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&self.vertices));
        }
        if !self.indices.is_empty() {
            if let Some(ibo) = self.ibo.as_ref() {
                ctx.queue.write_buffer(ibo, 0, bytemuck::cast_slice(&self.indices));
            }
        }
        if let Some(ubo) = self.object_ubo.as_ref() {
            ctx.queue.write_buffer(ubo, 0, &self.uniforms);
        }
    }

    /// Records the draw call for one staged mesh into an open pass.
    pub fn record(&self, rpass: &mut wgpu::RenderPass<'_>, draw_idx: usize) {
        let Some(draw) = self.draws.get(draw_idx) else { return };
        let Some(pipelines) = self.pipelines.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(vbo) = self.vbo.as_ref() else { return };

        let pipeline = match draw.topology {
            MeshTopology::Points => &pipelines.points,
            MeshTopology::Lines => &pipelines.lines,
            MeshTopology::Triangles => &pipelines.triangles,
        };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[draw.ubo_offset]);
        rpass.set_vertex_buffer(0, vbo.slice(..));

        match &draw.indexed {
            Some((index_range, base_vertex)) => {
                let Some(ibo) = self.ibo.as_ref() else { return };
                rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(index_range.clone(), *base_vertex, 0..1);
            }
            None => {
                rpass.draw(draw.vertex_range.clone(), 0..1);
            }
        }
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipelines.is_some() {
            return;
        }

        let shader_src = include_str!("shaders/mesh.wgsl");
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("maquette mesh shader"),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let bind_group_layout = object_bind_group_layout(ctx.device, "maquette mesh bgl");

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("maquette mesh pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let build = |topology: wgpu::PrimitiveTopology, label: &str| {
            ctx.device
                .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some(label),
                    layout: Some(&pipeline_layout),

                    vertex: wgpu::VertexState {
                        module: &shader,
                        entry_point: Some("vs_main"),
                        compilation_options: Default::default(),
                        buffers: &[MeshVertex::layout()],
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
                        topology,
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
                })
        };

        self.pipelines = Some(MeshPipelines {
            points: build(wgpu::PrimitiveTopology::PointList, "maquette mesh points"),
            lines: build(wgpu::PrimitiveTopology::LineList, "maquette mesh lines"),
            triangles: build(
                wgpu::PrimitiveTopology::TriangleList,
                "maquette mesh triangles",
            ),
        });
        self.pipeline_format = Some(ctx.surface_format);
        self.bind_group_layout = Some(bind_group_layout);

        // Bind group references the UBO; force recreation against the new
        // layout.
        self.bind_group = None;
    }

    fn ensure_vertex_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.vbo_capacity && self.vbo.is_some() {
            return;
        }

        let new_cap = required.next_power_of_two().max(64);
        self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("maquette mesh vbo"),
            size: (new_cap * std::mem::size_of::<MeshVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vbo_capacity = new_cap;
    }

    fn ensure_index_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required == 0 || (required <= self.ibo_capacity && self.ibo.is_some()) {
            return;
        }

        let new_cap = required.next_power_of_two().max(64);
        self.ibo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("maquette mesh ibo"),
            size: (new_cap * std::mem::size_of::<u32>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.ibo_capacity = new_cap;
    }

    fn ensure_ubo_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.ubo_capacity && self.object_ubo.is_some() && self.bind_group.is_some() {
            return;
        }

        let new_cap = required.next_power_of_two().max(4 * OBJECT_UBO_STRIDE);
        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("maquette mesh object ubo"),
            size: new_cap as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        if let Some(bgl) = self.bind_group_layout.as_ref() {
            self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("maquette mesh object bind group"),
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
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MeshVertex {
    pos: [f32; 3],
    color: [f32; 4],
}

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
