//! Shared GPU types and utilities used by the shape batches.

use bytemuck::{Pod, Zeroable};

// ── blend ─────────────────────────────────────────────────────────────────

/// Straight-alpha blending (src_alpha, one_minus_src_alpha), matching the
/// straight RGBA colors carried by `paint::Color` and texture payloads.
pub(crate) fn alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── per-object uniform ────────────────────────────────────────────────────

/// Per-draw uniform: the full model-view-projection matrix.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct ObjectUniform {
    pub mvp: [[f32; 4]; 4],
}

/// Stride between per-object uniform entries in the dynamic-offset buffer.
///
/// 256 is the largest `min_uniform_buffer_offset_alignment` wgpu's default
/// limits permit, so it is valid on every adapter we accept.
pub(crate) const OBJECT_UBO_STRIDE: usize = 256;

/// Returns the `wgpu` minimum binding size for the per-object uniform.
///
/// `ObjectUniform` is a mat4 (64 bytes), so the size is always non-zero.
/// Centralising this avoids `.unwrap()` at each pipeline-creation site.
pub(crate) fn object_ubo_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<ObjectUniform>() as u64)
        .expect("ObjectUniform has non-zero size by construction")
}

/// Appends one `ObjectUniform` to a stride-aligned staging buffer and returns
/// its dynamic offset.
pub(crate) fn stage_object_uniform(staging: &mut Vec<u8>, mvp: glam::Mat4) -> u32 {
    let offset = staging.len();
    staging.resize(offset + OBJECT_UBO_STRIDE, 0);

    let uniform = ObjectUniform {
        mvp: mvp.to_cols_array_2d(),
    };
    staging[offset..offset + std::mem::size_of::<ObjectUniform>()]
        .copy_from_slice(bytemuck::bytes_of(&uniform));

    offset as u32
}

/// Bind group layout for the per-object dynamic uniform (group 0 in both
/// shaders).
pub(crate) fn object_bind_group_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: Some(object_ubo_min_binding_size()),
            },
            count: None,
        }],
    })
}

// ── textured quad geometry ────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct QuadVertex {
    pub pos: [f32; 2], // unit square, 0..1
    pub uv: [f32; 2],
}

/// Unit quad with V mirrored so texture row 0 lands at the top of the quad.
pub(crate) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0], uv: [0.0, 1.0] },
    QuadVertex { pos: [1.0, 0.0], uv: [1.0, 1.0] },
    QuadVertex { pos: [1.0, 1.0], uv: [1.0, 0.0] },
    QuadVertex { pos: [0.0, 1.0], uv: [0.0, 0.0] },
];

pub(crate) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2  // uv
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
