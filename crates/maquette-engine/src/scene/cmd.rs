use glam::Mat4;

use crate::paint::Color;

use super::TextureImage;

/// Primitive topology of a mesh draw command.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MeshTopology {
    Points,
    Lines,
    Triangles,
}

/// Colored mesh draw payload.
///
/// `vertices` and `colors` must have equal length; commands violating this
/// are skipped by the renderer with a warning. `indices` applies to triangle
/// meshes; point and line topologies draw the vertex stream directly.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshCmd {
    pub topology: MeshTopology,
    pub vertices: Vec<[f32; 3]>,
    pub colors: Vec<Color>,
    pub indices: Option<Vec<u32>>,
    pub model: Mat4,
}

/// Textured unit-quad draw payload.
///
/// The model matrix maps the unit square onto the world-space rectangle;
/// texture row 0 lands at the top of the quad (V mirrored).
#[derive(Debug, Clone, PartialEq)]
pub struct TexturedQuadCmd {
    pub model: Mat4,
    pub image: TextureImage,
}

/// Renderer-agnostic draw command stream.
///
/// Extending the scene:
/// - add a new payload type here (or a module for a complex one)
/// - add a new variant
/// - teach the scene renderer to prepare and record it
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Mesh(MeshCmd),
    TexturedQuad(TexturedQuadCmd),
}
