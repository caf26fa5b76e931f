//! GPU rendering subsystem.
//!
//! The scene renderer consumes a `scene::DrawList` and issues GPU commands
//! via wgpu. Draw items are recorded back-to-front (layer order) inside a
//! single render pass so mesh and textured-quad items interleave correctly;
//! each batch owns its own GPU resources (pipelines, buffers, texture cache).
//!
//! Convention:
//! - CPU geometry is in world units; the per-object MVP uniform converts to
//!   NDC in the vertex shader.

mod ctx;
mod scene_renderer;
pub mod shapes;

pub use ctx::{RenderCtx, RenderTarget};
pub use scene_renderer::SceneRenderer;
