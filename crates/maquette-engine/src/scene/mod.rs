//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands for one frame
//! - provide deterministic back-to-front ordering (layer + insertion order)
//! - carry texture payloads by cheap handle so renderers can cache uploads

mod cmd;
mod image;
mod key;
mod list;
mod z_index;

pub use cmd::{DrawCmd, MeshCmd, MeshTopology, TexturedQuadCmd};
pub use image::{TextureId, TextureImage};
pub use key::SortKey;
pub use list::{DrawItem, DrawList};
pub use z_index::ZIndex;
