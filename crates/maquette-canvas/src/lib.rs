//! Maquette canvas crate.
//!
//! The interactive layer above the engine: shapes owned by a scene behind
//! indexed handles, the textured `Frame` widget with hit-testing and
//! move/resize mutation, and the pointer-driven selection controller.

mod controller;
mod error;
mod frame;
mod scene;
mod shape;

pub use controller::{DragMode, InteractionState, SelectionController};
pub use error::FrameError;
pub use frame::{CursorZone, Frame, LAYER_DEPTH_STEP};
pub use scene::{CanvasScene, ShapeId};
pub use shape::{MeshExtent, MeshShape, Shape};
