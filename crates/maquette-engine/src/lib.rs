//! Maquette engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by higher layers:
//! window/event loop, device management, input translation, the camera, and
//! the shape renderers that consume per-frame draw streams.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod camera;
pub mod paint;
pub mod render;
pub mod scene;
