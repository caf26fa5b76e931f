//! Coordinate and geometry types shared across the engine and canvas layers.
//!
//! Two coordinate spaces appear in the API:
//! - Pixel space: window coordinates, origin top-left, +Y down.
//! - World space: the canvas plane, origin bottom-left, +Y up.
//!
//! `Viewport` describes the window in pixel space; `Vec2`/`Rect` are used for
//! world-space geometry. The camera converts between the two.

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
