//! Color and palette utilities.
//!
//! Colors here are straight (non-premultiplied) RGBA, matching the per-vertex
//! color attributes consumed by the shape renderers and the alpha blend state
//! they are drawn with.

mod color;
mod palette;

pub use color::Color;
pub use palette::Palette;
