use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique handle for a texture payload.
///
/// Renderers key their GPU texture caches on this, so an image is uploaded
/// once no matter how many frames it is drawn in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(u64);

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// CPU-side RGBA8 image payload for a textured quad.
///
/// Pixel data is immutable after construction and shared by `Arc`, so draw
/// commands can carry the image by value every frame without copying it.
#[derive(Debug, Clone)]
pub struct TextureImage {
    id: TextureId,
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl TextureImage {
    /// Wraps raw RGBA8 pixel data (row-major, 4 bytes per texel).
    ///
    /// # Panics
    /// Panics (debug only) if `pixels.len() != width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width * height * 4) as usize,
            "RGBA8 payload size does not match {width}x{height}"
        );
        Self {
            id: TextureId(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed)),
            width,
            height,
            pixels: pixels.into(),
        }
    }

    #[inline]
    pub fn id(&self) -> TextureId {
        self.id
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl PartialEq for TextureImage {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
