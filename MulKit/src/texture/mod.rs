//! Decoded texture resources and the per-index texture cache
//!
//! Texture map pixels are stored as little-endian 16-bit values in 1-5-5-5
//! layout. The archive never sets the top bit, so the decoder ORs in
//! [`OPAQUE_BIT`] to mark every pixel as present.

mod cache;
mod ledger;

pub use cache::{CacheStats, TexmapCache};
pub use ledger::{NullLedger, ResourceLedger};

use std::sync::atomic::{AtomicBool, Ordering};

use crate::converter::argb1555_to_rgba8;

/// High bit set on every decoded pixel
pub const OPAQUE_BIT: u16 = 0x8000;

/// Side length of a texture map whose entry has `extra == 0`
pub const SMALL_TEXMAP_SIZE: u32 = 64;

/// Side length of a texture map whose entry has `extra != 0`
pub const LARGE_TEXMAP_SIZE: u32 = 128;

/// Side length selected by an entry's extra flag
#[must_use]
pub fn texmap_size(extra: i32) -> u32 {
    if extra == 0 {
        SMALL_TEXMAP_SIZE
    } else {
        LARGE_TEXMAP_SIZE
    }
}

/// A decoded square texture map
///
/// Handed out as `Arc<Texture>`; the pixel data never changes after
/// construction; only the disposed flag does.
#[derive(Debug)]
pub struct Texture {
    index: u32,
    size: u32,
    pixels: Vec<u16>,
    raw: Option<Vec<u16>>,
    disposed: AtomicBool,
}

impl Texture {
    pub(crate) fn new(index: u32, size: u32, pixels: Vec<u16>, raw: Option<Vec<u16>>) -> Self {
        debug_assert_eq!(pixels.len(), (size * size) as usize);
        Self {
            index,
            size,
            pixels,
            raw,
            disposed: AtomicBool::new(false),
        }
    }

    /// Index this texture was decoded from
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn width(&self) -> u32 {
        self.size
    }

    pub fn height(&self) -> u32 {
        self.size
    }

    /// Pixels in row-major order, each with [`OPAQUE_BIT`] set
    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    /// Archive values before the opaque bit was applied, if kept
    pub fn raw(&self) -> Option<&[u16]> {
        self.raw.as_deref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Mark this texture as disposed. The next cache lookup for its index
    /// decodes a fresh copy.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
    }

    /// Expand to 8-bit RGBA, row-major
    pub fn to_rgba8(&self) -> Vec<u8> {
        argb1555_to_rgba8(&self.pixels)
    }
}
