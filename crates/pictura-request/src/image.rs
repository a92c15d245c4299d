//! Minimal decoded image model consumed by processors.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// How an image is fitted into a target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentMode {
    /// Scale to cover the target; one side may overflow.
    #[default]
    AspectFill,
    /// Scale to fit inside the target; one side may fall short.
    AspectFit,
}

impl std::fmt::Display for ContentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentMode::AspectFill => write!(f, "fill"),
            ContentMode::AspectFit => write!(f, "fit"),
        }
    }
}

/// A decoded RGBA8 bitmap.
///
/// The pixel buffer is shared, so passing an image through a chain of
/// pass-through processors never copies pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    size: Size,
    pixels: Arc<[u8]>,
}

impl Image {
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Returns `None` when the buffer length does not match the size.
    pub fn from_rgba(size: Size, pixels: impl Into<Arc<[u8]>>) -> Option<Self> {
        let pixels = pixels.into();
        let expected = size.width as usize * size.height as usize * Self::BYTES_PER_PIXEL;
        (pixels.len() == expected).then_some(Self { size, pixels })
    }

    /// An image filled with a single colour.
    pub fn filled(size: Size, rgba: [u8; 4]) -> Self {
        let count = size.width as usize * size.height as usize;
        let pixels: Vec<u8> = rgba.iter().copied().cycle().take(count * 4).collect();
        Self {
            size,
            pixels: Arc::from(pixels),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let offset = (y as usize * self.size.width as usize + x as usize) * Self::BYTES_PER_PIXEL;
        let px = &self.pixels[offset..offset + Self::BYTES_PER_PIXEL];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Whether two images share the same pixel allocation.
    pub fn shares_pixels(&self, other: &Image) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }

    /// Nearest-neighbour resample to `size`.
    pub fn resized(&self, size: Size) -> Image {
        if size == self.size {
            return self.clone();
        }
        if self.size.is_empty() {
            return Image::filled(size, [0; 4]);
        }
        let (src_w, src_h) = (self.size.width as usize, self.size.height as usize);
        let (dst_w, dst_h) = (size.width as usize, size.height as usize);
        let mut pixels = Vec::with_capacity(dst_w * dst_h * Self::BYTES_PER_PIXEL);
        for y in 0..dst_h {
            let sy = y * src_h / dst_h;
            for x in 0..dst_w {
                let sx = x * src_w / dst_w;
                let offset = (sy * src_w + sx) * Self::BYTES_PER_PIXEL;
                pixels.extend_from_slice(&self.pixels[offset..offset + Self::BYTES_PER_PIXEL]);
            }
        }
        Image {
            size,
            pixels: Arc::from(pixels),
        }
    }
}
