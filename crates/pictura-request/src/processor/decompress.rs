use crate::image::{ContentMode, Image, Size};

use super::Processor;

const IDENTIFIER: &str = "pictura.decompressor";

/// Forces a decoded bitmap, optionally downscaling it to a target size.
///
/// Images are never upscaled. Without a target size the image passes through
/// unchanged, which is what the default processor chain uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decompressor {
    target_size: Option<Size>,
    content_mode: ContentMode,
    identifier: String,
}

impl Default for Decompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Decompressor {
    pub fn new() -> Self {
        Self {
            target_size: None,
            content_mode: ContentMode::default(),
            identifier: IDENTIFIER.to_string(),
        }
    }

    pub fn resizing(target_size: Size, content_mode: ContentMode) -> Self {
        Self {
            target_size: Some(target_size),
            content_mode,
            identifier: format!("{IDENTIFIER}?size={target_size}&mode={content_mode}"),
        }
    }

    pub fn target_size(&self) -> Option<Size> {
        self.target_size
    }

    pub fn content_mode(&self) -> ContentMode {
        self.content_mode
    }

    /// Size an image of `size` is scaled to, or `None` if it stays as is.
    fn scaled_size(&self, size: Size) -> Option<Size> {
        let target = self.target_size?;
        if size.is_empty() || target.is_empty() {
            return None;
        }

        let sx = f64::from(target.width) / f64::from(size.width);
        let sy = f64::from(target.height) / f64::from(size.height);
        let scale = match self.content_mode {
            ContentMode::AspectFill => sx.max(sy),
            ContentMode::AspectFit => sx.min(sy),
        };
        if scale >= 1.0 {
            return None;
        }

        let width = (f64::from(size.width) * scale).round().max(1.0) as u32;
        let height = (f64::from(size.height) * scale).round().max(1.0) as u32;
        Some(Size::new(width, height))
    }
}

impl Processor for Decompressor {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn process(&self, image: Image) -> Option<Image> {
        match self.scaled_size(image.size()) {
            Some(size) => Some(image.resized(size)),
            None => Some(image),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u32, height: u32) -> Image {
        Image::filled(Size::new(width, height), [10, 20, 30, 255])
    }

    #[test]
    fn test_pass_through_keeps_pixels() {
        let input = image(40, 20);
        let output = Decompressor::new().process(input.clone()).unwrap();
        assert!(output.shares_pixels(&input));
    }

    #[test]
    fn test_aspect_fill_covers_target() {
        let decompressor = Decompressor::resizing(Size::new(10, 10), ContentMode::AspectFill);
        let output = decompressor.process(image(40, 20)).unwrap();
        assert_eq!(output.size(), Size::new(20, 10));
    }

    #[test]
    fn test_aspect_fit_stays_inside_target() {
        let decompressor = Decompressor::resizing(Size::new(10, 10), ContentMode::AspectFit);
        let output = decompressor.process(image(40, 20)).unwrap();
        assert_eq!(output.size(), Size::new(10, 5));
    }

    #[test]
    fn test_never_upscales() {
        let decompressor = Decompressor::resizing(Size::new(100, 100), ContentMode::AspectFill);
        let output = decompressor.process(image(40, 20)).unwrap();
        assert_eq!(output.size(), Size::new(40, 20));
    }

    #[test]
    fn test_identifier_encodes_configuration() {
        let a = Decompressor::resizing(Size::new(10, 10), ContentMode::AspectFill);
        let b = Decompressor::resizing(Size::new(10, 10), ContentMode::AspectFit);
        let c = Decompressor::resizing(Size::new(10, 10), ContentMode::AspectFill);

        assert_eq!(a.identifier(), "pictura.decompressor?size=10x10&mode=fill");
        assert_ne!(a.identifier(), b.identifier());
        assert_eq!(a.identifier(), c.identifier());
        assert_ne!(a.identifier(), Decompressor::new().identifier());
    }
}
