//! Page-level types.

use image::RgbImage;

/// A single rasterized page.
///
/// The sequence of pages *is* the working representation of a document
/// during redaction; the page owns its pixel buffer exclusively.
#[derive(Debug, Clone)]
pub struct Page {
    /// Page number (1-indexed, stable ordering)
    pub number: u32,

    /// Rasterized page content in RGB
    pub image: RgbImage,
}

impl Page {
    /// Create a new page from a rasterized image.
    pub fn new(number: u32, image: RgbImage) -> Self {
        Self { number, image }
    }

    /// Page width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Page height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Check if the page is in landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.width() > self.height()
    }
}
