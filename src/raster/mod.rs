//! Document rasterization.
//!
//! Converts a document into an ordered sequence of page images at the
//! fixed resolution scale shared with the external layout analysis.

mod frames;
mod pdf;

pub use pdf::RENDER_SCALE;

use crate::detect::DocumentFormat;
use crate::error::{Error, Result};
use crate::model::RasterDocument;

/// Options for rasterization.
#[derive(Debug, Clone)]
pub struct RasterOptions {
    /// Resolution scale factor for PDF rendering (1.0 = 72 DPI).
    ///
    /// Defaults to [`RENDER_SCALE`]. The external layout analysis
    /// produces pixel coordinates at this same scale; changing it
    /// invalidates bounding-box alignment for all documents.
    pub scale: f32,

    /// Upper bound on either rendered page dimension, in pixels.
    /// Pages larger than this are scaled down preserving aspect ratio.
    pub max_dimension: u32,
}

impl RasterOptions {
    /// Create raster options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the resolution scale factor.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Override the maximum page dimension.
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: RENDER_SCALE,
            max_dimension: 4000,
        }
    }
}

/// Rasterize a document into an ordered page sequence.
///
/// PDF pages render at the configured scale; raster formats pass their
/// frames through untouched, one page per frame in frame order.
/// Individual unrenderable pages or frames are skipped with a warning;
/// an entirely empty result is [`Error::NoRenderableContent`].
///
/// Decode resources are released before returning, on success and
/// failure paths alike.
pub fn rasterize(
    bytes: &[u8],
    format: DocumentFormat,
    options: &RasterOptions,
) -> Result<RasterDocument> {
    let pages = match format {
        DocumentFormat::Pdf => pdf::rasterize_pdf(bytes, options)?,
        DocumentFormat::Jpeg | DocumentFormat::Png => frames::single_frame(bytes)?,
        DocumentFormat::Tiff => frames::tiff_frames(bytes)?,
    };

    if pages.is_empty() {
        return Err(Error::NoRenderableContent);
    }

    log::debug!("Rasterized {} as {} page(s)", format, pages.len());
    Ok(RasterDocument::new(format, pages))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_options_builder() {
        let options = RasterOptions::new().with_scale(1.5).with_max_dimension(2000);
        assert_eq!(options.scale, 1.5);
        assert_eq!(options.max_dimension, 2000);
    }

    #[test]
    fn test_default_scale_is_render_scale() {
        assert_eq!(RasterOptions::default().scale, RENDER_SCALE);
    }

    #[test]
    fn test_rasterize_png_round_trip() {
        let img = image::RgbImage::from_pixel(8, 6, image::Rgb([200, 10, 10]));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();

        let doc = rasterize(&bytes, DocumentFormat::Png, &RasterOptions::default()).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.pages[0].dimensions(), (8, 6));
        assert_eq!(doc.pages[0].number, 1);
    }

    #[test]
    fn test_rasterize_corrupt_image_is_fatal_for_document() {
        let result = rasterize(
            &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0xFF],
            DocumentFormat::Png,
            &RasterOptions::default(),
        );
        assert!(result.is_err());
    }
}
