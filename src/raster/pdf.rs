//! PDF rasterization via PDFium.

use super::RasterOptions;
use crate::error::{Error, Result};
use crate::model::Page;
use image::RgbImage;
use pdfium_render::prelude::*;

/// Resolution scale factor for PDF page rendering (1.0 = 72 DPI).
///
/// 2.1 ≈ 150 DPI. This constant is calibrated to match the resolution
/// the external layout analysis was produced at; the pixel bounding
/// boxes it emits are only valid against pages rendered at this exact
/// scale. Changing it invalidates bounding-box alignment for all
/// documents.
pub const RENDER_SCALE: f32 = 2.1;

/// Render every page of a PDF to an RGB raster.
///
/// Pages that fail to render are omitted from the result, never
/// replaced with a synthetic blank: a single malformed page should not
/// sacrifice the rest of the document. Remaining pages keep their
/// original 1-based numbers so layout coordinates still line up.
pub(crate) fn rasterize_pdf(bytes: &[u8], options: &RasterOptions) -> Result<Vec<Page>> {
    let pdfium = bind_pdfium()?;
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| Error::Pdf(format!("failed to load PDF: {}", e)))?;

    let mut pages = Vec::with_capacity(document.pages().len() as usize);
    for (index, page) in document.pages().iter().enumerate() {
        let number = (index + 1) as u32;
        match render_page(&page, options) {
            Ok(image) => pages.push(Page::new(number, image)),
            Err(e) => log::warn!("Skipping unrenderable PDF page {}: {}", number, e),
        }
    }

    // `document` and `pdfium` drop here, releasing the decoder on every
    // exit path.
    Ok(pages)
}

/// Render a single page to an RGB image at the configured scale.
fn render_page(page: &PdfPage, options: &RasterOptions) -> Result<RgbImage> {
    let width_points = page.width().value;
    let height_points = page.height().value;

    let mut width_px = (width_points * options.scale) as u32;
    let mut height_px = (height_points * options.scale) as u32;

    if width_px > options.max_dimension || height_px > options.max_dimension {
        let ratio = if width_px > height_px {
            options.max_dimension as f32 / width_px as f32
        } else {
            options.max_dimension as f32 / height_px as f32
        };
        width_px = (width_px as f32 * ratio) as u32;
        height_px = (height_px as f32 * ratio) as u32;
    }

    let render_config = PdfRenderConfig::new()
        .set_target_width(width_px as i32)
        .set_target_height(height_px as i32)
        .render_form_data(true)
        .render_annotations(true);

    let bitmap = page
        .render_with_config(&render_config)
        .map_err(|e| Error::Pdf(e.to_string()))?;

    Ok(bitmap.as_image().to_rgb8())
}

/// Bind to the PDFium library, preferring a copy alongside the binary.
fn bind_pdfium() -> Result<Pdfium> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| Error::Pdf(format!("could not bind PDFium library: {}", e)))?;

    Ok(Pdfium::new(bindings))
}
