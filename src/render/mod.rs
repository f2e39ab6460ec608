//! Redaction rendering: obscuring marked regions and reassembling the
//! page sequence into a single output document.

mod encode;
mod pdf;

use crate::error::Result;
use crate::model::{Page, RasterDocument, RedactedDocument, RedactionMark};
use crate::raster::RENDER_SCALE;
use image::Rgb;
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

/// Fill color for redaction rectangles.
const REDACTION_FILL: Rgb<u8> = Rgb([0, 0, 0]);

/// Options for output rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// JPEG quality (1-100) for the PDF page-image encode path.
    pub jpeg_quality: u8,

    /// Pixels-per-point scale used to size PDF output pages, normally
    /// the same scale the pages were rasterized at.
    pub page_scale: f32,
}

impl RenderOptions {
    /// Create render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the JPEG quality for PDF page images.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Override the pixels-per-point page scale.
    pub fn with_page_scale(mut self, scale: f32) -> Self {
        self.page_scale = scale;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: 90,
            page_scale: RENDER_SCALE,
        }
    }
}

/// Draw every redaction mark onto its page and reassemble the sequence
/// into one output document.
///
/// Rectangles are filled fully opaque: the goal is irreversible
/// destruction of the underlying pixels, not annotation. Page count and
/// order are preserved exactly, including when no region was marked.
/// Marks referencing a page the rasterizer dropped are skipped with a
/// warning.
pub fn render(
    document: RasterDocument,
    marks: &[RedactionMark],
    options: &RenderOptions,
) -> Result<RedactedDocument> {
    let format = document.format;
    let mut pages = document.into_pages();

    for mark in marks {
        if !pages.iter().any(|p| p.number == mark.page_number) {
            log::warn!(
                "Dropping redaction mark on missing page {} (page was not rasterized)",
                mark.page_number
            );
        }
    }

    let mut applied = 0;
    for page in &mut pages {
        applied += obscure_page(page, marks);
    }

    let page_count = pages.len() as u32;
    let bytes = encode::encode_pages(format, &pages, options)?;

    log::debug!(
        "Rendered {} page(s) with {} redaction mark(s) as {}",
        page_count,
        applied,
        format
    );

    Ok(RedactedDocument {
        bytes,
        mime_type: format.mime_type(),
        page_count,
        marks_applied: applied,
    })
}

/// Fill every mark belonging to this page. Returns the number drawn.
fn obscure_page(page: &mut Page, marks: &[RedactionMark]) -> usize {
    let mut drawn = 0;
    for mark in marks.iter().filter(|m| m.page_number == page.number) {
        let bbox = mark.bbox.clamped(page.width(), page.height());
        if bbox.is_empty() {
            log::warn!(
                "Dropping out-of-bounds redaction mark {:?} on page {}",
                mark.bbox,
                page.number
            );
            continue;
        }

        let rect = Rect::at(bbox.xmin as i32, bbox.ymin as i32).of_size(bbox.width(), bbox.height());
        draw_filled_rect_mut(&mut page.image, rect, REDACTION_FILL);
        drawn += 1;
    }
    drawn
}
