//! Output document encoding.

use super::{pdf, RenderOptions};
use crate::detect::DocumentFormat;
use crate::error::{Error, Result};
use crate::model::Page;
use std::io::Cursor;
use tiff::encoder::{colortype, TiffEncoder};

/// Encode the redacted page sequence into one document of the given
/// format. Single-frame formats carry exactly one page; TIFF and PDF
/// reassemble all pages in order.
pub(crate) fn encode_pages(
    format: DocumentFormat,
    pages: &[Page],
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    if pages.is_empty() {
        return Err(Error::Render("no pages to encode".into()));
    }

    match format {
        DocumentFormat::Pdf => pdf::assemble_pdf(pages, options),
        DocumentFormat::Jpeg => encode_single(&pages[0], image::ImageFormat::Jpeg),
        DocumentFormat::Png => encode_single(&pages[0], image::ImageFormat::Png),
        DocumentFormat::Tiff => encode_tiff(pages),
    }
}

/// Re-encode a single page in its source image format.
fn encode_single(page: &Page, format: image::ImageFormat) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    page.image
        .write_to(&mut Cursor::new(&mut bytes), format)
        .map_err(|e| Error::Render(format!("image encode failed: {}", e)))?;
    Ok(bytes)
}

/// Encode all pages as one multi-page TIFF, one IFD per page, in order.
fn encode_tiff(pages: &[Page]) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    let mut encoder =
        TiffEncoder::new(&mut cursor).map_err(|e| Error::Render(format!("TIFF encode failed: {}", e)))?;

    for page in pages {
        encoder
            .write_image::<colortype::RGB8>(page.width(), page.height(), page.image.as_raw())
            .map_err(|e| {
                Error::Render(format!("TIFF encode failed on page {}: {}", page.number, e))
            })?;
    }

    drop(encoder);
    Ok(cursor.into_inner())
}
