//! Flattened raster PDF assembly.
//!
//! The redacted output for a PDF input is itself a PDF, but a flattened
//! one: each page is a single full-bleed JPEG image. No text layer
//! survives, so the obscured pixels cannot be recovered by extracting
//! the original content streams.

use super::RenderOptions;
use crate::error::{Error, Result};
use crate::model::Page;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::io::Cursor;

/// Assemble the page images into a single flattened PDF.
///
/// Page order and count follow the input sequence exactly. MediaBox
/// dimensions are derived by dividing pixel dimensions by the
/// rasterization scale, restoring the original physical page size.
pub(crate) fn assemble_pdf(pages: &[Page], options: &RenderOptions) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

    for page in pages {
        let jpeg = encode_jpeg(&page.image, options.jpeg_quality)?;
        let (width_px, height_px) = page.dimensions();
        let width_pt = width_px as f32 / options.page_scale;
        let height_pt = height_px as f32 / options.page_scale;

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width_px as i64,
                "Height" => height_px as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg,
        ));

        // Scale the unit image square up to the page, then paint.
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(width_pt),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(height_pt),
                        Object::Integer(0),
                        Object::Integer(0),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content
                .encode()
                .map_err(|e| Error::Render(format!("PDF content encode failed: {}", e)))?,
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width_pt),
                Object::Real(height_pt),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut Cursor::new(&mut bytes))
        .map_err(|e| Error::Render(format!("PDF write failed: {}", e)))?;
    Ok(bytes)
}

/// JPEG-encode one page image for embedding as an XObject.
fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, quality);
    encoder
        .encode_image(image)
        .map_err(|e| Error::Render(format!("JPEG encode failed: {}", e)))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Page;

    fn page(number: u32, w: u32, h: u32) -> Page {
        Page::new(number, RgbImage::from_pixel(w, h, image::Rgb([250, 250, 250])))
    }

    #[test]
    fn test_assemble_pdf_header_and_page_count() {
        let pages = vec![page(1, 21, 10), page(2, 21, 10)];
        let bytes = assemble_pdf(&pages, &RenderOptions::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_assemble_pdf_media_box_uses_page_scale() {
        let options = RenderOptions::default().with_page_scale(2.0);
        let bytes = assemble_pdf(&[page(1, 100, 200)], &options).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let media_box = doc
            .get_object(page_id)
            .and_then(|o| o.as_dict())
            .and_then(|d| d.get(b"MediaBox"))
            .and_then(|o| o.as_array())
            .unwrap();
        assert_eq!(media_box[2].as_float().unwrap(), 50.0);
        assert_eq!(media_box[3].as_float().unwrap(), 100.0);
    }

    #[test]
    fn test_jpeg_encode_produces_jpeg() {
        let jpeg = encode_jpeg(&RgbImage::new(5, 5), 90).unwrap();
        assert!(jpeg.starts_with(&[0xFF, 0xD8, 0xFF]));
    }
}
