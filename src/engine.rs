//! The document redaction engine.
//!
//! Sequences the full pipeline for one document: sniff the format,
//! rasterize to pages, decode the two external analyses, match regions
//! against entities, and render the blacked-out output. The engine holds
//! configuration only; nothing carries over between documents.

use crate::analysis::{parse_entities, parse_layout};
use crate::detect::detect_format_from_bytes;
use crate::error::Result;
use crate::matcher::{match_regions_with_policy, MatchPolicy};
use crate::model::{Entity, RasterDocument, RedactedDocument, TextRegion};
use crate::raster::{rasterize, RasterOptions};
use crate::render::{render, RenderOptions};

/// Configurable redaction engine.
///
/// # Example
///
/// ```no_run
/// use blackout::RedactionEngine;
///
/// fn main() -> blackout::Result<()> {
///     let document = std::fs::read("report.pdf")?;
///     let layout = std::fs::read("report.layout.json")?;
///     let entities = std::fs::read("report.entities.json")?;
///
///     let redacted = RedactionEngine::new().redact(&document, &layout, &entities)?;
///     std::fs::write("report-redacted.pdf", &redacted.bytes)?;
///     println!("{} marks over {} pages", redacted.marks_applied, redacted.page_count);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RedactionEngine {
    raster: RasterOptions,
    render: RenderOptions,
    policy: MatchPolicy,
}

impl RedactionEngine {
    /// Create an engine with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override rasterization options.
    pub fn with_raster_options(mut self, options: RasterOptions) -> Self {
        self.raster = options;
        self
    }

    /// Override output rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Override the matching policy.
    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Redact one document given the raw analysis JSON.
    ///
    /// The format is sniffed from `bytes`; `layout_json` and
    /// `entities_json` are validated at this boundary. All failure modes
    /// are fatal for this document only.
    pub fn redact(
        &self,
        bytes: &[u8],
        layout_json: &[u8],
        entities_json: &[u8],
    ) -> Result<RedactedDocument> {
        let regions = parse_layout(layout_json)?;
        let entities = parse_entities(entities_json)?;
        self.redact_parsed(bytes, &regions, &entities)
    }

    /// Redact one document from already-typed analysis results.
    pub fn redact_parsed(
        &self,
        bytes: &[u8],
        regions: &[TextRegion],
        entities: &[Entity],
    ) -> Result<RedactedDocument> {
        let format = detect_format_from_bytes(bytes)?;
        log::info!("Detected document format {}", format);

        let document = rasterize(bytes, format, &self.raster)?;
        log::info!("Rasterized {} page(s)", document.page_count());

        self.redact_raster(document, regions, entities)
    }

    /// Redact an already-rasterized document.
    pub fn redact_raster(
        &self,
        document: RasterDocument,
        regions: &[TextRegion],
        entities: &[Entity],
    ) -> Result<RedactedDocument> {
        let marks = match_regions_with_policy(regions, entities, &self.policy);
        log::info!(
            "Matched {} of {} region(s) for redaction",
            marks.len(),
            regions.len()
        );

        render(document, &marks, &self.render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::DocumentFormat;
    use crate::error::Error;
    use crate::model::{BoundingBox, Page};
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(w, h, Rgb([255, 255, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn layout_json() -> &'static [u8] {
        br#"{"pages": [{"page": 1, "lines": [
            {"text": "Patient: Jane Doe", "bbox": {"xmin": 2, "ymin": 2, "xmax": 30, "ymax": 10}},
            {"text": "Follow-up in 2 weeks", "bbox": {"xmin": 2, "ymin": 12, "xmax": 30, "ymax": 20}}
        ]}]}"#
    }

    #[test]
    fn test_redact_end_to_end_png() {
        let redacted = RedactionEngine::new()
            .redact(
                &png_bytes(40, 30),
                layout_json(),
                br#"{"entities": [{"text": "Jane Doe"}]}"#,
            )
            .unwrap();

        assert_eq!(redacted.mime_type, "image/png");
        assert_eq!(redacted.page_count, 1);
        assert_eq!(redacted.marks_applied, 1);

        // The matched line is blacked out; the unmatched one is not.
        let img = image::load_from_memory(&redacted.bytes).unwrap().to_rgb8();
        assert_eq!(img.get_pixel(10, 5), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(10, 15), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_redact_no_entities_leaves_pages_intact() {
        let redacted = RedactionEngine::new()
            .redact(&png_bytes(40, 30), layout_json(), br#"{"entities": []}"#)
            .unwrap();
        assert_eq!(redacted.marks_applied, 0);
        assert_eq!(redacted.page_count, 1);
    }

    #[test]
    fn test_redact_unknown_format() {
        let result = RedactionEngine::new().redact(
            b"not a document",
            layout_json(),
            br#"{"entities": []}"#,
        );
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_redact_malformed_layout_rejected_before_rasterization() {
        let result =
            RedactionEngine::new().redact(b"not a document", b"{}", br#"{"entities": []}"#);
        assert!(matches!(result, Err(Error::MalformedLayout(_))));
    }

    #[test]
    fn test_redact_raster_pure_over_inputs() {
        let region = crate::model::TextRegion::new(
            1,
            "John Smith DOB 01/02/1980",
            BoundingBox::new(0, 0, 20, 8),
        );
        let entities = vec![Entity::new("John Smith")];

        let make_doc = || {
            RasterDocument::new(
                DocumentFormat::Png,
                vec![Page::new(1, RgbImage::from_pixel(25, 10, Rgb([255, 255, 255])))],
            )
        };

        let engine = RedactionEngine::new();
        let a = engine
            .redact_raster(make_doc(), std::slice::from_ref(&region), &entities)
            .unwrap();
        let b = engine
            .redact_raster(make_doc(), std::slice::from_ref(&region), &entities)
            .unwrap();
        assert_eq!(a.bytes, b.bytes);
        assert_eq!(a.marks_applied, 1);
    }
}
