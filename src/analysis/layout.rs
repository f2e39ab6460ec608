//! Layout analysis decoding.

use crate::error::{Error, Result};
use crate::model::{BoundingBox, TextRegion};
use serde::Deserialize;

/// Wire form of a layout analysis result: text regions grouped per page.
///
/// Bounding boxes are pixel coordinates keyed at the same resolution
/// scale factor the rasterizer uses ([`crate::raster::RENDER_SCALE`]).
#[derive(Debug, Deserialize)]
struct LayoutResult {
    pages: Vec<LayoutPage>,
}

#[derive(Debug, Deserialize)]
struct LayoutPage {
    page: u32,
    lines: Vec<LayoutLine>,
}

#[derive(Debug, Deserialize)]
struct LayoutLine {
    text: String,
    bbox: BoundingBox,
}

/// Decode a layout analysis result into text regions.
///
/// Regions are returned in document order: pages in listed order, lines
/// in reading order within each page. Validation failures reject the
/// whole document with [`Error::MalformedLayout`]; empty-text lines are
/// skipped with a warning since they can never match an entity.
pub fn parse_layout(data: &[u8]) -> Result<Vec<TextRegion>> {
    let result: LayoutResult =
        serde_json::from_slice(data).map_err(|e| Error::MalformedLayout(e.to_string()))?;

    let mut regions = Vec::new();
    for page in &result.pages {
        if page.page == 0 {
            return Err(Error::MalformedLayout(
                "page numbers are 1-indexed, found page 0".into(),
            ));
        }

        for line in &page.lines {
            if line.bbox.is_empty() {
                return Err(Error::MalformedLayout(format!(
                    "degenerate bounding box {:?} on page {}",
                    line.bbox, page.page
                )));
            }
            if line.text.trim().is_empty() {
                log::warn!("Skipping empty text line on page {}", page.page);
                continue;
            }
            regions.push(TextRegion::new(page.page, line.text.clone(), line.bbox));
        }
    }

    log::debug!("Parsed {} text regions from layout analysis", regions.len());
    Ok(regions)
}
