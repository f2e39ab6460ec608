//! Text regions, bounding boxes, and redaction marks.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in page pixel space.
///
/// Coordinates are only meaningful against the page dimensions produced
/// by the rasterizer at its fixed scale; a scale mismatch between the
/// layout analysis and the rasterizer silently misaligns every box and
/// cannot be detected here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge, inclusive
    pub xmin: u32,
    /// Top edge, inclusive
    pub ymin: u32,
    /// Right edge, exclusive
    pub xmax: u32,
    /// Bottom edge, exclusive
    pub ymax: u32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(xmin: u32, ymin: u32, xmax: u32, ymax: u32) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Box width in pixels.
    pub fn width(&self) -> u32 {
        self.xmax.saturating_sub(self.xmin)
    }

    /// Box height in pixels.
    pub fn height(&self) -> u32 {
        self.ymax.saturating_sub(self.ymin)
    }

    /// Whether the box encloses zero pixels.
    pub fn is_empty(&self) -> bool {
        self.xmax <= self.xmin || self.ymax <= self.ymin
    }

    /// Clamp the box to the given page dimensions.
    pub fn clamped(&self, width: u32, height: u32) -> Self {
        Self {
            xmin: self.xmin.min(width),
            ymin: self.ymin.min(height),
            xmax: self.xmax.min(width),
            ymax: self.ymax.min(height),
        }
    }
}

/// One detected line of text from the external layout analysis.
///
/// Granularity is line-level, not word-level: when any part of the line
/// matches an entity, the entire line's box is redacted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRegion {
    /// Page the region belongs to (1-indexed)
    pub page_number: u32,

    /// Raw text content of the line
    pub text: String,

    /// Pixel bounding box at the rasterizer's scale
    pub bbox: BoundingBox,
}

impl TextRegion {
    /// Create a new text region.
    pub fn new(page_number: u32, text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            page_number,
            text: text.into(),
            bbox,
        }
    }
}

/// A (page, rectangle) pair selected for obscuring.
///
/// Derived by the matcher, never persisted independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionMark {
    /// Page to draw on (1-indexed)
    pub page_number: u32,

    /// Rectangle to fill, in that page's pixel space
    pub bbox: BoundingBox,
}

impl RedactionMark {
    /// Create a mark covering the given region.
    pub fn covering(region: &TextRegion) -> Self {
        Self {
            page_number: region.page_number,
            bbox: region.bbox,
        }
    }
}
