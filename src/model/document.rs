//! Document-level types.

use super::Page;
use crate::detect::DocumentFormat;

/// A document rasterized into an ordered page sequence.
///
/// Pages are owned exclusively by the document during processing and
/// discarded with it; nothing is shared across documents in a batch.
#[derive(Debug, Clone)]
pub struct RasterDocument {
    /// The detected source format
    pub format: DocumentFormat,

    /// Pages in original order
    pub pages: Vec<Page>,
}

impl RasterDocument {
    /// Create a raster document from its pages.
    pub fn new(format: DocumentFormat, pages: Vec<Page>) -> Self {
        Self { format, pages }
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Get a page by number (1-indexed). Pages dropped during
    /// rasterization leave gaps in the numbering, so this searches by
    /// the page's own number rather than indexing.
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.number == page_num)
    }

    /// Consume the document, yielding its pages.
    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}

/// A finished, encoded redaction output.
#[derive(Debug, Clone)]
pub struct RedactedDocument {
    /// Encoded document content
    pub bytes: Vec<u8>,

    /// MIME type for content labeling on upload
    pub mime_type: &'static str,

    /// Number of pages in the output
    pub page_count: u32,

    /// Number of redaction marks drawn
    pub marks_applied: usize,
}

impl RedactedDocument {
    /// Output size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the output is empty (never the case for a successful render).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
