//! # blackout
//!
//! Raster document redaction for Rust.
//!
//! blackout combines two independently produced analyses (a layout
//! analysis locating text regions on each page, and an entity analysis
//! listing sensitive text spans) and produces a new document with the
//! matching regions permanently blacked out. Output is always a
//! flattened raster: the obscured pixels are destroyed, not covered.
//!
//! ## Quick Start
//!
//! ```no_run
//! use blackout::redact_bytes;
//!
//! fn main() -> blackout::Result<()> {
//!     let document = std::fs::read("scan.pdf")?;
//!     let layout = std::fs::read("scan.layout.json")?;
//!     let entities = std::fs::read("scan.entities.json")?;
//!
//!     let redacted = redact_bytes(&document, &layout, &entities)?;
//!     std::fs::write("scan-redacted.pdf", &redacted.bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Content sniffing**: PDF, JPEG, PNG, and multi-frame TIFF inputs,
//!   classified by magic bytes, never by filename
//! - **Fixed-scale rasterization**: PDF pages render at the same
//!   resolution the layout analysis was produced at
//! - **Line-level matching**: case-folded exact and containment
//!   matching, biased toward over-redaction
//! - **Batch processing**: sequential, partial-failure-tolerant, with
//!   guaranteed working-file cleanup and an explicit per-item report

pub mod analysis;
pub mod batch;
pub mod detect;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod raster;
pub mod render;
pub mod storage;

// Re-export commonly used types
pub use batch::{BatchProcessor, BatchReport, ItemOutcome, ItemStatus, RedactionItem};
pub use detect::{detect_format_from_bytes, detect_format_from_path, DocumentFormat};
pub use engine::RedactionEngine;
pub use error::{Error, Result};
pub use matcher::{match_regions, MatchPolicy};
pub use model::{
    BoundingBox, Entity, Page, RasterDocument, RedactedDocument, RedactionMark, TextRegion,
};
pub use raster::{rasterize, RasterOptions, RENDER_SCALE};
pub use render::RenderOptions;
pub use storage::{DirStore, MemoryStore, ObjectStore};

use std::path::Path;

/// Redact one document held in memory, with default options.
///
/// # Arguments
///
/// * `bytes` - Document content; format is sniffed from the bytes
/// * `layout_json` - Layout analysis result
/// * `entities_json` - Entity analysis result
pub fn redact_bytes(bytes: &[u8], layout_json: &[u8], entities_json: &[u8]) -> Result<RedactedDocument> {
    RedactionEngine::new().redact(bytes, layout_json, entities_json)
}

/// Redact one document on disk, writing the output next to the caller's
/// chosen path.
///
/// # Example
///
/// ```no_run
/// use blackout::redact_file;
///
/// let redacted = redact_file(
///     "scan.pdf",
///     "scan.layout.json",
///     "scan.entities.json",
///     "scan-redacted.pdf",
/// ).unwrap();
/// println!("{} mark(s) applied", redacted.marks_applied);
/// ```
pub fn redact_file<P: AsRef<Path>>(
    document: P,
    layout: P,
    entities: P,
    output: P,
) -> Result<RedactedDocument> {
    let bytes = std::fs::read(document)?;
    let layout_json = std::fs::read(layout)?;
    let entities_json = std::fs::read(entities)?;

    let redacted = redact_bytes(&bytes, &layout_json, &entities_json)?;
    std::fs::write(output, &redacted.bytes)?;
    Ok(redacted)
}
