//! Data model for document redaction.
//!
//! These types form the working representation of a document between
//! rasterization and output encoding: pixel pages, detected text regions,
//! sensitive entities, and the redaction marks derived from matching the
//! two analyses against each other.

mod document;
mod entity;
mod page;
mod region;

pub use document::{RasterDocument, RedactedDocument};
pub use entity::Entity;
pub use page::Page;
pub use region::{BoundingBox, RedactionMark, TextRegion};
