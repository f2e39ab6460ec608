//! Typed decoding of the external analysis results.
//!
//! The layout and entity analyses arrive as JSON from external services.
//! Both are validated into explicit records at this boundary; malformed
//! entries are rejected here rather than surfacing as ambiguous failures
//! deep inside rendering.

mod entities;
mod layout;

pub use entities::parse_entities;
pub use layout::parse_layout;
