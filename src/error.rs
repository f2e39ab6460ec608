//! Error types for the blackout library.

use std::io;
use thiserror::Error;

/// Result type alias for blackout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document redaction.
///
/// Every variant except [`Error::InvalidBatch`] is fatal to a single
/// document only: the batch driver catches it, records the failure in the
/// report, and moves on to the next item.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document content matched no supported format signature.
    #[error("Unknown file format: no content signature matched")]
    UnknownFormat,

    /// Rasterization produced an empty page sequence.
    #[error("No renderable content: document produced zero pages")]
    NoRenderableContent,

    /// The layout analysis JSON was malformed or failed validation.
    #[error("Malformed layout analysis: {0}")]
    MalformedLayout(String),

    /// The entity analysis JSON was malformed or failed validation.
    #[error("Malformed entity analysis: {0}")]
    MalformedEntities(String),

    /// Error decoding or re-encoding a raster image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Error loading or rendering a PDF document.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Error reading a TIFF container.
    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    /// Failure writing or encoding the redacted output.
    #[error("Render error: {0}")]
    Render(String),

    /// Failure fetching an object from the storage collaborator.
    #[error("Failed to fetch '{key}': {message}")]
    Fetch {
        /// Object key that could not be fetched.
        key: String,
        /// Underlying failure description.
        message: String,
    },

    /// Failure uploading an object to the storage collaborator.
    #[error("Failed to upload '{key}': {message}")]
    Upload {
        /// Object key that could not be written.
        key: String,
        /// Underlying failure description.
        message: String,
    },

    /// Failure removing working files or stored originals.
    ///
    /// Logged and swallowed by the batch driver; never reverses a prior
    /// success or failure determination.
    #[error("Cleanup error: {0}")]
    Cleanup(String),

    /// The batch input itself is structurally invalid.
    ///
    /// The only error that propagates out of a batch invocation.
    #[error("Invalid batch input: {0}")]
    InvalidBatch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownFormat;
        assert_eq!(
            err.to_string(),
            "Unknown file format: no content signature matched"
        );

        let err = Error::Fetch {
            key: "docs/a.pdf".into(),
            message: "not found".into(),
        };
        assert_eq!(err.to_string(), "Failed to fetch 'docs/a.pdf': not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
