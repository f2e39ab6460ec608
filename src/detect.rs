//! Document format detection from content signatures.
//!
//! Formats are sniffed from magic bytes only, never from a filename or
//! extension: documents arrive from object storage under arbitrary keys.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
/// JPEG SOI marker followed by a second marker byte.
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
/// PNG signature.
const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
/// TIFF little-endian header: II*\0
const TIFF_MAGIC_LE: &[u8] = &[0x49, 0x49, 0x2A, 0x00];
/// TIFF big-endian header: MM\0*
const TIFF_MAGIC_BE: &[u8] = &[0x4D, 0x4D, 0x00, 0x2A];

/// Number of header bytes needed to classify any supported format.
const SNIFF_LEN: usize = 8;

/// A supported document format, as detected from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// Paged document, rasterized page by page.
    Pdf,
    /// Single-frame raster image.
    Jpeg,
    /// Single-frame raster image.
    Png,
    /// Possibly multi-frame raster image; every frame is one page.
    Tiff,
}

impl DocumentFormat {
    /// MIME type used for content labeling on upload.
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Jpeg => "image/jpeg",
            DocumentFormat::Png => "image/png",
            DocumentFormat::Tiff => "image/tiff",
        }
    }

    /// Look up a format by its MIME type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(DocumentFormat::Pdf),
            "image/jpeg" => Some(DocumentFormat::Jpeg),
            "image/png" => Some(DocumentFormat::Png),
            "image/tiff" => Some(DocumentFormat::Tiff),
            _ => None,
        }
    }

    /// Whether the format must be rasterized before redaction (as opposed
    /// to already being a raster image).
    pub fn is_paged(&self) -> bool {
        matches!(self, DocumentFormat::Pdf)
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mime_type())
    }
}

/// Detect the document format from bytes.
///
/// # Arguments
/// * `data` - Byte slice containing at least the first 8 bytes of the file
///
/// # Returns
/// * `Ok(DocumentFormat)` if a content signature matched
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DocumentFormat> {
    if data.starts_with(PDF_MAGIC) {
        return Ok(DocumentFormat::Pdf);
    }
    if data.starts_with(JPEG_MAGIC) {
        return Ok(DocumentFormat::Jpeg);
    }
    if data.starts_with(PNG_MAGIC) {
        return Ok(DocumentFormat::Png);
    }
    if data.starts_with(TIFF_MAGIC_LE) || data.starts_with(TIFF_MAGIC_BE) {
        return Ok(DocumentFormat::Tiff);
    }

    Err(Error::UnknownFormat)
}

/// Detect the document format from a file path.
///
/// Reads the header bytes and defers to [`detect_format_from_bytes`];
/// the path's extension is never consulted.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<DocumentFormat> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; SNIFF_LEN];
    let read = reader.read(&mut header)?;
    detect_format_from_bytes(&header[..read])
}

/// Check if bytes represent a supported document format.
pub fn is_supported_format(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}
