//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the batch driver
//! needs from an imaging library: open (decode pixels and capture embedded
//! metadata) and encode (serialize a [`Photo`] in its tagged format).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) on top of the `image`
//! crate. Tests swap in a mock that records calls.

use image::{DynamicImage, ImageError, ImageFormat};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Why a file could not be opened as an image.
///
/// The batch driver skips all three the same way; the kind is kept so the
/// report and the tests can tell them apart.
#[derive(Error, Debug)]
pub enum OpenError {
    #[error("Unsupported format: {0}")]
    Unsupported(String),
    #[error("Corrupt image data: {0}")]
    Corrupt(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ImageError> for OpenError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::IoError(e) => OpenError::Io(e),
            ImageError::Unsupported(e) => OpenError::Unsupported(e.to_string()),
            other => OpenError::Corrupt(other.to_string()),
        }
    }
}

impl OpenError {
    pub fn reason(&self) -> SkipReason {
        match self {
            OpenError::Unsupported(_) => SkipReason::Unsupported,
            OpenError::Corrupt(_) => SkipReason::Corrupt,
            OpenError::Io(_) => SkipReason::Io,
        }
    }
}

/// Serializable classification of an [`OpenError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Unsupported,
    Corrupt,
    Io,
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Metadata blocks carried alongside the pixels of a decoded file.
///
/// `exif` holds the raw TIFF-structured EXIF payload, starting at the byte
/// order mark (`II`/`MM`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddedMetadata {
    pub exif: Option<Vec<u8>>,
    pub icc_profile: Option<Vec<u8>>,
}

impl EmbeddedMetadata {
    pub fn is_empty(&self) -> bool {
        self.exif.is_none() && self.icc_profile.is_none()
    }
}

/// A decoded image: pixels, the format it was read as, and its metadata.
///
/// `format` is `None` for images built in memory; the pipeline re-tags the
/// result with the source format before encoding.
#[derive(Debug, Clone)]
pub struct Photo {
    pub pixels: DynamicImage,
    pub format: Option<ImageFormat>,
    pub metadata: EmbeddedMetadata,
}

impl Photo {
    pub fn new(pixels: DynamicImage, format: Option<ImageFormat>) -> Self {
        Self {
            pixels,
            format,
            metadata: EmbeddedMetadata::default(),
        }
    }

    pub fn with_exif(mut self, exif: Vec<u8>) -> Self {
        self.metadata.exif = Some(exif);
        self
    }

    pub fn with_icc_profile(mut self, icc_profile: Vec<u8>) -> Self {
        self.metadata.icc_profile = Some(icc_profile);
        self
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.pixels.width(),
            height: self.pixels.height(),
        }
    }

    pub fn has_exif(&self) -> bool {
        self.metadata.exif.is_some()
    }

    pub fn is_gif(&self) -> bool {
        self.format == Some(ImageFormat::Gif)
    }
}

/// Display name of an image format, e.g. `JPEG`, `PNG`, `GIF`.
pub fn format_label(format: Option<ImageFormat>) -> String {
    match format {
        Some(format) => format!("{format:?}").to_uppercase(),
        None => "UNKNOWN".to_string(),
    }
}

/// Trait for image backends.
pub trait ImageBackend {
    /// Decode an image file, capturing EXIF and ICC metadata if present.
    fn open(&self, path: &Path) -> Result<Photo, OpenError>;

    /// Encode a photo in its tagged format.
    fn encode(&self, photo: &Photo) -> Result<Vec<u8>, BackendError>;
}
