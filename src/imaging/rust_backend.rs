//! Pure Rust image backend on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Format detection | `ImageReader::with_guessed_format` (magic bytes, then extension) |
//! | Decode (JPEG, PNG, GIF, TIFF, WebP, BMP) | `image` decoders via `DynamicImage::from_decoder` |
//! | EXIF / ICC capture | `ImageDecoder::exif_metadata` / `ImageDecoder::icc_profile` |
//! | Encode | `DynamicImage::write_to` in the photo's tagged format |

use super::backend::{BackendError, ImageBackend, OpenError, Photo, format_label};
use image::{DynamicImage, ImageDecoder, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Backend using the `image` crate's built-in codecs.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn open(&self, path: &Path) -> Result<Photo, OpenError> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let format = reader.format();
        let mut decoder = reader.into_decoder()?;

        // Unreadable metadata is treated like missing metadata
        let exif = decoder.exif_metadata().ok().flatten();
        let icc_profile = decoder.icc_profile().ok().flatten();

        let mut photo = Photo::new(DynamicImage::from_decoder(decoder)?, format);
        photo.metadata.exif = exif;
        photo.metadata.icc_profile = icc_profile;
        Ok(photo)
    }

    fn encode(&self, photo: &Photo) -> Result<Vec<u8>, BackendError> {
        let format = photo.format.ok_or_else(|| {
            BackendError::ProcessingFailed("No output format set on image".to_string())
        })?;
        let mut buf = Cursor::new(Vec::new());
        photo.pixels.write_to(&mut buf, format).map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "{} encode failed: {}",
                format_label(Some(format)),
                e
            ))
        })?;
        Ok(buf.into_inner())
    }
}
