//! The orientation/resize transform.
//!
//! [`transform`] is a pure pipeline over owned values:
//!
//! ```text
//! Photo ─► correct_orientation ─► strip_metadata ─► constrain_size ─► tag_format ─► Photo
//! ```
//!
//! Each stage takes a [`Photo`] by value and returns a new one, so there is
//! never more than one live handle on a pixel buffer. The input is consumed;
//! callers that need the original must clone it first.

use super::backend::Photo;
use super::calculations::plan_resize;
use super::orientation::{apply_correction, correction_for, read_orientation};
use super::params::Bounds;
use image::ImageFormat;
use image::imageops::FilterType;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TransformError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Correct orientation, strip metadata, and downsize to fit `bounds`.
///
/// The result has no EXIF or ICC metadata, the same color type as the input,
/// and the input's format tag.
pub fn transform(photo: Photo, bounds: &Bounds) -> Result<Photo, TransformError> {
    let dims = photo.dimensions();
    if dims.width == 0 || dims.height == 0 {
        return Err(TransformError::InvalidInput(format!(
            "image has no pixels ({}x{})",
            dims.width, dims.height
        )));
    }

    let format = photo.format;
    let oriented = correct_orientation(photo);
    let stripped = strip_metadata(oriented);
    let resized = constrain_size(stripped, bounds);
    Ok(tag_format(resized, format))
}

/// Rotate and mirror the pixels according to the photo's EXIF orientation.
///
/// Metadata is carried through untouched; [`strip_metadata`] drops it next.
pub fn correct_orientation(photo: Photo) -> Photo {
    let code = read_orientation(photo.metadata.exif.as_deref());
    let correction = correction_for(code);
    if correction.is_identity() {
        return photo;
    }
    Photo {
        pixels: apply_correction(photo.pixels, correction),
        ..photo
    }
}

/// Keep only the pixel buffer.
///
/// EXIF, ICC profile and the format tag are all left behind.
pub fn strip_metadata(photo: Photo) -> Photo {
    Photo::new(photo.pixels, None)
}

/// Downsize with Lanczos3 if the photo exceeds `bounds`; otherwise return it as is.
pub fn constrain_size(photo: Photo, bounds: &Bounds) -> Photo {
    let dims = photo.dimensions();
    match plan_resize((dims.width, dims.height), bounds) {
        Some(plan) => Photo {
            pixels: photo
                .pixels
                .resize_exact(plan.width, plan.height, FilterType::Lanczos3),
            ..photo
        },
        None => photo,
    }
}

/// Set the format the photo will be encoded in.
pub fn tag_format(photo: Photo, format: Option<ImageFormat>) -> Photo {
    Photo { format, ..photo }
}
