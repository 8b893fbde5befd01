//! Shared test utilities for the photo-strip test suite.
//!
//! Builders for synthetic fixtures: in-memory marker images for orientation
//! checks, raw EXIF blocks, and encoded JPEG/PNG/GIF files written into a
//! temp directory.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let img = marker_image(3, 2, (0, 0));
//! let rotated = img.rotate90();
//! assert_eq!(find_marker(&rotated), (1, 0));
//!
//! let tmp = TempDir::new().unwrap();
//! std::fs::write(tmp.path().join("a.jpg"), jpeg_with_orientation(40, 20, 6)).unwrap();
//! ```

use image::{DynamicImage, ImageEncoder, Rgb, RgbImage};
use std::path::Path;

const MARKER: Rgb<u8> = Rgb([255, 0, 0]);
const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

// =========================================================================
// In-memory images
// =========================================================================

/// A black RGB image with one red pixel at `marker`.
pub fn marker_image(width: u32, height: u32, marker: (u32, u32)) -> DynamicImage {
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    img.put_pixel(marker.0, marker.1, MARKER);
    DynamicImage::ImageRgb8(img)
}

/// Position of the single red pixel. Panics if there is not exactly one.
pub fn find_marker(img: &DynamicImage) -> (u32, u32) {
    let rgb = img.to_rgb8();
    let found: Vec<(u32, u32)> = rgb
        .enumerate_pixels()
        .filter(|(_, _, p)| **p == MARKER)
        .map(|(x, y, _)| (x, y))
        .collect();
    assert_eq!(found.len(), 1, "expected exactly one marker, found {found:?}");
    found[0]
}

// =========================================================================
// EXIF blocks
// =========================================================================

/// TIFF field type codes used by the EXIF builders.
pub const TYPE_SHORT: u16 = 3;
pub const TYPE_LONG: u16 = 4;

/// A TIFF-structured EXIF block whose IFD0 holds only Orientation (274).
pub fn exif_with_orientation(code: u16, little_endian: bool) -> Vec<u8> {
    exif_with_orientation_as(u32::from(code), TYPE_SHORT, little_endian)
}

/// Like [`exif_with_orientation`], with the value stored as `field_type`
/// (`TYPE_SHORT` or `TYPE_LONG`).
pub fn exif_with_orientation_as(code: u32, field_type: u16, little_endian: bool) -> Vec<u8> {
    let u16_bytes = |v: u16| {
        if little_endian {
            v.to_le_bytes()
        } else {
            v.to_be_bytes()
        }
    };
    let u32_bytes = |v: u32| {
        if little_endian {
            v.to_le_bytes()
        } else {
            v.to_be_bytes()
        }
    };

    let mut exif = Vec::with_capacity(26);
    exif.extend_from_slice(if little_endian { b"II" } else { b"MM" });
    exif.extend(u16_bytes(42));
    exif.extend(u32_bytes(8)); // IFD0 offset
    exif.extend(u16_bytes(1)); // entry count
    exif.extend(u16_bytes(0x0112)); // Orientation
    exif.extend(u16_bytes(field_type));
    exif.extend(u32_bytes(1)); // count
    if field_type == TYPE_LONG {
        exif.extend(u32_bytes(code));
    } else {
        let short = u16::try_from(code).unwrap();
        exif.extend(u16_bytes(short));
        exif.extend([0, 0]);
    }
    exif.extend(u32_bytes(0)); // no next IFD
    exif
}

// =========================================================================
// Encoded files
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// A baseline JPEG with no metadata segments besides JFIF.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

/// A JPEG with an APP1 EXIF segment carrying the given orientation code.
pub fn jpeg_with_orientation(width: u32, height: u32, code: u16) -> Vec<u8> {
    let jpeg = jpeg_bytes(width, height);

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend(exif_with_orientation(code, false));
    let segment_len = u16::try_from(payload.len() + 2).unwrap();

    // SOI, then APP1, then the rest of the encoder output
    let mut out = jpeg[..2].to_vec();
    out.extend([0xFF, 0xE1]);
    out.extend(segment_len.to_be_bytes());
    out.extend(payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// A 4x2 8-bit palette BMP: black everywhere except a red pixel at (0, 1).
///
/// Rows are stored bottom-up, so the red index sits in the first stored row.
pub fn palette_bmp_bytes() -> Vec<u8> {
    const WIDTH: i32 = 4;
    const HEIGHT: i32 = 2;
    let palette: [[u8; 4]; 2] = [[0, 0, 0, 0], [0, 0, 255, 0]]; // BGR0
    let rows: [[u8; 4]; 2] = [[1, 0, 0, 0], [0, 0, 0, 0]];

    let data_offset: u32 = 14 + 40 + 4 * palette.len() as u32;
    let file_size = data_offset + 4 * rows.len() as u32;

    let mut bmp = b"BM".to_vec();
    bmp.extend(file_size.to_le_bytes());
    bmp.extend([0u8; 4]);
    bmp.extend(data_offset.to_le_bytes());

    bmp.extend(40u32.to_le_bytes());
    bmp.extend(WIDTH.to_le_bytes());
    bmp.extend(HEIGHT.to_le_bytes());
    bmp.extend(1u16.to_le_bytes()); // planes
    bmp.extend(8u16.to_le_bytes()); // bits per pixel
    bmp.extend(0u32.to_le_bytes()); // BI_RGB
    bmp.extend((4 * rows.len() as u32).to_le_bytes());
    bmp.extend(2835i32.to_le_bytes());
    bmp.extend(2835i32.to_le_bytes());
    bmp.extend((palette.len() as u32).to_le_bytes());
    bmp.extend(0u32.to_le_bytes());

    for entry in palette {
        bmp.extend(entry);
    }
    for row in rows {
        bmp.extend(row);
    }
    bmp
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    gradient(width, height)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

pub fn write_gif(path: &Path, width: u32, height: u32) {
    DynamicImage::ImageRgb8(gradient(width, height))
        .to_rgba8()
        .save_with_format(path, image::ImageFormat::Gif)
        .unwrap();
}
