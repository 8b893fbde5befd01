//! EXIF orientation: reading tag 274 and the correction table.
//!
//! Cameras store pixels in sensor order and record how to display them in
//! the Orientation tag. Each code maps to a clockwise rotation followed by an
//! optional mirror:
//!
//! | Code | Rotate (cw) | Mirror |
//! |---|---|---|
//! | 1 | 0 | none |
//! | 2 | 0 | horizontal |
//! | 3 | 180 | none |
//! | 4 | 0 | vertical |
//! | 5 | 90 | horizontal |
//! | 6 | 270 | none |
//! | 7 | 270 | horizontal |
//! | 8 | 90 | none |
//!
//! Anything that is not a valid code (no EXIF, no tag, unparseable block,
//! value outside 1–8) is read as 1.

use exif::{In, Tag};
use image::DynamicImage;

/// APP1 segment header some containers leave in front of the TIFF block.
const EXIF_PREFIX: &[u8] = b"Exif\0\0";

/// Identity orientation code.
pub const NORMAL: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    None,
    Cw90,
    Cw180,
    Cw270,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirror {
    None,
    /// Left-right flip.
    Horizontal,
    /// Top-bottom flip.
    Vertical,
}

/// Correction for one orientation code. Rotation is applied before mirroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correction {
    pub rotation: Rotation,
    pub mirror: Mirror,
}

impl Correction {
    pub const IDENTITY: Correction = Correction {
        rotation: Rotation::None,
        mirror: Mirror::None,
    };

    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }
}

const fn entry(rotation: Rotation, mirror: Mirror) -> Correction {
    Correction { rotation, mirror }
}

/// Corrections for codes 1 through 8, indexed by `code - 1`.
static ORIENTATION_TABLE: [Correction; 8] = [
    entry(Rotation::None, Mirror::None),
    entry(Rotation::None, Mirror::Horizontal),
    entry(Rotation::Cw180, Mirror::None),
    entry(Rotation::None, Mirror::Vertical),
    entry(Rotation::Cw90, Mirror::Horizontal),
    entry(Rotation::Cw270, Mirror::None),
    entry(Rotation::Cw270, Mirror::Horizontal),
    entry(Rotation::Cw90, Mirror::None),
];

/// Look up the correction for an orientation code; unknown codes are identity.
pub fn correction_for(code: u8) -> Correction {
    match code {
        1..=8 => ORIENTATION_TABLE[usize::from(code - 1)],
        _ => Correction::IDENTITY,
    }
}

/// Read the orientation code from a raw EXIF block.
pub fn read_orientation(exif: Option<&[u8]>) -> u8 {
    exif.and_then(orientation_tag)
        .and_then(|value| u8::try_from(value).ok())
        .filter(|code| (1..=8).contains(code))
        .unwrap_or(NORMAL)
}

/// Raw value of the Orientation tag in the primary IFD, SHORT or LONG.
fn orientation_tag(raw: &[u8]) -> Option<u32> {
    let tiff = raw.strip_prefix(EXIF_PREFIX).unwrap_or(raw);
    let exif = exif::Reader::new().read_raw(tiff.to_vec()).ok()?;
    exif.get_field(Tag::Orientation, In::PRIMARY)?.value.get_uint(0)
}

/// Rotate, then mirror.
pub fn apply_correction(pixels: DynamicImage, correction: Correction) -> DynamicImage {
    let rotated = match correction.rotation {
        Rotation::None => pixels,
        Rotation::Cw90 => pixels.rotate90(),
        Rotation::Cw180 => pixels.rotate180(),
        Rotation::Cw270 => pixels.rotate270(),
    };
    match correction.mirror {
        Mirror::None => rotated,
        Mirror::Horizontal => rotated.fliph(),
        Mirror::Vertical => rotated.flipv(),
    }
}
