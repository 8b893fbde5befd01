//! # Photo Strip
//!
//! Batch-prepares photos for sharing. Every file in an input directory is
//! decoded, turned upright according to its EXIF orientation, stripped of all
//! embedded metadata, downsized to fit a bounding box, and written to an
//! output directory in its original format.
//!
//! # Architecture
//!
//! ```text
//! config  →  process (walk + per-file loop)  →  output (console lines)
//!                 │
//!                 └─ imaging: open → transform → encode
//! ```
//!
//! The per-file transform is a pure function over owned values, so it is
//! unit-testable without touching the filesystem. The driver talks to the
//! imaging library through the [`imaging::ImageBackend`] trait; tests use a
//! recording mock.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `photo-strip.toml` loading, CLI overrides, validation |
//! | [`imaging`] | Decode, EXIF orientation, metadata stripping, Lanczos3 resize, encode |
//! | [`process`] | The batch driver: directory walk, per-file error isolation, report |
//! | [`output`] | Console formatting of progress events and the batch summary |
//!
//! # Design Decisions
//!
//! ## Same Format Out As In
//!
//! A JPEG stays a JPEG and a PNG stays a PNG. Only GIFs are left alone, since
//! re-encoding would flatten animations to their first frame.
//!
//! ## Never Enlarge
//!
//! The bounding box is an upper limit. Photos already inside it are written
//! at their original size (still re-encoded, so their metadata is gone).
//!
//! ## One Bad File Never Stops the Batch
//!
//! Unreadable inputs are skipped and failed writes are recorded. Only a
//! missing input or output directory aborts, and it does so before any file
//! is touched.

pub mod config;
pub mod imaging;
pub mod output;
pub mod process;

#[cfg(test)]
pub(crate) mod test_helpers;
