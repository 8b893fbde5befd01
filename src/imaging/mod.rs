//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (format guessed from content) |
//! | **Orientation** | EXIF tag 274 via `kamadak-exif`, rotate/flip via `DynamicImage` |
//! | **Strip** | rebuild the photo from its pixel buffer only |
//! | **Resize** | `DynamicImage::resize_exact` with `Lanczos3` |
//! | **Encode** | `DynamicImage::write_to` in the source format |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: [`Bounds`], the bounding box handed in by the driver
//! - **Orientation**: the EXIF code → rotate/mirror table
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: the [`transform`] pipeline

pub mod backend;
pub mod calculations;
pub mod operations;
pub mod orientation;
mod params;
pub mod rust_backend;

pub use backend::{
    BackendError, Dimensions, EmbeddedMetadata, ImageBackend, OpenError, Photo, SkipReason,
    format_label,
};
pub use operations::{TransformError, transform};
pub use params::Bounds;
pub use rust_backend::RustBackend;
