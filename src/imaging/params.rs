//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! the batch driver (which reads them from config) and the
//! [`operations`](super::operations) pipeline (which applies them).
//!
//! ## Types
//!
//! - [`Bounds`]: optional maximum width/height. A zero from config means "unconstrained".

use serde::Serialize;

/// Bounding box an image must fit within.
///
/// `None` on an axis leaves that axis unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

impl Bounds {
    /// Build bounds from raw config values, treating `0` as unconstrained.
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width: (max_width > 0).then_some(max_width),
            max_height: (max_height > 0).then_some(max_height),
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_width.is_none() && self.max_height.is_none()
    }
}
