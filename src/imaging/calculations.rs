//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::Bounds;

/// Which axis decided the scale factor of a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Width,
    Height,
}

/// Target dimensions for a downsizing resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePlan {
    pub width: u32,
    pub height: u32,
    pub constraint: Constraint,
}

/// Calculate the size an image must be scaled to in order to fit `bounds`.
///
/// Returns `None` when no resize is needed: the image already fits, or the
/// bounds are unconstrained on every axis it exceeds. Images smaller than the
/// bounds are never scaled up.
///
/// Width is the binding constraint when it exceeds `max_width` and scaling to
/// that width would not push the height past `max_height`, i.e.
/// `width * max_height >= height * max_width`. On an exact tie width wins.
///
/// # Examples
/// ```text
/// // 2000x1000 into 1024x1024 → width binds → 1024x512
/// // 1000x2000 into 1024x1024 → height binds → 512x1024
/// // 800x600 into 1024x1024   → None
/// ```
pub fn plan_resize(source: (u32, u32), bounds: &Bounds) -> Option<ResizePlan> {
    if bounds.is_unbounded() {
        return None;
    }
    let (width, height) = source;

    if let Some(max_width) = bounds.max_width {
        let height_allows = match bounds.max_height {
            None => true,
            Some(max_height) => {
                u64::from(width) * u64::from(max_height) >= u64::from(height) * u64::from(max_width)
            }
        };
        if width > max_width && height_allows {
            return Some(ResizePlan {
                width: max_width,
                height: scale_edge(height, max_width, width),
                constraint: Constraint::Width,
            });
        }
    }

    match bounds.max_height {
        Some(max_height) if height > max_height => Some(ResizePlan {
            width: scale_edge(width, max_height, height),
            height: max_height,
            constraint: Constraint::Height,
        }),
        _ => None,
    }
}

/// Scale `edge` by `numerator / denominator`, rounded to the nearest pixel.
/// Exact halves round to the even neighbour.
///
/// Never returns 0: a very thin image still keeps one row or column.
fn scale_edge(edge: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled =
        (f64::from(edge) * f64::from(numerator) / f64::from(denominator)).round_ties_even();
    (scaled as u32).max(1)
}
