//! Initial overlay placement from image dimensions alone.
//!
//! This is a placement *guess*, not a face detector: no pixel content is inspected. It assumes a
//! face sits in the upper-center of the photo and sizes the overlay from the shorter side. Whether a
//! "no face detected" warning is shown is a UI policy decision layered on top; the heuristic always
//! returns a pose for valid dimensions.

use crate::foundation::core::PixelSize;
use crate::foundation::error::TryOnResult;
use crate::placement::state::PlacementState;

const ANCHOR_Y_DEFAULT: f64 = 0.32;
const ANCHOR_Y_PORTRAIT: f64 = 0.28;
const ANCHOR_Y_WIDE: f64 = 0.35;
const PORTRAIT_ASPECT_MAX: f64 = 0.8;
const WIDE_ASPECT_MIN: f64 = 1.5;

const SCALE_REFERENCE_SIDE: f64 = 350.0;
const SCALE_MIN: f64 = 0.7;
const SCALE_MAX: f64 = 2.2;
const SMALL_SIDE_PX: u32 = 400;
const LARGE_SIDE_PX: u32 = 800;

/// Source of initial placements, injected into the interaction controller.
pub trait PlacementSource: Send + Sync {
    /// Propose a pose for a photo of the given natural size.
    fn propose(&self, photo: PixelSize) -> TryOnResult<PlacementState>;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// The deterministic size/aspect heuristic.
#[derive(Clone, Copy, Debug, Default)]
pub struct SizeAspectHeuristic;

impl PlacementSource for SizeAspectHeuristic {
    fn propose(&self, photo: PixelSize) -> TryOnResult<PlacementState> {
        propose_for(photo)
    }

    fn name(&self) -> &'static str {
        "size-aspect"
    }
}

/// Propose a placement for a `width` x `height` photo. Zero dimensions are rejected.
pub fn propose(width: u32, height: u32) -> TryOnResult<PlacementState> {
    propose_for(PixelSize::new(width, height)?)
}

#[tracing::instrument]
fn propose_for(photo: PixelSize) -> TryOnResult<PlacementState> {
    photo.validate()?;

    let width = f64::from(photo.width);
    let height = f64::from(photo.height);
    let aspect = photo.aspect();

    let center_x = width / 2.0;
    let center_y = height * anchor_y_fraction(aspect);
    let scale = proposed_scale(photo.min_side());

    let x = (center_x / width) * 100.0;
    let y = (center_y / height) * 100.0;

    tracing::debug!(aspect, x, y, scale, "proposed placement");
    PlacementState::new(x, y, scale, 0.0)
}

fn anchor_y_fraction(aspect: f64) -> f64 {
    if aspect < PORTRAIT_ASPECT_MAX {
        ANCHOR_Y_PORTRAIT
    } else if aspect > WIDE_ASPECT_MIN {
        ANCHOR_Y_WIDE
    } else {
        ANCHOR_Y_DEFAULT
    }
}

fn proposed_scale(min_side: u32) -> f64 {
    let base = (f64::from(min_side) / SCALE_REFERENCE_SIDE).clamp(SCALE_MIN, SCALE_MAX);
    if min_side < SMALL_SIDE_PX {
        (base * 1.1).max(0.8)
    } else if min_side > LARGE_SIDE_PX {
        (base * 0.9).max(0.6)
    } else {
        base
    }
}

#[cfg(test)]
#[path = "../../tests/unit/placement/heuristic.rs"]
mod tests;
