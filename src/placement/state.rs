use crate::foundation::error::{TryOnError, TryOnResult};
use crate::foundation::math::{clamp_percent, ensure_finite};

/// Overlay pose relative to the photo container.
///
/// `x`/`y` are percentages of the container width/height in `[0, 100]`, `scale` multiplies the
/// base on-screen overlay width, and `rotation` is in radians (positive = clockwise, unbounded).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlacementState {
    /// Horizontal anchor, percent of container width.
    pub x: f64,
    /// Vertical anchor, percent of container height.
    pub y: f64,
    /// Multiplier applied to the base overlay width.
    pub scale: f64,
    /// Rotation about the anchor in radians.
    pub rotation: f64,
}

impl Default for PlacementState {
    fn default() -> Self {
        Self {
            x: 50.0,
            y: 35.0,
            scale: 1.2,
            rotation: 0.0,
        }
    }
}

impl PlacementState {
    /// Lowest scale any mutation may produce.
    pub const MIN_SCALE: f64 = 0.1;

    /// Build a state, clamping `x`/`y` into `[0, 100]` and rejecting non-finite or non-positive
    /// scale and non-finite rotation.
    pub fn new(x: f64, y: f64, scale: f64, rotation: f64) -> TryOnResult<Self> {
        let state = Self {
            x: clamp_percent(ensure_finite(x, "placement x")?),
            y: clamp_percent(ensure_finite(y, "placement y")?),
            scale: ensure_finite(scale, "placement scale")?,
            rotation: ensure_finite(rotation, "placement rotation")?,
        };
        state.validate()?;
        Ok(state)
    }

    /// Check the pose invariants without modifying anything.
    pub fn validate(&self) -> TryOnResult<()> {
        for (v, what) in [
            (self.x, "placement x"),
            (self.y, "placement y"),
            (self.scale, "placement scale"),
            (self.rotation, "placement rotation"),
        ] {
            ensure_finite(v, what)?;
        }
        if !(0.0..=100.0).contains(&self.x) || !(0.0..=100.0).contains(&self.y) {
            return Err(TryOnError::geometry(format!(
                "placement anchor must lie in [0, 100] (got {}, {})",
                self.x, self.y
            )));
        }
        if self.scale <= 0.0 {
            return Err(TryOnError::geometry(format!(
                "placement scale must be > 0 (got {})",
                self.scale
            )));
        }
        Ok(())
    }

    /// Anchor as fractions of the container (`x / 100`, `y / 100`).
    pub fn anchor_fraction(&self) -> (f64, f64) {
        (self.x / 100.0, self.y / 100.0)
    }
}

/// Where the current placement came from. Informational, for UI policy layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementOrigin {
    /// Configured default pose (auto-positioning disabled on load).
    Default,
    /// Produced by a [`crate::PlacementSource`].
    Proposed,
    /// Changed by user interaction since it was set.
    Adjusted,
}

#[cfg(test)]
#[path = "../../tests/unit/placement/state.rs"]
mod tests;
