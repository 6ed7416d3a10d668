use crate::foundation::error::{TryOnError, TryOnResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Intrinsic ("natural") pixel dimensions of a decoded image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelSize {
    /// Build a size, rejecting zero on either axis.
    pub fn new(width: u32, height: u32) -> TryOnResult<Self> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    /// Reject zero-area dimensions.
    pub fn validate(self) -> TryOnResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TryOnError::geometry(format!(
                "natural dimensions must be > 0 (got {}x{})",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Width divided by height.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Shorter of the two sides.
    pub fn min_side(self) -> u32 {
        self.width.min(self.height)
    }

    /// Floating-point view for geometry math.
    pub fn as_size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> TryOnResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| TryOnError::geometry("rgba8 buffer size overflow"))
    }
}

impl std::fmt::Display for PixelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Reject on-screen sizes that are negative or non-finite. Zero is allowed (not laid out yet).
pub(crate) fn check_display_size(size: Size, what: &str) -> TryOnResult<()> {
    if !size.width.is_finite() || !size.height.is_finite() || size.width < 0.0 || size.height < 0.0
    {
        return Err(TryOnError::geometry(format!(
            "{what} must be finite and >= 0 (got {}x{})",
            size.width, size.height
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
