use crate::foundation::core::{Affine, PixelSize, Point, Rect, Size, Vec2, check_display_size};
use crate::foundation::error::{TryOnError, TryOnResult};
use crate::foundation::math::{clamp_percent, ensure_finite};
use crate::placement::state::PlacementState;

/// The on-screen overlay sizing rule.
///
/// Base width is `min(displayed_width * base_fraction, max_base_width_px)`; the overlay is drawn at
/// `base * scale`. Both the live preview and the exporter go through this type.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SizingRules {
    /// Fraction of the displayed photo width used as the base overlay width.
    pub base_fraction: f64,
    /// Upper bound of the base overlay width, in on-screen pixels.
    pub max_base_width_px: f64,
}

impl Default for SizingRules {
    fn default() -> Self {
        Self {
            base_fraction: 0.4,
            max_base_width_px: 200.0,
        }
    }
}

impl SizingRules {
    /// Reject non-positive or non-finite rule values.
    pub fn validate(&self) -> TryOnResult<()> {
        for (v, what) in [
            (self.base_fraction, "sizing base_fraction"),
            (self.max_base_width_px, "sizing max_base_width_px"),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(TryOnError::config(format!("{what} must be finite and > 0")));
            }
        }
        Ok(())
    }

    /// Base overlay width (before `scale`) for a photo displayed `displayed_width` pixels wide.
    pub fn base_display_width(&self, displayed_width: f64) -> f64 {
        (displayed_width * self.base_fraction).min(self.max_base_width_px)
    }

    /// On-screen overlay width for the given displayed photo width and placement scale.
    pub fn overlay_display_width(&self, displayed_width: f64, scale: f64) -> f64 {
        self.base_display_width(displayed_width) * scale
    }
}

/// A photo's natural size paired with the size it is currently displayed at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhotoGeometry {
    /// Intrinsic pixel size.
    pub natural: PixelSize,
    /// Rendered size in the current layout. Zero means "not laid out yet".
    pub displayed: Size,
}

impl PhotoGeometry {
    /// Pair a natural size with a displayed size, rejecting zero natural dimensions and negative
    /// or non-finite displayed ones.
    pub fn new(natural: PixelSize, displayed: Size) -> TryOnResult<Self> {
        natural.validate()?;
        check_display_size(displayed, "displayed photo size")?;
        Ok(Self { natural, displayed })
    }

    /// Displayed width, falling back to the natural width when the photo has no layout yet.
    pub fn effective_displayed_width(&self) -> f64 {
        if self.displayed.width > 0.0 {
            self.displayed.width
        } else {
            f64::from(self.natural.width)
        }
    }

    /// Natural pixels per displayed pixel.
    pub fn natural_to_display_scale(&self) -> f64 {
        f64::from(self.natural.width) / self.effective_displayed_width()
    }
}

/// Overlay pose resolved into a concrete pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayPlacement {
    /// Center and rotation pivot.
    pub anchor: Point,
    /// Overlay width/height in the target pixel space.
    pub size: Size,
    /// Clockwise rotation in radians (y points down).
    pub rotation: f64,
}

impl OverlayPlacement {
    /// Translate to the anchor, then rotate about it.
    pub fn anchor_transform(&self) -> Affine {
        Affine::translate(self.anchor.to_vec2()) * Affine::rotate(self.rotation)
    }

    /// Destination rectangle in anchor-local space (centered on the origin).
    pub fn local_rect(&self) -> Rect {
        Rect::new(
            -self.size.width / 2.0,
            -self.size.height / 2.0,
            self.size.width / 2.0,
            self.size.height / 2.0,
        )
    }

    /// Axis-aligned bounds of the rotated overlay in the target space.
    pub fn bounds(&self) -> Rect {
        self.anchor_transform().transform_rect_bbox(self.local_rect())
    }
}

/// The single mapping shared by the interactive preview, drag handling and export.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoordinateTransform {
    rules: SizingRules,
}

impl CoordinateTransform {
    /// Build a transform using the given sizing rules.
    pub fn new(rules: SizingRules) -> Self {
        Self { rules }
    }

    /// Sizing rules in effect.
    pub fn rules(&self) -> &SizingRules {
        &self.rules
    }

    /// Anchor pixel position inside a container of the given size.
    pub fn anchor_px(&self, container: Size, state: &PlacementState) -> Point {
        let (fx, fy) = state.anchor_fraction();
        Point::new(fx * container.width, fy * container.height)
    }

    /// State -> on-screen geometry for a photo filling `container`.
    pub fn screen_placement(
        &self,
        container: Size,
        overlay: PixelSize,
        state: &PlacementState,
    ) -> TryOnResult<OverlayPlacement> {
        check_display_size(container, "container size")?;
        overlay.validate()?;
        state.validate()?;

        let width = self.rules.overlay_display_width(container.width, state.scale);
        Ok(OverlayPlacement {
            anchor: self.anchor_px(container, state),
            size: Size::new(width, overlay_height(overlay, width)),
            rotation: state.rotation,
        })
    }

    /// State -> natural-pixel geometry of the photo, reproducing the on-screen rule scaled by
    /// `natural / displayed`.
    pub fn source_placement(
        &self,
        photo: &PhotoGeometry,
        overlay: PixelSize,
        state: &PlacementState,
    ) -> TryOnResult<OverlayPlacement> {
        overlay.validate()?;
        state.validate()?;

        let displayed_width = photo.effective_displayed_width();
        let width = self.rules.overlay_display_width(displayed_width, state.scale)
            * photo.natural_to_display_scale();
        Ok(OverlayPlacement {
            anchor: self.anchor_px(photo.natural.as_size(), state),
            size: Size::new(width, overlay_height(overlay, width)),
            rotation: state.rotation,
        })
    }

    /// Offset captured at drag start: `pointer - anchor`.
    pub fn drag_offset(&self, container: Size, state: &PlacementState, pointer: Point) -> Vec2 {
        pointer - self.anchor_px(container, state)
    }

    /// Pointer position (container-relative) -> clamped `(x%, y%)`.
    pub fn pointer_to_anchor(
        &self,
        container: Size,
        pointer: Point,
        drag_offset: Vec2,
    ) -> TryOnResult<(f64, f64)> {
        check_display_size(container, "container size")?;
        if container.width <= 0.0 || container.height <= 0.0 {
            return Err(TryOnError::geometry(
                "cannot map a pointer into a zero-sized container",
            ));
        }
        ensure_finite(pointer.x, "pointer x")?;
        ensure_finite(pointer.y, "pointer y")?;

        let p = pointer - drag_offset;
        let x = (p.x / container.width) * 100.0;
        let y = (p.y / container.height) * 100.0;
        Ok((clamp_percent(x), clamp_percent(y)))
    }
}

fn overlay_height(overlay: PixelSize, width: f64) -> f64 {
    (f64::from(overlay.height) / f64::from(overlay.width)) * width
}

#[cfg(test)]
#[path = "../../tests/unit/transform/geometry.rs"]
mod tests;
