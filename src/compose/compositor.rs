use std::sync::Arc;

use crate::compose::canvas::Canvas;
use crate::compose::raster::{ImageSlot, RasterImage};
use crate::config::EngineConfig;
use crate::foundation::core::Size;
use crate::foundation::error::{TryOnError, TryOnResult};
use crate::placement::state::PlacementState;
use crate::transform::geometry::{
    CoordinateTransform, OverlayPlacement, PhotoGeometry, SizingRules,
};

/// Bakes a photo and the overlay into one image at the photo's natural resolution.
///
/// Output is deterministic for a given `(photo, overlay, state, displayed size)`.
#[derive(Clone, Debug, Default)]
pub struct Compositor {
    transform: CoordinateTransform,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl Compositor {
    /// Compositor using the global rayon pool.
    pub fn new(rules: SizingRules) -> Self {
        Self {
            transform: CoordinateTransform::new(rules),
            pool: None,
        }
    }

    /// Compositor with a dedicated pool of `threads` workers (`None` = global pool).
    pub fn with_threads(rules: SizingRules, threads: Option<usize>) -> TryOnResult<Self> {
        let pool = match threads {
            None => None,
            Some(n) => Some(Arc::new(build_thread_pool(n)?)),
        };
        Ok(Self {
            transform: CoordinateTransform::new(rules),
            pool,
        })
    }

    /// Compositor configured from [`EngineConfig::sizing`] and [`EngineConfig::render_threads`].
    pub fn from_config(config: &EngineConfig) -> TryOnResult<Self> {
        Self::with_threads(config.sizing, config.render_threads)
    }

    /// The coordinate transform shared with the live preview.
    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    /// Composite from decode slots; rejects unless both images are fully decoded.
    pub fn composite(
        &self,
        photo: &ImageSlot,
        overlay: &ImageSlot,
        state: &PlacementState,
        displayed_photo: Size,
    ) -> TryOnResult<RasterImage> {
        let photo = photo.decoded("photo")?;
        let overlay = overlay.decoded("overlay graphic")?;
        self.composite_decoded(photo, overlay, state, displayed_photo)
    }

    /// Where the overlay lands in the photo's natural pixel space.
    pub fn overlay_placement(
        &self,
        photo: &RasterImage,
        overlay: &RasterImage,
        state: &PlacementState,
        displayed_photo: Size,
    ) -> TryOnResult<OverlayPlacement> {
        let geometry = PhotoGeometry::new(photo.size(), displayed_photo)?;
        self.transform
            .source_placement(&geometry, overlay.size(), state)
    }

    /// Composite two decoded images.
    #[tracing::instrument(skip_all, fields(photo = %photo.size(), overlay = %overlay.size()))]
    pub fn composite_decoded(
        &self,
        photo: &RasterImage,
        overlay: &RasterImage,
        state: &PlacementState,
        displayed_photo: Size,
    ) -> TryOnResult<RasterImage> {
        let placement = self.overlay_placement(photo, overlay, state, displayed_photo)?;
        let size = placement.size;
        if !size.width.is_finite() || !size.height.is_finite() || size.width <= 0.0 {
            return Err(TryOnError::geometry(format!(
                "overlay resolves to an unusable size {}x{}",
                size.width, size.height
            )));
        }

        let render = || -> TryOnResult<RasterImage> {
            let mut canvas = Canvas::new(photo.size())?;
            canvas.blit(photo);
            canvas.with_transform(placement.anchor_transform(), |c| {
                c.draw_image(overlay, placement.local_rect())
            })?;
            canvas.into_image()
        };

        let out = match &self.pool {
            Some(pool) => pool.install(render)?,
            None => render()?,
        };
        tracing::debug!(
            anchor_x = placement.anchor.x,
            anchor_y = placement.anchor.y,
            width = size.width,
            height = size.height,
            rotation = placement.rotation,
            "composited overlay"
        );
        Ok(out)
    }
}

fn build_thread_pool(threads: usize) -> TryOnResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(TryOnError::config("render threads must be >= 1 when set"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| TryOnError::config(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
