use std::ops::{Deref, DerefMut};

use rayon::prelude::*;

use crate::compose::blend::{over, sample_bilinear};
use crate::compose::raster::RasterImage;
use crate::foundation::core::{Affine, PixelSize, Point, Rect};
use crate::foundation::error::{TryOnError, TryOnResult};

/// Below this determinant a draw transform is treated as collapsed.
const MIN_DETERMINANT: f64 = 1e-12;

/// A premultiplied RGBA8 drawing surface with a current transform.
///
/// Transforms are changed through [`Canvas::save`], which returns a guard restoring the previous
/// transform when dropped, so a failed draw can never leave a rotation applied.
#[derive(Debug)]
pub struct Canvas {
    size: PixelSize,
    data: Vec<u8>,
    transform: Affine,
}

impl Canvas {
    /// Transparent canvas of the given size.
    pub fn new(size: PixelSize) -> TryOnResult<Self> {
        let len = size.rgba8_len()?;
        Ok(Self {
            size,
            data: vec![0; len],
            transform: Affine::IDENTITY,
        })
    }

    /// Canvas size.
    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Current user-space to canvas transform.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Post-multiply the current transform (like a 2D context's `transform`).
    pub fn concat(&mut self, t: Affine) {
        self.transform = self.transform * t;
    }

    /// Open a transform scope; the transform in effect now is restored when the guard drops.
    pub fn save(&mut self) -> TransformScope<'_> {
        let saved = self.transform;
        TransformScope {
            canvas: self,
            saved,
        }
    }

    /// Run `draw` with `t` applied on top of the current transform, restoring it afterwards
    /// whether or not `draw` succeeds.
    pub fn with_transform<R>(
        &mut self,
        t: Affine,
        draw: impl FnOnce(&mut Canvas) -> TryOnResult<R>,
    ) -> TryOnResult<R> {
        let mut scope = self.save();
        scope.concat(t);
        draw(&mut scope)
    }

    /// Copy `img` 1:1 onto the canvas at integer offset `(0, 0)`, ignoring the transform.
    pub fn blit(&mut self, img: &RasterImage) {
        let cw = self.size.width as usize;
        let iw = img.width().min(self.size.width) as usize;
        let ih = img.height().min(self.size.height) as usize;
        let src_stride = img.width() as usize * 4;
        let src = img.data();

        self.data
            .par_chunks_exact_mut(cw * 4)
            .take(ih)
            .enumerate()
            .for_each(|(y, row)| {
                let src_row = &src[y * src_stride..y * src_stride + iw * 4];
                for (d, s) in row[..iw * 4]
                    .chunks_exact_mut(4)
                    .zip(src_row.chunks_exact(4))
                {
                    let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], 1.0);
                    d.copy_from_slice(&out);
                }
            });
    }

    /// Draw `img` stretched into `dest` (user space), through the current transform.
    ///
    /// Each covered canvas pixel is inverse-mapped into the image and bilinearly sampled.
    pub fn draw_image(&mut self, img: &RasterImage, dest: Rect) -> TryOnResult<()> {
        let finite = [dest.x0, dest.y0, dest.x1, dest.y1]
            .iter()
            .all(|v| v.is_finite());
        if !finite || dest.width() <= 0.0 || dest.height() <= 0.0 {
            return Err(TryOnError::geometry(format!(
                "draw_image destination must be finite with positive area (got {dest:?})"
            )));
        }

        let image_to_canvas = self.transform
            * Affine::translate((dest.x0, dest.y0))
            * Affine::scale_non_uniform(
                dest.width() / f64::from(img.width()),
                dest.height() / f64::from(img.height()),
            );
        let det = image_to_canvas.determinant();
        if !det.is_finite() || det.abs() < MIN_DETERMINANT {
            return Err(TryOnError::geometry("draw transform is degenerate"));
        }
        let canvas_to_image = image_to_canvas.inverse();

        let image_rect = Rect::new(0.0, 0.0, f64::from(img.width()), f64::from(img.height()));
        let bbox = image_to_canvas.transform_rect_bbox(image_rect);
        let cw = f64::from(self.size.width);
        let ch = f64::from(self.size.height);
        let x0 = bbox.x0.floor().clamp(0.0, cw) as usize;
        let x1 = bbox.x1.ceil().clamp(0.0, cw) as usize;
        let y0 = bbox.y0.floor().clamp(0.0, ch) as usize;
        let y1 = bbox.y1.ceil().clamp(0.0, ch) as usize;
        if x0 >= x1 || y0 >= y1 {
            tracing::debug!(?bbox, "draw_image fully outside canvas");
            return Ok(());
        }

        let stride = self.size.width as usize * 4;
        self.data[y0 * stride..y1 * stride]
            .par_chunks_exact_mut(stride)
            .enumerate()
            .for_each(|(i, row)| {
                let py = (y0 + i) as f64 + 0.5;
                for px in x0..x1 {
                    let p = canvas_to_image * Point::new(px as f64 + 0.5, py);
                    let Some(src) = sample_bilinear(img, p.x, p.y) else {
                        continue;
                    };
                    let d = &mut row[px * 4..px * 4 + 4];
                    let out = over([d[0], d[1], d[2], d[3]], src, 1.0);
                    d.copy_from_slice(&out);
                }
            });
        Ok(())
    }

    /// Finish drawing and hand back the pixels.
    pub fn into_image(self) -> TryOnResult<RasterImage> {
        RasterImage::from_premul_rgba8(self.size.width, self.size.height, self.data)
    }
}

/// Guard returned by [`Canvas::save`]. Dereferences to the canvas; restores the transform on drop.
pub struct TransformScope<'a> {
    canvas: &'a mut Canvas,
    saved: Affine,
}

impl Deref for TransformScope<'_> {
    type Target = Canvas;

    fn deref(&self) -> &Canvas {
        self.canvas
    }
}

impl DerefMut for TransformScope<'_> {
    fn deref_mut(&mut self) -> &mut Canvas {
        self.canvas
    }
}

impl Drop for TransformScope<'_> {
    fn drop(&mut self) {
        self.canvas.transform = self.saved;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/canvas.rs"]
mod tests;
