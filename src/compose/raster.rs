use std::io::Cursor;
use std::sync::Arc;

use crate::foundation::core::PixelSize;
use crate::foundation::error::{TryOnError, TryOnResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// Largest SVG raster we are willing to allocate on either axis.
const MAX_SVG_DIM: u32 = 16_384;

/// A fully decoded image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    size: PixelSize,
    /// Premultiplied RGBA8, row-major, tightly packed.
    rgba8_premul: Arc<Vec<u8>>,
}

impl RasterImage {
    /// Wrap premultiplied RGBA8 pixels. The buffer must be exactly `width * height * 4` bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> TryOnResult<Self> {
        let size = PixelSize::new(width, height)?;
        let expected = size.rgba8_len()?;
        if data.len() != expected {
            return Err(TryOnError::decode(format!(
                "rgba8 buffer is {} bytes, expected {expected} for {size}",
                data.len()
            )));
        }
        Ok(Self {
            size,
            rgba8_premul: Arc::new(data),
        })
    }

    /// Wrap straight-alpha RGBA8 pixels, premultiplying them.
    pub fn from_straight_rgba8(width: u32, height: u32, mut data: Vec<u8>) -> TryOnResult<Self> {
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul_rgba8(width, height, data)
    }

    /// Take ownership of an `image` crate RGBA buffer.
    pub fn from_rgba_image(img: image::RgbaImage) -> TryOnResult<Self> {
        let (w, h) = img.dimensions();
        Self::from_straight_rgba8(w, h, img.into_raw())
    }

    /// Natural size.
    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Premultiplied pixel bytes.
    pub fn data(&self) -> &[u8] {
        self.rgba8_premul.as_slice()
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = ((y as usize) * (self.size.width as usize) + (x as usize)) * 4;
        let d = self.data();
        Some([d[idx], d[idx + 1], d[idx + 2], d[idx + 3]])
    }

    /// Convert back to a straight-alpha `image` buffer.
    pub fn to_rgba_image(&self) -> TryOnResult<image::RgbaImage> {
        let mut raw = self.data().to_vec();
        unpremultiply_rgba8_in_place(&mut raw);
        image::RgbaImage::from_raw(self.size.width, self.size.height, raw)
            .ok_or_else(|| TryOnError::encode("pixel buffer does not match image size"))
    }

    /// Encode as PNG (straight alpha).
    pub fn encode_png(&self) -> TryOnResult<Vec<u8>> {
        let rgba = self.to_rgba_image()?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(rgba)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| TryOnError::encode(format!("write png: {e}")))?;
        Ok(buf)
    }
}

/// Decode a raster image (PNG, JPEG, ...) from memory.
pub fn decode_image(bytes: &[u8]) -> TryOnResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| TryOnError::decode(format!("decode image from memory: {e}")))?;
    RasterImage::from_rgba_image(dyn_img.to_rgba8())
}

/// Parse an SVG and rasterize it at its intrinsic size.
pub fn decode_svg(bytes: &[u8]) -> TryOnResult<RasterImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| TryOnError::decode(format!("parse svg tree: {e}")))?;

    fn to_px(v: f32) -> TryOnResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(TryOnError::decode("svg has invalid width/height"));
        }
        let px = (v.ceil() as u32).max(1);
        if px > MAX_SVG_DIM {
            return Err(TryOnError::decode(format!(
                "svg raster size too large: {px} (max {MAX_SVG_DIM})"
            )));
        }
        Ok(px)
    }

    let size = tree.size();
    let width = to_px(size.width())?;
    let height = to_px(size.height())?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| TryOnError::decode("failed to allocate svg pixmap"))?;
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    // tiny-skia pixmaps are already premultiplied RGBA8.
    RasterImage::from_premul_rgba8(width, height, pixmap.take())
}

/// Decode an overlay graphic, accepting SVG as well as raster formats.
pub fn decode_overlay(bytes: &[u8]) -> TryOnResult<RasterImage> {
    if looks_like_svg(bytes) {
        decode_svg(bytes)
    } else {
        decode_image(bytes)
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    trimmed.starts_with("<svg") || (trimmed.starts_with("<?xml") && text.contains("<svg"))
}

/// A one-shot decode completion: `Pending` until the image is fully decoded.
#[derive(Clone, Debug, Default)]
pub enum ImageSlot {
    /// Decode not finished (or not started).
    #[default]
    Pending,
    /// Decode finished.
    Decoded(RasterImage),
}

impl ImageSlot {
    /// Signal decode completion. A later completion replaces the earlier image.
    pub fn complete(&mut self, image: RasterImage) {
        *self = Self::Decoded(image);
    }

    /// Return to `Pending` (a new load started).
    pub fn reset(&mut self) {
        *self = Self::Pending;
    }

    /// Whether decode has completed.
    pub fn is_decoded(&self) -> bool {
        matches!(self, Self::Decoded(_))
    }

    /// The decoded image, or a precondition error naming `what`.
    pub fn decoded(&self, what: &str) -> TryOnResult<&RasterImage> {
        match self {
            Self::Decoded(img) => Ok(img),
            Self::Pending => Err(TryOnError::precondition(format!(
                "{what} is not fully decoded yet"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/raster.rs"]
mod tests;
