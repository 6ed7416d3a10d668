use crate::compose::raster::RasterImage;
use crate::foundation::math::mul_div255_u8;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over in premultiplied space, with an extra opacity multiplier.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Bilinear sample at continuous pixel coordinates `(u, v)` (pixel centers at `+0.5`).
///
/// Returns `None` outside `[0, width) x [0, height)`; neighbours past the edge are clamped.
pub fn sample_bilinear(img: &RasterImage, u: f64, v: f64) -> Option<PremulRgba8> {
    let w = f64::from(img.width());
    let h = f64::from(img.height());
    if !(u >= 0.0 && u < w && v >= 0.0 && v < h) {
        return None;
    }

    let fx = u - 0.5;
    let fy = v - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;

    let max_x = i64::from(img.width()) - 1;
    let max_y = i64::from(img.height()) - 1;
    let ix0 = (x0 as i64).clamp(0, max_x);
    let iy0 = (y0 as i64).clamp(0, max_y);
    let ix1 = (x0 as i64 + 1).clamp(0, max_x);
    let iy1 = (y0 as i64 + 1).clamp(0, max_y);

    let data = img.data();
    let stride = img.width() as usize;
    let fetch = |x: i64, y: i64| -> [f64; 4] {
        let idx = ((y as usize) * stride + (x as usize)) * 4;
        [
            f64::from(data[idx]),
            f64::from(data[idx + 1]),
            f64::from(data[idx + 2]),
            f64::from(data[idx + 3]),
        ]
    };

    let p00 = fetch(ix0, iy0);
    let p10 = fetch(ix1, iy0);
    let p01 = fetch(ix0, iy1);
    let p11 = fetch(ix1, iy1);

    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = p00[i] + (p10[i] - p00[i]) * tx;
        let bottom = p01[i] + (p11[i] - p01[i]) * tx;
        out[i] = (top + (bottom - top) * ty).round().clamp(0.0, 255.0) as u8;
    }
    // premultiplied invariant: colour never exceeds alpha
    for i in 0..3 {
        out[i] = out[i].min(out[3]);
    }
    Some(out)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/blend.rs"]
mod tests;
