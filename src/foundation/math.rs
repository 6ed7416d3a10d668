use crate::foundation::error::{TryOnError, TryOnResult};

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255_u8(u16::from(px[0]), a);
        px[1] = mul_div255_u8(u16::from(px[1]), a);
        px[2] = mul_div255_u8(u16::from(px[2]), a);
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Clamp a percentage coordinate into `[0, 100]`.
pub(crate) fn clamp_percent(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

pub(crate) fn ensure_finite(v: f64, what: &str) -> TryOnResult<f64> {
    if !v.is_finite() {
        return Err(TryOnError::geometry(format!("{what} must be finite (got {v})")));
    }
    Ok(v)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
