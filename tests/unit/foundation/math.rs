use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn premultiply_then_unpremultiply_is_close() {
    let mut px = vec![100u8, 50, 200, 128, 9, 9, 9, 0, 1, 2, 3, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[4..8], &[0, 0, 0, 0]);
    assert_eq!(&px[8..12], &[1, 2, 3, 255]);
    unpremultiply_rgba8_in_place(&mut px);
    for (got, want) in px[..3].iter().zip([100u8, 50, 200]) {
        assert!((i16::from(*got) - i16::from(want)).abs() <= 1);
    }
}

#[test]
fn clamp_percent_bounds() {
    assert_eq!(clamp_percent(-3.0), 0.0);
    assert_eq!(clamp_percent(42.5), 42.5);
    assert_eq!(clamp_percent(140.0), 100.0);
}

#[test]
fn ensure_finite_rejects_nan_and_inf() {
    assert!(ensure_finite(f64::NAN, "delta").is_err());
    assert!(ensure_finite(f64::INFINITY, "delta").is_err());
    assert_eq!(ensure_finite(1.5, "delta").unwrap(), 1.5);
}
