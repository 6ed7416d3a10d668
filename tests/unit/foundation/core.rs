use super::*;

#[test]
fn pixel_size_rejects_zero_axes() {
    assert!(PixelSize::new(0, 10).unwrap_err().is_geometry());
    assert!(PixelSize::new(10, 0).unwrap_err().is_geometry());
    assert!(PixelSize::new(1, 1).is_ok());
}

#[test]
fn pixel_size_aspect_and_min_side() {
    let s = PixelSize::new(300, 600).unwrap();
    assert_eq!(s.aspect(), 0.5);
    assert_eq!(s.min_side(), 300);
    assert_eq!(s.as_size(), Size::new(300.0, 600.0));
    assert_eq!(s.rgba8_len().unwrap(), 300 * 600 * 4);
    assert_eq!(s.to_string(), "300x600");
}

#[test]
fn display_size_allows_zero_but_not_negative_or_nan() {
    assert!(check_display_size(Size::ZERO, "viewport").is_ok());
    assert!(check_display_size(Size::new(-1.0, 4.0), "viewport").is_err());
    assert!(check_display_size(Size::new(f64::NAN, 4.0), "viewport").is_err());
}
