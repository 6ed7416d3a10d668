use std::io::Cursor;

use super::*;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let decoded = decode_image(&png_bytes(img)).unwrap();
    assert_eq!(decoded.size(), PixelSize::new(1, 1).unwrap());
    assert_eq!(
        decoded.data(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_garbage_is_a_decode_error() {
    let err = decode_image(b"not an image").unwrap_err();
    assert!(err.to_string().contains("decode error"));
}

#[test]
fn buffer_length_must_match_dimensions() {
    assert!(RasterImage::from_premul_rgba8(2, 2, vec![0; 15]).is_err());
    assert!(RasterImage::from_premul_rgba8(0, 2, vec![]).unwrap_err().is_geometry());
    assert!(RasterImage::from_premul_rgba8(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn pixel_lookup_is_bounds_checked() {
    let img = RasterImage::from_premul_rgba8(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    assert_eq!(img.pixel(1, 0), Some([5, 6, 7, 8]));
    assert_eq!(img.pixel(2, 0), None);
    assert_eq!(img.pixel(0, 1), None);
}

#[test]
fn png_encode_decode_preserves_opaque_pixels() {
    let src = image::RgbaImage::from_fn(3, 2, |x, y| image::Rgba([x as u8 * 40, y as u8 * 90, 7, 255]));
    let img = RasterImage::from_rgba_image(src.clone()).unwrap();
    let png = img.encode_png().unwrap();
    let back = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(back, src);
}

#[test]
fn svg_overlay_rasterizes_at_intrinsic_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="4">
        <rect x="0" y="0" width="8" height="4" fill="#ff0000"/>
    </svg>"##;
    let img = decode_overlay(svg).unwrap();
    assert_eq!((img.width(), img.height()), (8, 4));
    assert_eq!(img.pixel(4, 2), Some([255, 0, 0, 255]));
}

#[test]
fn svg_parse_errors_are_reported() {
    assert!(decode_svg(b"<svg").is_err());
}

#[test]
fn overlay_sniffing_routes_raster_bytes_to_image_decoder() {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255]));
    let decoded = decode_overlay(&png_bytes(img)).unwrap();
    assert_eq!(decoded.width(), 2);
    assert!(looks_like_svg(b"  <?xml version=\"1.0\"?><svg></svg>"));
    assert!(!looks_like_svg(b"\x89PNG"));
}

#[test]
fn slot_rejects_until_completed() {
    let mut slot = ImageSlot::default();
    assert!(!slot.is_decoded());
    assert!(slot.decoded("photo").unwrap_err().is_precondition());
    slot.complete(RasterImage::from_premul_rgba8(1, 1, vec![0; 4]).unwrap());
    assert!(slot.is_decoded());
    assert_eq!(slot.decoded("photo").unwrap().width(), 1);
    slot.reset();
    assert!(slot.decoded("photo").is_err());
}
