use super::*;
use crate::foundation::core::Vec2;

fn solid(w: u32, h: u32, px: [u8; 4]) -> RasterImage {
    RasterImage::from_premul_rgba8(w, h, px.repeat((w * h) as usize)).unwrap()
}

fn gradient(w: u32, h: u32) -> RasterImage {
    let mut data = Vec::new();
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[(x * 30) as u8, (y * 30) as u8, 9, 255]);
        }
    }
    RasterImage::from_premul_rgba8(w, h, data).unwrap()
}

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(PixelSize::new(w, h).unwrap()).unwrap()
}

#[test]
fn blit_copies_pixels_exactly() {
    let img = gradient(4, 3);
    let mut c = canvas(4, 3);
    c.blit(&img);
    assert_eq!(c.into_image().unwrap(), img);
}

#[test]
fn identity_draw_matches_blit() {
    let img = gradient(5, 4);
    let mut c = canvas(5, 4);
    c.draw_image(&img, Rect::new(0.0, 0.0, 5.0, 4.0)).unwrap();
    assert_eq!(c.into_image().unwrap(), img);
}

#[test]
fn draw_scales_into_destination() {
    let img = solid(2, 2, [0, 0, 255, 255]);
    let mut c = canvas(10, 10);
    c.draw_image(&img, Rect::new(2.0, 2.0, 6.0, 6.0)).unwrap();
    let out = c.into_image().unwrap();
    assert_eq!(out.pixel(2, 2), Some([0, 0, 255, 255]));
    assert_eq!(out.pixel(5, 5), Some([0, 0, 255, 255]));
    assert_eq!(out.pixel(6, 6), Some([0, 0, 0, 0]));
    assert_eq!(out.pixel(1, 3), Some([0, 0, 0, 0]));
}

#[test]
fn quarter_turn_about_anchor_swaps_extent() {
    // 4x2 bar centered at (5, 5), rotated 90 degrees clockwise -> 2 wide, 4 tall
    let img = solid(4, 2, [255, 0, 0, 255]);
    let mut c = canvas(10, 10);
    let t = Affine::translate(Vec2::new(5.0, 5.0)) * Affine::rotate(std::f64::consts::FRAC_PI_2);
    c.with_transform(t, |c| c.draw_image(&img, Rect::new(-2.0, -1.0, 2.0, 1.0)))
        .unwrap();
    let out = c.into_image().unwrap();
    for y in 3..7 {
        for x in 4..6 {
            assert_eq!(out.pixel(x, y), Some([255, 0, 0, 255]), "({x},{y})");
        }
    }
    assert_eq!(out.pixel(3, 5), Some([0, 0, 0, 0]));
    assert_eq!(out.pixel(6, 5), Some([0, 0, 0, 0]));
    assert_eq!(out.pixel(5, 2), Some([0, 0, 0, 0]));
}

#[test]
fn transform_is_restored_after_scope_even_on_error() {
    let mut c = canvas(4, 4);
    let img = solid(1, 1, [0, 0, 0, 255]);
    let r = c.with_transform(Affine::rotate(1.0), |c| {
        c.draw_image(&img, Rect::new(0.0, 0.0, 0.0, 1.0))
    });
    assert!(r.unwrap_err().is_geometry());
    assert_eq!(c.transform(), Affine::IDENTITY);

    {
        let mut scope = c.save();
        scope.concat(Affine::translate(Vec2::new(3.0, 1.0)));
        assert_ne!(scope.transform(), Affine::IDENTITY);
    }
    assert_eq!(c.transform(), Affine::IDENTITY);
}

#[test]
fn nested_scopes_unwind_in_order() {
    let mut c = canvas(2, 2);
    let a = Affine::translate(Vec2::new(1.0, 0.0));
    let b = Affine::scale(2.0);
    c.with_transform(a, |c| {
        assert_eq!(c.transform(), a);
        c.with_transform(b, |c| {
            assert_eq!(c.transform(), a * b);
            Ok(())
        })?;
        assert_eq!(c.transform(), a);
        Ok(())
    })
    .unwrap();
    assert_eq!(c.transform(), Affine::IDENTITY);
}

#[test]
fn off_canvas_draw_is_a_noop() {
    let mut c = canvas(4, 4);
    c.draw_image(&solid(2, 2, [1, 1, 1, 255]), Rect::new(10.0, 10.0, 12.0, 12.0))
        .unwrap();
    assert!(c.into_image().unwrap().data().iter().all(|&b| b == 0));
}

#[test]
fn degenerate_transform_is_rejected() {
    let mut c = canvas(4, 4);
    c.concat(Affine::scale_non_uniform(1.0, 0.0));
    assert!(
        c.draw_image(&solid(1, 1, [0, 0, 0, 255]), Rect::new(0.0, 0.0, 1.0, 1.0))
            .unwrap_err()
            .is_geometry()
    );
}

#[test]
fn transparent_overlay_keeps_background() {
    let mut c = canvas(2, 2);
    c.blit(&solid(2, 2, [10, 20, 30, 255]));
    c.draw_image(&solid(2, 2, [0, 0, 0, 0]), Rect::new(0.0, 0.0, 2.0, 2.0))
        .unwrap();
    assert_eq!(c.into_image().unwrap(), solid(2, 2, [10, 20, 30, 255]));
}
