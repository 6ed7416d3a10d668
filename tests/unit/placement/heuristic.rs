use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn square_large_photo() {
    let s = propose(1000, 1000).unwrap();
    assert!(approx(s.x, 50.0));
    assert!(approx(s.y, 32.0));
    assert!(approx(s.scale, 1.98));
    assert_eq!(s.rotation, 0.0);
}

#[test]
fn small_portrait_photo() {
    let s = propose(300, 600).unwrap();
    assert!(approx(s.x, 50.0));
    assert!(approx(s.y, 28.0));
    let expected = (300.0 / 350.0) * 1.1;
    assert!(approx(s.scale, expected));
    assert!((s.scale - 0.943).abs() < 1e-3);
}

#[test]
fn wide_landscape_uses_lower_anchor() {
    let s = propose(1600, 900).unwrap();
    assert!(approx(s.y, 35.0));
    // min side 900 > 800: clamp(900/350) = 2.2 (capped), then * 0.9
    assert!(approx(s.scale, 2.2 * 0.9));
}

#[test]
fn aspect_thresholds_are_exclusive() {
    // exactly 0.8 and exactly 1.5 both fall back to the default anchor
    assert!(approx(propose(800, 1000).unwrap().y, 32.0));
    assert!(approx(propose(1500, 1000).unwrap().y, 32.0));
}

#[test]
fn mid_sized_photo_keeps_base_scale() {
    let s = propose(700, 700).unwrap();
    assert!(approx(s.scale, 2.0));
    let s = propose(400, 400).unwrap();
    assert!(approx(s.scale, 400.0 / 350.0));
}

#[test]
fn tiny_photo_hits_lower_clamps() {
    // 100/350 clamps to 0.7, *1.1 = 0.77, then floored at 0.8
    let s = propose(100, 100).unwrap();
    assert!(approx(s.scale, 0.8));
}

#[test]
fn proposal_is_deterministic() {
    for (w, h) in [(1, 1), (640, 480), (4032, 3024), (1080, 1920)] {
        assert_eq!(propose(w, h).unwrap(), propose(w, h).unwrap());
    }
}

#[test]
fn zero_dimensions_are_rejected() {
    assert!(propose(0, 100).unwrap_err().is_geometry());
    assert!(propose(100, 0).unwrap_err().is_geometry());
}

#[test]
fn trait_object_delegates_to_heuristic() {
    let source: &dyn PlacementSource = &SizeAspectHeuristic;
    let photo = PixelSize::new(1000, 1000).unwrap();
    assert_eq!(source.propose(photo).unwrap(), propose(1000, 1000).unwrap());
    assert_eq!(source.name(), "size-aspect");
}
