use super::*;

#[test]
fn default_matches_initial_pose() {
    let s = PlacementState::default();
    assert_eq!((s.x, s.y, s.scale, s.rotation), (50.0, 35.0, 1.2, 0.0));
    s.validate().unwrap();
}

#[test]
fn new_clamps_anchor_into_percent_range() {
    let s = PlacementState::new(-20.0, 180.0, 1.0, 0.3).unwrap();
    assert_eq!(s.x, 0.0);
    assert_eq!(s.y, 100.0);
    assert_eq!(s.rotation, 0.3);
}

#[test]
fn new_rejects_degenerate_scale_and_nan() {
    assert!(PlacementState::new(50.0, 50.0, 0.0, 0.0).unwrap_err().is_geometry());
    assert!(PlacementState::new(50.0, 50.0, -1.0, 0.0).is_err());
    assert!(PlacementState::new(f64::NAN, 50.0, 1.0, 0.0).is_err());
    assert!(PlacementState::new(50.0, 50.0, f64::INFINITY, 0.0).is_err());
    assert!(PlacementState::new(50.0, 50.0, 1.0, f64::NAN).is_err());
}

#[test]
fn validate_flags_out_of_range_literal() {
    let s = PlacementState {
        x: 101.0,
        ..PlacementState::default()
    };
    assert!(s.validate().is_err());
}

#[test]
fn json_shape_is_plain_record() {
    let s = PlacementState::new(50.0, 30.0, 1.0, 0.0).unwrap();
    let v = serde_json::to_value(s).unwrap();
    assert_eq!(v["x"], 50.0);
    assert_eq!(v["y"], 30.0);
    assert_eq!(v["scale"], 1.0);
    assert_eq!(v["rotation"], 0.0);
    let back: PlacementState = serde_json::from_value(v).unwrap();
    assert_eq!(back, s);
}

#[test]
fn origin_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&PlacementOrigin::Proposed).unwrap(),
        "\"proposed\""
    );
}
