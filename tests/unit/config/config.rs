use super::*;

#[test]
fn empty_object_yields_defaults() {
    let cfg = EngineConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, EngineConfig::default());
    assert_eq!(cfg.sizing.base_fraction, 0.4);
    assert_eq!(cfg.sizing.max_base_width_px, 200.0);
    assert_eq!(cfg.controls.nudge_step_pct, 2.0);
    assert_eq!(cfg.controls.scale_step, 0.2);
    assert_eq!(cfg.controls.rotation_step_rad, 0.1);
    assert_eq!(cfg.controls.min_scale, 0.1);
    assert!(cfg.auto_position_on_load);
}

#[test]
fn partial_sections_keep_other_defaults() {
    let cfg =
        EngineConfig::from_json_str(r#"{"sizing":{"max_base_width_px":320},"render_threads":2}"#)
            .unwrap();
    assert_eq!(cfg.sizing.max_base_width_px, 320.0);
    assert_eq!(cfg.sizing.base_fraction, 0.4);
    assert_eq!(cfg.render_threads, Some(2));
}

#[test]
fn invalid_values_are_config_errors() {
    for json in [
        r#"{"sizing":{"base_fraction":-1}}"#,
        r#"{"controls":{"min_scale":0}}"#,
        r#"{"render_threads":0}"#,
        r#"{"default_placement":{"x":50,"y":50,"scale":0.05,"rotation":0}}"#,
        r#"{"default_placement":{"x":150,"y":50,"scale":1,"rotation":0}}"#,
        r#"{"sizing":"#,
    ] {
        let err = EngineConfig::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("config error"), "{json}: {err}");
    }
}

#[test]
fn overrides_apply_from_lookup() {
    let cfg = EngineConfig::default()
        .with_overrides_from(|k| match k {
            ENV_RENDER_THREADS => Some("3".to_string()),
            ENV_AUTO_POSITION => Some("off".to_string()),
            _ => None,
        })
        .unwrap();
    assert_eq!(cfg.render_threads, Some(3));
    assert!(!cfg.auto_position_on_load);
}

#[test]
fn bad_overrides_are_rejected() {
    assert!(
        EngineConfig::default()
            .with_overrides_from(|k| (k == ENV_RENDER_THREADS).then(|| "many".to_string()))
            .is_err()
    );
    assert!(
        EngineConfig::default()
            .with_overrides_from(|k| (k == ENV_AUTO_POSITION).then(|| "maybe".to_string()))
            .is_err()
    );
}

#[test]
fn load_missing_file_reports_path() {
    let err = EngineConfig::load(Path::new("definitely/not/here.json")).unwrap_err();
    assert!(err.to_string().contains("not/here.json"));
}
