use super::*;

fn small() -> RenderConfig {
    RenderConfig {
        iterations: 10_000,
        width: 120,
        height: 100,
        duration_secs: 2,
        fps: 5,
        ..RenderConfig::default()
    }
}

#[test]
fn defaults_match_classic_render() {
    let cfg = RenderConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.still_file_name(), "3_100000000.png");
    assert_eq!(cfg.colors(), &DEFAULT_PALETTE[..3]);
    assert_eq!(cfg.start(), Position::new(1920, 800));

    let plan = cfg.frame_plan().unwrap();
    assert_eq!(plan.frame_count, 1800);
    assert_eq!(plan.iterations_per_frame, 55_555);
}

#[test]
fn empty_json_is_the_default() {
    let cfg: RenderConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, RenderConfig::default());
}

#[test]
fn partial_json_overrides_fields() {
    let cfg: RenderConfig = serde_json::from_str(
        r#"{
            "iterations": 5000,
            "vertex_count": 2,
            "palette": [16777215, 255],
            "rounding": "nearest",
            "run_mode": "shared",
            "video": { "out_path": "v.mkv" }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.iterations, 5000);
    assert_eq!(cfg.colors(), &[Rgb8::new(255, 255, 255), Rgb8::new(0, 0, 255)]);
    assert_eq!(cfg.rounding, Rounding::Nearest);
    assert_eq!(cfg.run_mode, RunMode::Shared);
    assert_eq!(cfg.video.as_ref().unwrap().crf, 0);
    assert_eq!(cfg.width, 3840);
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(serde_json::from_str::<RenderConfig>(r#"{"iteratons": 5}"#).is_err());
}

#[test]
fn from_path_reads_json_and_reports_parse_errors() {
    let tmp = tempfile::tempdir().unwrap();
    let good = tmp.path().join("good.json");
    std::fs::write(&good, r#"{"width": 640, "height": 480, "seed": 3}"#).unwrap();
    let cfg = RenderConfig::from_path(&good).unwrap();
    assert_eq!((cfg.width, cfg.height, cfg.seed), (640, 480, Some(3)));

    let bad = tmp.path().join("bad.json");
    std::fs::write(&bad, "{ nope").unwrap();
    let err = RenderConfig::from_path(&bad).unwrap_err();
    assert!(err.to_string().contains("parse render config"));

    let missing = RenderConfig::from_path(&tmp.path().join("missing.json")).unwrap_err();
    assert!(matches!(missing, ChaosError::Io { .. }));
}

#[test]
fn validation_rejects_bad_values() {
    let cases: Vec<(&str, RenderConfig)> = vec![
        ("zero width", RenderConfig { width: 0, ..small() }),
        ("zero height", RenderConfig { height: 0, ..small() }),
        ("zero iterations", RenderConfig { iterations: 0, ..small() }),
        ("zero vertices", RenderConfig { vertex_count: 0, ..small() }),
        ("too many vertices", RenderConfig { vertex_count: 8, ..small() }),
        ("margin eats radius", RenderConfig { margin: 50, ..small() }),
        ("canvas too narrow", RenderConfig { width: 10, ..small() }),
        ("zero fps", RenderConfig { fps: 0, ..small() }),
        ("fewer iterations than frames", RenderConfig { iterations: 9, ..small() }),
        (
            "crf above x264 range",
            RenderConfig {
                video: Some(VideoConfig {
                    out_path: "v.mkv".into(),
                    crf: 60,
                }),
                ..small()
            },
        ),
        (
            "video without frames",
            RenderConfig {
                frames: false,
                video: Some(VideoConfig {
                    out_path: "v.mkv".into(),
                    crf: 0,
                }),
                ..small()
            },
        ),
    ];
    for (name, cfg) in cases {
        assert!(
            matches!(cfg.validate(), Err(ChaosError::Validation(_))),
            "{name} should be rejected"
        );
    }
}

#[test]
fn frame_checks_are_skipped_without_frames() {
    let cfg = RenderConfig {
        frames: false,
        iterations: 1,
        ..small()
    };
    cfg.validate().unwrap();
}

#[test]
fn vertex_count_error_names_both_counts() {
    let err = RenderConfig {
        vertex_count: 9,
        ..small()
    }
    .validate()
    .unwrap_err();
    assert!(err.to_string().contains("vertex count (9)"));
    assert!(err.to_string().contains("(7)"));
}

#[test]
fn still_path_joins_output_dir() {
    let cfg = RenderConfig {
        output_dir: PathBuf::from("renders"),
        vertex_count: 5,
        ..small()
    };
    assert_eq!(cfg.still_path(), PathBuf::from("renders").join("5_10000.png"));
}

#[test]
fn cap_frames_flows_into_the_plan() {
    let cfg: RenderConfig = serde_json::from_str(r#"{"cap_frames": true}"#).unwrap();
    let plan = cfg.frame_plan().unwrap();
    assert!(plan.capped);
    assert_eq!(plan.emitted_frames(), 1800);
    assert_eq!(RenderConfig::default().frame_plan().unwrap().emitted_frames(), 1801);
}
