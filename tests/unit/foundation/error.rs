use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ChaosError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ChaosError::encode("x").to_string().contains("encode error:"));
    assert!(
        ChaosError::io("out/a.png", std::io::Error::other("disk full"))
            .to_string()
            .contains("io error on 'out/a.png'")
    );
}

#[test]
fn bounds_reports_pixel_and_canvas() {
    let err = ChaosError::Bounds {
        x: -1,
        y: 7,
        width: 10,
        height: 5,
    };
    assert_eq!(
        err.to_string(),
        "bounds error: pixel (-1, 7) is outside the 10x5 canvas"
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ChaosError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
