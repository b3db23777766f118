use super::*;

fn y_extent(vs: &[Vertex]) -> (i32, i32) {
    let lo = vs.iter().map(|v| v.y).min().unwrap();
    let hi = vs.iter().map(|v| v.y).max().unwrap();
    (lo, hi)
}

#[test]
fn returns_exactly_count_vertices() {
    for n in 0..12 {
        assert_eq!(generate_vertices(640, 480, n).len(), n);
    }
}

#[test]
fn vertices_are_vertically_centered() {
    for (w, h) in [(100, 100), (3840, 1600), (641, 479), (200, 101)] {
        for n in 2..10 {
            let vs = generate_vertices(w, h, n);
            let (lo, hi) = y_extent(&vs);
            let diff = (lo + hi) - h as i32;
            assert!(
                diff.abs() <= 1,
                "{w}x{h} n={n}: min_y + max_y = {} (height {h})",
                lo + hi
            );
        }
    }
}

#[test]
fn triangle_in_100x100_is_inscribed_in_radius_20() {
    let vs = generate_vertices(100, 100, 3);
    assert_eq!(vs.len(), 3);

    // sin(pi) is not exactly zero, but truncation keeps the apex on the center column.
    assert_eq!(vs[0], Vertex::new(50, 35));

    let (lo, hi) = y_extent(&vs);
    assert_eq!(lo + hi, 100);

    // Base vertices mirror around the center column (up to truncation).
    assert!((vs[1].x + vs[2].x - 100).abs() <= 1);
    assert!((vs[1].y - vs[2].y).abs() <= 1);

    // Before the vertical shift every vertex is within truncation error of radius 20.
    let shift = vs[0].y - 30;
    for v in &vs {
        let dx = f64::from(v.x - 50);
        let dy = f64::from(v.y - shift - 50);
        let r = (dx * dx + dy * dy).sqrt();
        assert!((r - 20.0).abs() < 1.5, "vertex {v:?} at distance {r}");
    }
}

#[test]
fn square_vertices_have_equal_spacing() {
    let vs = generate_vertices_with_margin(200, 200, 4, 50);
    assert_eq!(polygon_radius(200, 50), 50);
    assert_eq!(vs[0].x, 100);
    // Top and bottom on the center column, left and right on the center row.
    assert!((vs[2].x - 100).abs() <= 1);
    assert!((vs[1].y - vs[3].y).abs() <= 1);
    let (lo, hi) = y_extent(&vs);
    assert!(((lo + hi) - 200).abs() <= 1);
}

#[test]
fn single_vertex_degenerates_to_one_point() {
    let vs = generate_vertices(100, 100, 1);
    assert_eq!(vs.len(), 1);
    // ymin == ymax == 30, shifted to the vertical center.
    assert_eq!(vs[0], Vertex::new(50, 50));
}
