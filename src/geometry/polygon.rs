use std::f64::consts::PI;

use crate::foundation::core::Vertex;

/// Distance in pixels kept between the circumscribed circle and the top/bottom canvas edges.
pub const DEFAULT_MARGIN: u32 = 30;

/// Corners of a regular `count`-gon centered in a `width`x`height` canvas.
///
/// Same as [`generate_vertices_with_margin`] with [`DEFAULT_MARGIN`].
pub fn generate_vertices(width: u32, height: u32, count: usize) -> Vec<Vertex> {
    generate_vertices_with_margin(width, height, count, DEFAULT_MARGIN)
}

/// Corners of a regular `count`-gon on a circle of radius `height/2 - margin`.
///
/// Vertex `i` sits at angle `2πi/count + π`, so vertex 0 is straight above the center.
/// Coordinates are truncated toward zero. The cluster is then shifted vertically by
/// `(height - ymax - ymin) / 2` so it is balanced in the canvas even for odd `count`.
///
/// Does not check that the polygon fits the canvas; see `RenderConfig::validate`.
pub fn generate_vertices_with_margin(
    width: u32,
    height: u32,
    count: usize,
    margin: u32,
) -> Vec<Vertex> {
    if count == 0 {
        return Vec::new();
    }

    let radius = f64::from(polygon_radius(height, margin));
    let cx = f64::from(width / 2);
    let cy = f64::from(height / 2);
    let step = 2.0 * PI / count as f64;

    let raw: Vec<Vertex> = (0..count)
        .map(|i| {
            let theta = step * i as f64 + PI;
            Vertex::new(
                (radius * theta.sin() + cx) as i32,
                (radius * theta.cos() + cy) as i32,
            )
        })
        .collect();

    let (ymin, ymax) = raw
        .iter()
        .fold((i32::MAX, i32::MIN), |(lo, hi), v| (lo.min(v.y), hi.max(v.y)));
    let shift = (height as i32 - ymax - ymin) / 2;

    raw.into_iter()
        .map(|v| Vertex::new(v.x, v.y + shift))
        .collect()
}

/// Radius of the circumscribed circle, `height/2 - margin`. May be zero or negative.
pub fn polygon_radius(height: u32, margin: u32) -> i32 {
    (height / 2) as i32 - margin as i32
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/polygon.rs"]
mod tests;
