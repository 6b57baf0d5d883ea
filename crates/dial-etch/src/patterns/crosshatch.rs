//! Crosshatch fill pattern - families of parallel lines.
//!
//! Lines span a square of side `2.2 * outer_radius` around the dial center
//! and are left unclipped; the pattern group's clip circle trims them.

use std::ops::Range;

use crate::error::{DialError, Result};
use crate::geometry::Point;
use crate::node::{LineCap, Shape, Stroke};

use super::{Bounds, CrosshatchParams, MAX_SHAPES};

/// Side of the covered square relative to the outer radius.
const SPAN_FACTOR: f64 = 2.2;

/// Line offset indices for a family covering `size` at `spacing`.
///
/// `count = floor(size / spacing) + 3` and the range is
/// `[floor(-count / 2), count / 2 + 1)`. Both parities yield `count + 1`
/// lines; an even `count` is symmetric about zero, an odd one leans one step
/// toward the negative side.
pub fn hatch_offsets(size: f64, spacing: f64) -> Range<i64> {
    let count = (size / spacing).floor() as i64 + 3;
    let start = (-count).div_euclid(2);
    let end = count / 2 + 1;
    start..end
}

/// Generate one or two families of parallel hatch lines.
pub fn generate_crosshatch(bounds: &Bounds, params: &CrosshatchParams, stroke: &Stroke) -> Result<Vec<Shape>> {
    let spacing = params.spacing;
    if !(spacing > 0.0 && spacing.is_finite()) {
        return Err(DialError::invalid("hatch_spacing", spacing, "must be a finite value > 0"));
    }

    let size = bounds.outer_radius * SPAN_FACTOR;
    if size / spacing > MAX_SHAPES as f64 {
        return Err(DialError::invalid("hatch_spacing", spacing, "too small for the dial radius"));
    }

    let stroke = stroke.clone().with_cap(LineCap::Round);

    let mut lines = Vec::new();
    add_family(&mut lines, bounds.center, size, spacing, params.angle_deg, &stroke);
    if params.double {
        add_family(&mut lines, bounds.center, size, spacing, params.angle_deg + 90.0, &stroke);
    }

    Ok(lines)
}

fn add_family(lines: &mut Vec<Shape>, center: Point, size: f64, spacing: f64, angle_deg: f64, stroke: &Stroke) {
    let half = size / 2.0;
    let theta = angle_deg.to_radians();

    // Line direction and its perpendicular
    let (ux, uy) = (theta.cos(), theta.sin());
    let (vx, vy) = (-uy, ux);

    for i in hatch_offsets(size, spacing) {
        let off = i as f64 * spacing;
        let px = center.x + off * vx;
        let py = center.y + off * vy;
        lines.push(Shape::segment(
            Point::new(px - half * ux, py - half * uy),
            Point::new(px + half * ux, py + half * uy),
            stroke.clone(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ShapeKind;
    use approx::assert_abs_diff_eq;

    fn run(spacing: f64, angle_deg: f64, double: bool) -> Result<Vec<Shape>> {
        let bounds = Bounds::new(Point::new(50.0, 50.0), 10.0, 0.0);
        let params = CrosshatchParams { spacing, angle_deg, double };
        generate_crosshatch(&bounds, &params, &Stroke::new("#000", 0.1, 1.0))
    }

    #[test]
    fn offsets_even_count() {
        // 22 / 2 = 11 -> count 14 -> [-7, 8)
        assert_eq!(hatch_offsets(22.0, 2.0), -7..8);
    }

    #[test]
    fn offsets_odd_count_lean_negative() {
        // 24 / 2 = 12 -> count 15 -> [-8, 8)
        assert_eq!(hatch_offsets(24.0, 2.0), -8..8);
    }

    #[test]
    fn single_family_line_count() {
        assert_eq!(run(2.0, 0.0, false).unwrap().len(), 15);
    }

    #[test]
    fn double_adds_perpendicular_family() {
        let lines = run(2.0, 35.0, true).unwrap();
        assert_eq!(lines.len(), 30);

        let dir = |s: &Shape| {
            let ShapeKind::Segment { from, to } = s.kind else { unreachable!() };
            let len = from.distance(to);
            ((to.x - from.x) / len, (to.y - from.y) / len)
        };
        let (ax, ay) = dir(&lines[0]);
        let (bx, by) = dir(&lines[15]);
        assert_abs_diff_eq!(ax * bx + ay * by, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn lines_span_the_square() {
        for line in run(2.0, 0.0, false).unwrap() {
            let ShapeKind::Segment { from, to } = line.kind else { unreachable!() };
            assert_abs_diff_eq!(from.distance(to), 22.0, epsilon = 1e-9);
            assert_abs_diff_eq!(from.x, 39.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn rejects_zero_spacing() {
        let err = run(0.0, 0.0, false).unwrap_err();
        assert!(matches!(err, DialError::InvalidParameter { name: "hatch_spacing", .. }));
    }

    #[test]
    fn rejects_spacing_too_fine_for_radius() {
        let err = run(1e-9, 0.0, true).unwrap_err();
        assert!(matches!(err, DialError::InvalidParameter { name: "hatch_spacing", .. }));
        assert!(err.to_string().contains("too small"));
    }
}
