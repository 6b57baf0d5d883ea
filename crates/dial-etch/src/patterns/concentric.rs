//! Concentric fill pattern - evenly spaced rings.

use crate::error::{DialError, Result};
use crate::node::{Shape, Stroke};

use super::{Bounds, ConcentricParams, MAX_SHAPES};

/// Slack on the outer radius so float accumulation cannot drop the last ring.
const OUTER_EPSILON: f64 = 1e-9;

/// Generate concentric rings from the inner radius out to the outer radius.
///
/// The outer radius itself gets a ring when a step lands on it.
pub fn generate_concentric(bounds: &Bounds, params: &ConcentricParams, stroke: &Stroke) -> Result<Vec<Shape>> {
    let spacing = params.spacing;
    if !(spacing > 0.0 && spacing.is_finite()) {
        return Err(DialError::invalid("ring_spacing", spacing, "must be a finite value > 0"));
    }

    let inner = bounds.inner_radius.max(0.0);
    let steps = (bounds.outer_radius - inner) / spacing;
    if steps > MAX_SHAPES as f64 {
        return Err(DialError::invalid("ring_spacing", spacing, "too small for the dial radius"));
    }

    let mut rings = Vec::new();
    let mut r = inner;
    while r <= bounds.outer_radius + OUTER_EPSILON && rings.len() <= MAX_SHAPES {
        rings.push(Shape::circle(bounds.center, r, stroke.clone()));
        r += spacing;
    }

    Ok(rings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::node::ShapeKind;

    fn radii(shapes: &[Shape]) -> Vec<f64> {
        shapes
            .iter()
            .map(|s| match s.kind {
                ShapeKind::Circle { radius, .. } => radius,
                _ => panic!("concentric should only emit circles"),
            })
            .collect()
    }

    fn run(outer: f64, inner: f64, spacing: f64) -> Result<Vec<Shape>> {
        let bounds = Bounds::new(Point::new(0.0, 0.0), outer, inner);
        generate_concentric(&bounds, &ConcentricParams { spacing }, &Stroke::new("#000", 0.1, 1.0))
    }

    #[test]
    fn includes_outer_radius() {
        let rings = run(10.0, 0.0, 2.0).unwrap();
        assert_eq!(radii(&rings), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn stops_before_overshooting() {
        let rings = run(10.0, 0.0, 3.0).unwrap();
        assert_eq!(radii(&rings), vec![0.0, 3.0, 6.0, 9.0]);
    }

    #[test]
    fn starts_at_inner_radius() {
        let rings = run(10.0, 4.0, 3.0).unwrap();
        assert_eq!(radii(&rings), vec![4.0, 7.0, 10.0]);
    }

    #[test]
    fn fractional_spacing_keeps_last_ring() {
        // 0.1 accumulates rounding error; the epsilon keeps the ring at 1.0
        let rings = run(1.0, 0.0, 0.1).unwrap();
        assert_eq!(rings.len(), 11);
    }

    #[test]
    fn rejects_non_positive_spacing() {
        for spacing in [0.0, -1.0, f64::NAN] {
            let err = run(10.0, 0.0, spacing).unwrap_err();
            assert!(matches!(err, DialError::InvalidParameter { name: "ring_spacing", .. }));
        }
    }

    #[test]
    fn rejects_spacing_too_fine_for_radius() {
        let err = run(10.0, 0.0, 1e-9).unwrap_err();
        assert!(matches!(err, DialError::InvalidParameter { name: "ring_spacing", .. }));
        assert!(err.to_string().contains("too small"));

        // Exactly at the limit still generates
        let rings = run(MAX_SHAPES as f64, 0.0, 1.0).unwrap();
        assert_eq!(rings.len(), MAX_SHAPES + 1);
    }

    #[test]
    fn rings_are_stroke_only() {
        let rings = run(4.0, 0.0, 1.0).unwrap();
        assert!(rings.iter().all(|s| s.stroke.fill() == "none"));
    }
}
