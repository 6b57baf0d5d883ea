//! Sunburst fill pattern - radial rays from the dial center.

use log::warn;

use crate::geometry::polar_to_cartesian;
use crate::node::{LineCap, Shape, Stroke};

use super::{Bounds, SunburstParams, MAX_SHAPES};

/// Fewest rays a sunburst will draw.
pub const MIN_RAYS: u32 = 4;

/// Generate evenly spaced rays from the inner radius to the outer radius.
///
/// The first ray points at 12 o'clock; the rest follow clockwise every
/// `360 / rays` degrees. Ray counts below [`MIN_RAYS`] are raised to it and
/// counts above [`MAX_SHAPES`] lowered to it.
pub fn generate_sunburst(bounds: &Bounds, params: &SunburstParams, stroke: &Stroke) -> Vec<Shape> {
    let rays = params.rays.clamp(MIN_RAYS, MAX_SHAPES as u32);
    if rays != params.rays {
        warn!("sunburst ray count {} clamped to {}", params.rays, rays);
    }

    let stroke = stroke.clone().with_cap(LineCap::Round);
    let step = 360.0 / rays as f64;

    (0..rays)
        .map(|i| {
            let angle = i as f64 * step;
            let from = polar_to_cartesian(bounds.center, bounds.inner_radius, angle);
            let to = polar_to_cartesian(bounds.center, bounds.outer_radius, angle);
            Shape::segment(from, to, stroke.clone())
        })
        .collect()
}
