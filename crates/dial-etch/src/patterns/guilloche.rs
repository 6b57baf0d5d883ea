//! Guilloche fill pattern - a cosine-modulated rosette.
//!
//! The rosette is a circle of mean radius `outer - amplitude` whose radius
//! swings by `amplitude * cos(lobes * t)` as `t` runs once around the dial:
//!
//!   r(t)     = (R - A) + A * cos(L * t)
//!   angle(t) = degrees(t)              for t in [0, 2 * PI]
//!
//! With integer `L` the curve closes on itself, so the last sample repeats
//! the first and the polyline needs no explicit close.

use std::f64::consts::TAU;

use crate::error::{DialError, Result};
use crate::geometry::polar_to_cartesian;
use crate::node::{LineJoin, Shape, Stroke};

use super::{Bounds, GuillocheParams};

pub const MIN_LOBES: u32 = 2;
pub const MIN_POINTS: u32 = 200;
pub const MAX_POINTS: u32 = 1_000_000;

/// One rosette sample in dial polar coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarSample {
    pub radius: f64,
    /// Degrees clockwise from 12 o'clock.
    pub angle_deg: f64,
}

fn validate(params: &GuillocheParams) -> Result<()> {
    if params.lobes < MIN_LOBES {
        return Err(DialError::invalid("lobes", params.lobes, "must be at least 2"));
    }
    if params.points < MIN_POINTS {
        return Err(DialError::invalid("points", params.points, "must be at least 200"));
    }
    if params.points > MAX_POINTS {
        return Err(DialError::invalid("points", params.points, "must be at most 1000000"));
    }
    if !(params.amplitude >= 0.0 && params.amplitude.is_finite()) {
        return Err(DialError::invalid("amplitude", params.amplitude, "must be a finite value >= 0"));
    }
    Ok(())
}

/// Sample the rosette at `points + 1` evenly spaced parameter values.
///
/// The mean radius is clamped at zero when the amplitude exceeds the outer
/// radius.
pub fn rosette_samples(outer_radius: f64, params: &GuillocheParams) -> Result<Vec<PolarSample>> {
    validate(params)?;

    let base = (outer_radius - params.amplitude).max(0.0);
    let lobes = params.lobes as f64;
    let points = params.points as usize;

    Ok((0..=points)
        .map(|i| {
            let t = TAU * (i as f64 / points as f64);
            PolarSample {
                radius: base + params.amplitude * (lobes * t).cos(),
                angle_deg: t.to_degrees(),
            }
        })
        .collect())
}

/// Generate a single rosette polyline.
pub fn generate_guilloche(bounds: &Bounds, params: &GuillocheParams, stroke: &Stroke) -> Result<Vec<Shape>> {
    let samples = rosette_samples(bounds.outer_radius, params)?;
    let points = samples
        .iter()
        .map(|s| polar_to_cartesian(bounds.center, s.radius, s.angle_deg))
        .collect();

    let stroke = stroke.clone().with_join(LineJoin::Round);
    Ok(vec![Shape::polyline(points, stroke)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::node::ShapeKind;
    use approx::assert_abs_diff_eq;

    fn params(lobes: u32, amplitude: f64, points: u32) -> GuillocheParams {
        GuillocheParams { lobes, amplitude, points }
    }

    #[test]
    fn closes_on_itself() {
        let samples = rosette_samples(10.0, &params(12, 1.2, 360)).unwrap();
        assert_eq!(samples.len(), 361);

        let first = samples[0];
        let last = samples[360];
        assert_abs_diff_eq!(first.radius, last.radius, epsilon = 1e-6);
        assert_abs_diff_eq!(last.angle_deg - first.angle_deg, 360.0, epsilon = 1e-6);

        let center = Point::new(0.0, 0.0);
        let a = polar_to_cartesian(center, first.radius, first.angle_deg);
        let b = polar_to_cartesian(center, last.radius, last.angle_deg);
        assert!(a.distance(b) < 1e-6);
    }

    #[test]
    fn radius_stays_within_band() {
        let samples = rosette_samples(10.0, &params(7, 2.0, 500)).unwrap();
        for s in &samples {
            assert!(s.radius >= 6.0 - 1e-9 && s.radius <= 10.0 + 1e-9);
        }
        // Starts on a lobe peak
        assert_abs_diff_eq!(samples[0].radius, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn oversized_amplitude_clamps_mean_radius() {
        let samples = rosette_samples(1.0, &params(4, 3.0, 200)).unwrap();
        // base clamps to 0, so the peak radius equals the amplitude
        assert_abs_diff_eq!(samples[0].radius, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn emits_one_open_polyline() {
        let bounds = Bounds::new(Point::new(5.0, 5.0), 4.0, 0.0);
        let shapes = generate_guilloche(&bounds, &params(6, 0.5, 240), &Stroke::new("#000", 0.1, 1.0)).unwrap();
        assert_eq!(shapes.len(), 1);
        let ShapeKind::Polyline { points } = &shapes[0].kind else { panic!("expected polyline") };
        assert_eq!(points.len(), 241);
        assert_eq!(shapes[0].stroke.join, Some(LineJoin::Round));
        assert!(!shapes[0].kind.path_data().unwrap().contains('Z'));
    }

    #[test]
    fn rejects_too_few_lobes() {
        let err = rosette_samples(10.0, &params(1, 1.0, 400)).unwrap_err();
        assert!(matches!(err, DialError::InvalidParameter { name: "lobes", .. }));
    }

    #[test]
    fn rejects_too_few_points() {
        let err = rosette_samples(10.0, &params(12, 1.0, 199)).unwrap_err();
        assert!(matches!(err, DialError::InvalidParameter { name: "points", .. }));
    }

    #[test]
    fn rejects_too_many_points() {
        let err = rosette_samples(10.0, &params(12, 1.0, u32::MAX)).unwrap_err();
        assert!(matches!(err, DialError::InvalidParameter { name: "points", .. }));
        assert!(rosette_samples(10.0, &params(12, 1.0, MAX_POINTS)).is_ok());
    }

    #[test]
    fn rejects_negative_amplitude() {
        let err = rosette_samples(10.0, &params(12, -0.5, 400)).unwrap_err();
        assert!(matches!(err, DialError::InvalidParameter { name: "amplitude", .. }));
    }
}
