//! Host coordinate space and millimeter conversion.
//!
//! The host document supplies the dial center and a mm to drawing-unit
//! conversion. Conversion failures never abort generation: they fall back
//! to the CSS reference of 96 user units per inch.

use log::warn;

use crate::error::{DialError, Result};
use crate::geometry::Point;

/// Drawing units per millimeter at 96 dpi.
pub const FALLBACK_USER_UNITS_PER_MM: f64 = 96.0 / 25.4;

/// The host collaborator generation runs against.
///
/// ## Rust Lesson #12: Traits
///
/// A trait is an interface. Anything that can report a center and convert
/// millimeters can host a dial: a parsed SVG document, a fixed canvas in a
/// test, or an application's own document model.
pub trait Host {
    /// Center of the coordinate space, where the dial is placed.
    fn center(&self) -> Point;

    /// Convert millimeters to drawing units.
    fn mm_to_user(&self, mm: f64) -> Result<f64>;
}

/// A plain host: a center point and an optional known scale.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Canvas {
    pub center: Point,
    /// Drawing units per millimeter, when the document declares one.
    pub user_units_per_mm: Option<f64>,
}

impl Canvas {
    pub fn new(center: Point, user_units_per_mm: Option<f64>) -> Self {
        Self { center, user_units_per_mm }
    }

    /// A canvas whose drawing unit is one millimeter.
    pub fn millimeters(center: Point) -> Self {
        Self::new(center, Some(1.0))
    }
}

impl Host for Canvas {
    fn center(&self) -> Point {
        self.center
    }

    fn mm_to_user(&self, mm: f64) -> Result<f64> {
        match self.user_units_per_mm {
            Some(scale) if scale.is_finite() && scale > 0.0 => Ok(mm * scale),
            Some(scale) => Err(DialError::UnitConversion(format!("invalid document scale {}", scale))),
            None => Err(DialError::UnitConversion("document declares no physical size".to_string())),
        }
    }
}

/// Resolved mm to drawing-unit scale for one generation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Units {
    per_mm: f64,
}

impl Units {
    /// Ask the host for its scale once, falling back on failure.
    pub fn from_host<H: Host + ?Sized>(host: &H) -> Self {
        let per_mm = match host.mm_to_user(1.0) {
            Ok(v) if v.is_finite() && v > 0.0 => v,
            Ok(v) => {
                warn!("host reported {} units per mm; using {:.4}", v, FALLBACK_USER_UNITS_PER_MM);
                FALLBACK_USER_UNITS_PER_MM
            }
            Err(err) => {
                warn!("{}; using {:.4} units per mm", err, FALLBACK_USER_UNITS_PER_MM);
                FALLBACK_USER_UNITS_PER_MM
            }
        };
        Self { per_mm }
    }

    pub fn per_mm(&self) -> f64 {
        self.per_mm
    }

    #[inline]
    pub fn mm(&self, mm: f64) -> f64 {
        mm * self.per_mm
    }
}

impl Default for Units {
    fn default() -> Self {
        Self { per_mm: FALLBACK_USER_UNITS_PER_MM }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    struct Broken;

    impl Host for Broken {
        fn center(&self) -> Point {
            Point::new(1.0, 2.0)
        }
        fn mm_to_user(&self, _mm: f64) -> Result<f64> {
            Err(DialError::UnitConversion("no units".to_string()))
        }
    }

    #[test]
    fn known_scale_is_used() {
        let units = Units::from_host(&Canvas::millimeters(Point::default()));
        assert_eq!(units.mm(28.5), 28.5);
    }

    #[test]
    fn failing_host_falls_back_to_96_dpi() {
        let units = Units::from_host(&Broken);
        assert_abs_diff_eq!(units.mm(25.4), 96.0, epsilon = 1e-9);
    }

    #[test]
    fn unsized_canvas_falls_back() {
        let units = Units::from_host(&Canvas::default());
        assert_eq!(units.per_mm(), FALLBACK_USER_UNITS_PER_MM);
    }

    #[test]
    fn nonsense_scale_falls_back() {
        let canvas = Canvas::new(Point::default(), Some(-2.0));
        assert!(canvas.mm_to_user(1.0).is_err());
        assert_eq!(Units::from_host(&canvas).per_mm(), FALLBACK_USER_UNITS_PER_MM);
    }
}
