//! Pattern generators for dial faces.
//!
//! Each generator is a pure function of the dial bounds, its own parameter
//! struct and a stroke style. Shapes come back in insertion order (oldest
//! first) and are never reordered, since later shapes draw on top.

mod concentric;
mod crosshatch;
mod guilloche;
mod sunburst;

pub use concentric::generate_concentric;
pub use crosshatch::{generate_crosshatch, hatch_offsets};
pub use guilloche::{generate_guilloche, rosette_samples, PolarSample};
pub use sunburst::{generate_sunburst, MIN_RAYS};

use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{DialError, Result};
use crate::geometry::Point;
use crate::node::{Shape, Stroke};

/// Most shapes one ring or hatch family may produce.
pub const MAX_SHAPES: usize = 100_000;

/// Available pattern kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Concentric,
    Sunburst,
    Crosshatch,
    Guilloche,
}

impl PatternKind {
    /// Kind used when a name cannot be resolved.
    pub const FALLBACK: PatternKind = PatternKind::Guilloche;

    /// Get all available kinds.
    pub fn all() -> &'static [PatternKind] {
        &[
            PatternKind::Concentric,
            PatternKind::Sunburst,
            PatternKind::Crosshatch,
            PatternKind::Guilloche,
        ]
    }

    /// Get kind name as string.
    pub fn name(&self) -> &'static str {
        match self {
            PatternKind::Concentric => "concentric",
            PatternKind::Sunburst => "sunburst",
            PatternKind::Crosshatch => "crosshatch",
            PatternKind::Guilloche => "guilloche",
        }
    }

    /// Brief description for listings.
    pub fn description(&self) -> &'static str {
        match self {
            PatternKind::Concentric => "Evenly spaced rings from the inner to the outer radius",
            PatternKind::Sunburst => "Straight rays radiating from the dial center",
            PatternKind::Crosshatch => "One or two families of parallel lines",
            PatternKind::Guilloche => "Rosette curve with a cosine-modulated radius",
        }
    }

    /// Parse kind from string, accepting a few common aliases.
    pub fn from_name(name: &str) -> Option<PatternKind> {
        match name.trim().to_lowercase().as_str() {
            "concentric" | "rings" => Some(PatternKind::Concentric),
            "sunburst" | "rays" | "starburst" => Some(PatternKind::Sunburst),
            "crosshatch" | "hatch" => Some(PatternKind::Crosshatch),
            "guilloche" | "guilloché" | "rosette" => Some(PatternKind::Guilloche),
            _ => None,
        }
    }

    /// Resolve a kind name, falling back to [`PatternKind::FALLBACK`].
    pub fn resolve(name: &str) -> PatternKind {
        name.parse().unwrap_or_else(|err: DialError| {
            warn!("{}; using {}", err, PatternKind::FALLBACK.name());
            PatternKind::FALLBACK
        })
    }
}

impl FromStr for PatternKind {
    type Err = DialError;

    fn from_str(s: &str) -> Result<Self> {
        PatternKind::from_name(s).ok_or_else(|| DialError::UnsupportedPresetOrKind {
            what: "pattern kind",
            name: s.to_string(),
        })
    }
}

/// Radius budget for a dial, in drawing units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub center: Point,
    pub outer_radius: f64,
    pub inner_radius: f64,
}

impl Bounds {
    /// Create bounds with both radii clamped to be non-negative.
    pub fn new(center: Point, outer_radius: f64, inner_radius: f64) -> Self {
        Self {
            center,
            outer_radius: outer_radius.max(0.0),
            inner_radius: inner_radius.max(0.0),
        }
    }
}

/// Concentric ring parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcentricParams {
    /// Distance between rings. Must be > 0.
    pub spacing: f64,
}

/// Sunburst parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunburstParams {
    /// Ray count; clamped to [`MIN_RAYS`]..=[`MAX_SHAPES`].
    pub rays: u32,
}

/// Crosshatch parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrosshatchParams {
    /// Distance between parallel lines. Must be > 0.
    pub spacing: f64,
    pub angle_deg: f64,
    /// Add a second family at `angle_deg + 90`.
    pub double: bool,
}

/// Guilloche rosette parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuillocheParams {
    /// At least 2.
    pub lobes: u32,
    /// Radial modulation depth. Must be >= 0.
    pub amplitude: f64,
    /// Sample count; at least 200.
    pub points: u32,
}

/// Resolved parameters for one pattern pass, tagged by kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PatternParams {
    Concentric(ConcentricParams),
    Sunburst(SunburstParams),
    Crosshatch(CrosshatchParams),
    Guilloche(GuillocheParams),
}

impl PatternParams {
    pub fn kind(&self) -> PatternKind {
        match self {
            PatternParams::Concentric(_) => PatternKind::Concentric,
            PatternParams::Sunburst(_) => PatternKind::Sunburst,
            PatternParams::Crosshatch(_) => PatternKind::Crosshatch,
            PatternParams::Guilloche(_) => PatternKind::Guilloche,
        }
    }
}

/// Generate the shapes for one pattern pass.
///
/// This is the single dispatch point from resolved parameters to the
/// matching generator.
pub fn generate_pattern(params: &PatternParams, bounds: &Bounds, stroke: &Stroke) -> Result<Vec<Shape>> {
    match params {
        PatternParams::Concentric(p) => generate_concentric(bounds, p, stroke),
        PatternParams::Sunburst(p) => Ok(generate_sunburst(bounds, p, stroke)),
        PatternParams::Crosshatch(p) => generate_crosshatch(bounds, p, stroke),
        PatternParams::Guilloche(p) => generate_guilloche(bounds, p, stroke),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in PatternKind::all() {
            assert_eq!(PatternKind::from_name(kind.name()), Some(*kind));
        }
    }

    #[test]
    fn aliases_and_case() {
        assert_eq!(PatternKind::from_name("Guilloché"), Some(PatternKind::Guilloche));
        assert_eq!(PatternKind::from_name(" RAYS "), Some(PatternKind::Sunburst));
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        let err = "spirograph".parse::<PatternKind>().unwrap_err();
        assert!(matches!(err, DialError::UnsupportedPresetOrKind { what: "pattern kind", .. }));
    }

    #[test]
    fn unknown_kind_falls_back_to_guilloche() {
        assert_eq!(PatternKind::resolve("spirograph"), PatternKind::Guilloche);
    }

    #[test]
    fn bounds_clamp_negative_radii() {
        let b = Bounds::new(Point::new(0.0, 0.0), 10.0, -3.0);
        assert_eq!(b.inner_radius, 0.0);
    }

    #[test]
    fn dispatch_matches_kind() {
        let bounds = Bounds::new(Point::new(0.0, 0.0), 10.0, 0.0);
        let stroke = Stroke::new("#000", 0.1, 1.0);
        let params = PatternParams::Sunburst(SunburstParams { rays: 8 });
        assert_eq!(params.kind(), PatternKind::Sunburst);
        assert_eq!(generate_pattern(&params, &bounds, &stroke).unwrap().len(), 8);
    }
}
