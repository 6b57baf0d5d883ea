//! Dial composition: options in, geometry tree out.
//!
//! A run is a straight line through a few stages:
//!
//! ```text
//! Init -> ResolvePlan -> ForEachLayer { ResolveParams -> Generate -> PositionAndRotate }
//!      -> AssembleOutline -> Done
//! ```
//!
//! The output tree looks like this (ids shown for the default group name):
//!
//! ```text
//! g#dial-pattern
//! ├── g#dial-pattern-pattern          clipped to the dial circle
//! │   ├── g#dial-pattern-pattern-layer-1   (layer 0, rotated)
//! │   ├── ...
//! │   └── g#dial-pattern-pattern-layer-L
//! └── circle                           outline, drawn last
//! ```
//!
//! With auto-complex off the pattern shapes sit directly in the pattern group.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{DialError, Result};
use crate::geometry::Point;
use crate::node::{ClipCircle, GeometryNode, Group, Rotation, Shape, Stroke};
use crate::patterns::{
    generate_pattern, Bounds, ConcentricParams, CrosshatchParams, GuillocheParams, PatternKind, PatternParams,
    SunburstParams,
};
use crate::plan::resolve_plan;
use crate::units::{Canvas, Host, Units};
use crate::variation::{BaseConfig, DecayConfig, VariationEngine};

/// Default root group id.
pub const DEFAULT_GROUP_NAME: &str = "dial-pattern";

/// Layer rotations smaller than this are left untransformed.
const ROTATION_EPSILON: f64 = 1e-9;

/// Outline stroke color.
const OUTLINE_COLOR: &str = "#000000";

/// Everything a dial generation run needs.
///
/// Lengths ending in `_mm` are millimeters and are converted through the
/// host. Unknown `pattern_type` and `preset` names fall back to
/// `guilloche` and `rosette_stack`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialOptions {
    pub dial_diameter_mm: f64,

    pub draw_outline: bool,
    pub outline_stroke_mm: f64,
    /// Shrink the dial radius by half the outline stroke so the outline's
    /// outer edge lands on the nominal diameter.
    pub outline_compensate_stroke: bool,

    pub clip_to_circle: bool,
    pub inner_radius_mm: f64,

    pub pattern_type: String,

    pub stroke_mm: f64,
    pub stroke_color: String,
    pub stroke_opacity: f64,

    // Concentric
    pub ring_spacing_mm: f64,

    // Sunburst
    pub rays: i64,

    // Guilloche
    pub lobes: i64,
    pub amplitude_mm: f64,
    pub points: i64,

    // Crosshatch
    pub hatch_spacing_mm: f64,
    pub hatch_angle_deg: f64,
    pub hatch_double: bool,

    // Auto-complex layering
    pub auto_complex: bool,
    pub preset: String,
    pub layers: i64,
    pub seed: i64,
    pub rotate_jitter_deg: f64,
    pub opacity_decay: f64,
    pub stroke_decay: f64,
    pub lobe_jitter: i64,
    pub amp_decay: f64,

    pub group_name: String,
}

impl Default for DialOptions {
    fn default() -> Self {
        Self {
            dial_diameter_mm: 28.5,
            draw_outline: true,
            outline_stroke_mm: 0.12,
            outline_compensate_stroke: true,
            clip_to_circle: true,
            inner_radius_mm: 0.0,
            pattern_type: "guilloche".to_string(),
            stroke_mm: 0.10,
            stroke_color: "#000000".to_string(),
            stroke_opacity: 0.35,
            ring_spacing_mm: 0.6,
            rays: 120,
            lobes: 12,
            amplitude_mm: 1.2,
            points: 1200,
            hatch_spacing_mm: 0.7,
            hatch_angle_deg: 35.0,
            hatch_double: true,
            auto_complex: false,
            preset: "rosette_stack".to_string(),
            layers: 4,
            seed: 1,
            rotate_jitter_deg: 6.0,
            opacity_decay: 0.75,
            stroke_decay: 0.85,
            lobe_jitter: 10,
            amp_decay: 0.70,
            group_name: DEFAULT_GROUP_NAME.to_string(),
        }
    }
}

impl DialOptions {
    /// Root group id; empty names use the default.
    pub fn group_id(&self) -> &str {
        let name = self.group_name.trim();
        if name.is_empty() { DEFAULT_GROUP_NAME } else { name }
    }

    fn base_config(&self, units: &Units) -> BaseConfig {
        BaseConfig {
            ring_spacing: units.mm(self.ring_spacing_mm),
            rays: self.rays,
            lobes: self.lobes,
            amplitude: units.mm(self.amplitude_mm),
            points: self.points,
            hatch_spacing: units.mm(self.hatch_spacing_mm),
            hatch_angle_deg: self.hatch_angle_deg,
            hatch_double: self.hatch_double,
            stroke_width: units.mm(self.stroke_mm),
            stroke_color: self.stroke_color.clone(),
            stroke_opacity: self.stroke_opacity,
        }
    }

    fn decay_config(&self) -> DecayConfig {
        DecayConfig {
            stroke_decay: self.stroke_decay,
            opacity_decay: self.opacity_decay,
            amp_decay: self.amp_decay,
            lobe_jitter: self.lobe_jitter,
            rotate_jitter_deg: self.rotate_jitter_deg,
        }
    }
}

/// Composition stages, in the order a run passes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    ResolvePlan,
    ForEachLayer,
    AssembleOutline,
    Done,
}

/// Geometry fixed during `Init`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DialFrame {
    bounds: Bounds,
    outline_width: f64,
    units: Units,
}

fn init(options: &DialOptions, host: &dyn Host) -> Result<DialFrame> {
    let d = options.dial_diameter_mm;
    if !(d > 0.0 && d.is_finite()) {
        return Err(DialError::invalid("dial_diameter_mm", d, "must be a finite value > 0"));
    }

    let units = Units::from_host(host);
    let compensation = if options.outline_compensate_stroke {
        options.outline_stroke_mm
    } else {
        0.0
    };
    let outer_mm = ((d - compensation) / 2.0).max(0.0);
    let inner_mm = options.inner_radius_mm.max(0.0);

    let bounds = Bounds::new(host.center(), units.mm(outer_mm), units.mm(inner_mm));
    debug!(
        "{:?}: center=({:.3},{:.3}) outer={:.4} inner={:.4} units/mm={:.4}",
        Stage::Init,
        bounds.center.x,
        bounds.center.y,
        bounds.outer_radius,
        bounds.inner_radius,
        units.per_mm()
    );

    Ok(DialFrame {
        bounds,
        outline_width: units.mm(options.outline_stroke_mm.max(0.0)),
        units,
    })
}

/// Base parameters for a kind, taken verbatim from the options.
fn single_layer_params(kind: PatternKind, options: &DialOptions, base: &BaseConfig) -> Result<PatternParams> {
    Ok(match kind {
        PatternKind::Concentric => PatternParams::Concentric(ConcentricParams { spacing: base.ring_spacing }),
        PatternKind::Sunburst => PatternParams::Sunburst(SunburstParams {
            rays: options.rays.clamp(0, u32::MAX as i64) as u32,
        }),
        PatternKind::Crosshatch => PatternParams::Crosshatch(CrosshatchParams {
            spacing: base.hatch_spacing,
            angle_deg: base.hatch_angle_deg,
            double: base.hatch_double,
        }),
        PatternKind::Guilloche => PatternParams::Guilloche(GuillocheParams {
            lobes: count("lobes", options.lobes, "must be at least 2")?,
            amplitude: base.amplitude,
            points: count("points", options.points, "must be at least 200")?,
        }),
    })
}

fn count(name: &'static str, v: i64, constraint: &'static str) -> Result<u32> {
    u32::try_from(v).map_err(|_| DialError::invalid(name, v, constraint))
}

fn pattern_group(options: &DialOptions, frame: &DialFrame) -> Group {
    let root_id = options.group_id();
    let mut group = Group::new(format!("{}-pattern", root_id), "pattern");
    if options.clip_to_circle {
        group.clip = Some(ClipCircle {
            id: format!("{}-clip", root_id),
            center: frame.bounds.center,
            radius: frame.bounds.outer_radius,
        });
    }
    group
}

fn layer_group(parent_id: &str, index: usize, rotation_deg: f64, pivot: Point) -> Group {
    let mut group = Group::new(format!("{}-layer-{}", parent_id, index + 1), format!("layer-{}", index + 1));
    group.layer = Some(index);
    if rotation_deg.abs() > ROTATION_EPSILON {
        group.rotation = Some(Rotation { degrees: rotation_deg, pivot });
    }
    group
}

/// Generate a dial on a host without a physical size, centered at the origin.
///
/// Millimeters convert at 96 dpi.
pub fn generate(options: &DialOptions) -> Result<GeometryNode> {
    generate_on(options, &Canvas::default())
}

/// Generate a dial against a host document's center and units.
///
/// Pure: no host mutation happens here. Insert the returned tree with
/// [`crate::svg::insert_into_document`] or render it standalone.
pub fn generate_on(options: &DialOptions, host: &dyn Host) -> Result<GeometryNode> {
    let frame = init(options, host)?;
    let base = options.base_config(&frame.units);

    let mut pattern = pattern_group(options, &frame);

    if !options.auto_complex {
        let kind = PatternKind::resolve(&options.pattern_type);
        let params = single_layer_params(kind, options, &base)?;
        let shapes = generate_pattern(&params, &frame.bounds, &base.stroke())?;
        info!("single {} layer: {} shapes", kind.name(), shapes.len());
        pattern.extend(shapes);
    } else {
        let requested = options.layers.max(0) as usize;
        let plan = resolve_plan(&options.preset, requested);
        debug!("{:?}: {} x{} {:?}", Stage::ResolvePlan, plan.preset.name(), plan.layers, plan.kinds());

        let mut engine = VariationEngine::new(options.seed, &base, options.decay_config(), frame.units);
        for index in 0..plan.layers {
            let resolved = engine.resolve(index, &plan.entry(index).rule);
            let shapes = generate_pattern(&resolved.params, &frame.bounds, &resolved.stroke)?;
            debug!("{:?} {}: {} x{}", Stage::ForEachLayer, index, resolved.kind().name(), shapes.len());

            let mut layer = layer_group(&pattern.id, index, resolved.rotation_deg, frame.bounds.center);
            layer.extend(shapes);
            pattern.push(layer);
        }
        info!("{} preset: {} layers, seed {}", plan.preset.name(), plan.layers, options.seed);
    }

    let mut root = Group::new(options.group_id(), options.group_id());
    root.push(pattern);

    if options.draw_outline {
        debug!("{:?}: radius={:.4}", Stage::AssembleOutline, frame.bounds.outer_radius);
        root.push(Shape::circle(
            frame.bounds.center,
            frame.bounds.outer_radius,
            Stroke::new(OUTLINE_COLOR, frame.outline_width, 1.0),
        ));
    }

    let node = GeometryNode::Group(root);
    debug!("{:?}: {} shapes", Stage::Done, node.shape_count());
    Ok(node)
}
