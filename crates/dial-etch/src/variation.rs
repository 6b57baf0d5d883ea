//! Deterministic per-layer variation.
//!
//! A layered dial repeats a few base patterns, each pass slightly different:
//! lobe counts jitter, amplitudes and strokes decay, every layer gets a small
//! random rotation. All of it is driven by one seeded [`Rng`], consumed in a
//! fixed order per layer:
//!
//! 1. kind-specific fields in declaration order (lobes, amplitude, points
//!    for guilloche; spacing, angle for crosshatch; spacing or rays otherwise),
//!    each drawing only when its rule needs randomness
//! 2. the layer rotation, always
//!
//! So the same seed and the same plan reproduce the same stack bit for bit.

use log::debug;

use crate::node::Stroke;
use crate::patterns::{
    ConcentricParams, CrosshatchParams, GuillocheParams, PatternKind, PatternParams, SunburstParams,
};
use crate::rng::Rng;
use crate::units::Units;

/// Derived guilloche layers never sample fewer points than this.
pub const MIN_DERIVED_POINTS: i64 = 800;

/// Each derived guilloche layer samples 10% more points than the base.
pub const POINTS_GROWTH_PER_LAYER: f64 = 0.10;

/// Derived hatch angles wander by up to this many degrees either way.
pub const HATCH_ANGLE_JITTER_DEG: f64 = 5.0;

/// Opacity floor for decayed layers.
pub const MIN_LAYER_OPACITY: f64 = 0.02;

/// How a plan entry sets one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule<T> {
    /// Computed from the base configuration by the layer's decay/jitter formula.
    Derived,
    /// Used as is.
    Fixed(T),
    /// Fixed near `center`, offset by a draw in `[-spread, spread]`.
    /// Counts as fixed: no further jitter applies.
    Around { center: T, spread: T },
    /// The base value, raised to at least `min`. Counts as fixed.
    AtLeast(T),
}

impl<T> Rule<T> {
    /// Whether the plan pins this field (so derived formulas are skipped).
    pub fn is_fixed(&self) -> bool {
        !matches!(self, Rule::Derived)
    }

    pub fn map<U>(self, f: impl Fn(T) -> U) -> Rule<U> {
        match self {
            Rule::Derived => Rule::Derived,
            Rule::Fixed(v) => Rule::Fixed(f(v)),
            Rule::Around { center, spread } => Rule::Around { center: f(center), spread: f(spread) },
            Rule::AtLeast(min) => Rule::AtLeast(f(min)),
        }
    }
}

/// Values a [`Rule`] can jitter and floor.
pub trait Jitter: Copy {
    fn around(center: Self, spread: Self, rng: &mut Rng) -> Self;
    fn at_least(self, min: Self) -> Self;
}

impl Jitter for i64 {
    fn around(center: i64, spread: i64, rng: &mut Rng) -> i64 {
        let spread = spread.saturating_abs();
        center.saturating_add(rng.next_int(-spread, spread))
    }

    fn at_least(self, min: i64) -> i64 {
        self.max(min)
    }
}

impl Jitter for f64 {
    fn around(center: f64, spread: f64, rng: &mut Rng) -> f64 {
        center + rng.next_uniform(-spread.abs(), spread.abs())
    }

    fn at_least(self, min: f64) -> f64 {
        self.max(min)
    }
}

impl<T: Jitter> Rule<T> {
    /// Resolve against a base value; `derive` runs only for `Derived`.
    pub fn resolve(self, rng: &mut Rng, base: T, derive: impl FnOnce(&mut Rng) -> T) -> T {
        match self {
            Rule::Derived => derive(rng),
            Rule::Fixed(v) => v,
            Rule::Around { center, spread } => T::around(center, spread, rng),
            Rule::AtLeast(min) => base.at_least(min),
        }
    }
}

impl Rule<bool> {
    /// Flags are either pinned or taken from the base.
    pub fn or_base(self, base: bool) -> bool {
        match self {
            Rule::Fixed(v) => v,
            _ => base,
        }
    }
}

/// Per-kind override rules for one plan entry.
///
/// Lengths are in millimeters; they are converted with the run's [`Units`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerRule {
    Concentric {
        spacing_mm: Rule<f64>,
    },
    Sunburst {
        rays: Rule<i64>,
    },
    Crosshatch {
        spacing_mm: Rule<f64>,
        angle_deg: Rule<f64>,
        double: Rule<bool>,
    },
    Guilloche {
        lobes: Rule<i64>,
        amplitude_mm: Rule<f64>,
        points: Rule<i64>,
    },
}

impl LayerRule {
    /// A rule with every field derived.
    pub fn derived(kind: PatternKind) -> Self {
        match kind {
            PatternKind::Concentric => LayerRule::Concentric { spacing_mm: Rule::Derived },
            PatternKind::Sunburst => LayerRule::Sunburst { rays: Rule::Derived },
            PatternKind::Crosshatch => LayerRule::Crosshatch {
                spacing_mm: Rule::Derived,
                angle_deg: Rule::Derived,
                double: Rule::Derived,
            },
            PatternKind::Guilloche => LayerRule::Guilloche {
                lobes: Rule::Derived,
                amplitude_mm: Rule::Derived,
                points: Rule::Derived,
            },
        }
    }

    pub fn kind(&self) -> PatternKind {
        match self {
            LayerRule::Concentric { .. } => PatternKind::Concentric,
            LayerRule::Sunburst { .. } => PatternKind::Sunburst,
            LayerRule::Crosshatch { .. } => PatternKind::Crosshatch,
            LayerRule::Guilloche { .. } => PatternKind::Guilloche,
        }
    }
}

/// Base pattern parameters in drawing units.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseConfig {
    pub ring_spacing: f64,
    pub rays: i64,
    pub lobes: i64,
    pub amplitude: f64,
    pub points: i64,
    pub hatch_spacing: f64,
    pub hatch_angle_deg: f64,
    pub hatch_double: bool,
    pub stroke_width: f64,
    pub stroke_color: String,
    pub stroke_opacity: f64,
}

impl BaseConfig {
    /// The base stroke, opacity clamped to [0, 1].
    pub fn stroke(&self) -> Stroke {
        Stroke::new(self.stroke_color.clone(), self.stroke_width, self.stroke_opacity)
    }
}

/// Decay and jitter factors applied across layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayConfig {
    pub stroke_decay: f64,
    pub opacity_decay: f64,
    pub amp_decay: f64,
    pub lobe_jitter: i64,
    pub rotate_jitter_deg: f64,
}

/// One fully resolved layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    /// Z-order index; later layers draw on top.
    pub index: usize,
    pub params: PatternParams,
    pub stroke: Stroke,
    /// Degrees about the dial center.
    pub rotation_deg: f64,
}

impl LayerSpec {
    pub fn kind(&self) -> PatternKind {
        self.params.kind()
    }
}

/// Resolves layers in index order from a single seeded sequence.
#[derive(Debug, Clone)]
pub struct VariationEngine<'a> {
    rng: Rng,
    base: &'a BaseConfig,
    decay: DecayConfig,
    units: Units,
}

impl<'a> VariationEngine<'a> {
    pub fn new(seed: i64, base: &'a BaseConfig, decay: DecayConfig, units: Units) -> Self {
        Self {
            rng: Rng::from_seed_i64(seed),
            base,
            decay,
            units,
        }
    }

    /// `stroke_0 * stroke_decay^i`
    pub fn stroke_width(&self, index: usize) -> f64 {
        (self.base.stroke_width * self.decay.stroke_decay.powi(index as i32)).max(0.0)
    }

    /// `clamp(opacity_0 * opacity_decay^i, 0.02, 1.0)`
    pub fn opacity(&self, index: usize) -> f64 {
        (self.base.stroke_opacity * self.decay.opacity_decay.powi(index as i32))
            .clamp(MIN_LAYER_OPACITY, 1.0)
    }

    /// Resolve layer `index`. Layers must be resolved in increasing order
    /// for the draw sequence to match between runs.
    pub fn resolve(&mut self, index: usize, rule: &LayerRule) -> LayerSpec {
        let params = self.resolve_params(index, rule);

        let stroke = Stroke::new(self.base.stroke_color.clone(), self.stroke_width(index), self.opacity(index));

        let jitter = self.decay.rotate_jitter_deg.abs();
        let rotation_deg = self.rng.next_uniform(-jitter, jitter);

        debug!(
            "layer {}: {:?} stroke={:.4} opacity={:.3} rotation={:.3}",
            index, params, stroke.width, stroke.opacity, rotation_deg
        );

        LayerSpec { index, params, stroke, rotation_deg }
    }

    fn resolve_params(&mut self, index: usize, rule: &LayerRule) -> PatternParams {
        let base = self.base;
        let units = self.units;
        let layer = index as i32;

        match *rule {
            LayerRule::Concentric { spacing_mm } => {
                let spacing = spacing_mm
                    .map(|v| units.mm(v))
                    .resolve(&mut self.rng, base.ring_spacing, |_| base.ring_spacing);
                PatternParams::Concentric(ConcentricParams { spacing })
            }
            LayerRule::Sunburst { rays } => {
                let rays = rays.resolve(&mut self.rng, base.rays, |_| base.rays);
                PatternParams::Sunburst(SunburstParams { rays: to_count(rays) })
            }
            LayerRule::Crosshatch { spacing_mm, angle_deg, double } => {
                let spacing = spacing_mm
                    .map(|v| units.mm(v))
                    .resolve(&mut self.rng, base.hatch_spacing, |_| base.hatch_spacing);
                let angle_deg = angle_deg.resolve(&mut self.rng, base.hatch_angle_deg, |rng| {
                    base.hatch_angle_deg + rng.next_uniform(-HATCH_ANGLE_JITTER_DEG, HATCH_ANGLE_JITTER_DEG)
                });
                let double = double.or_base(base.hatch_double);
                PatternParams::Crosshatch(CrosshatchParams { spacing, angle_deg, double })
            }
            LayerRule::Guilloche { lobes, amplitude_mm, points } => {
                let jitter = self.decay.lobe_jitter.saturating_abs();
                let lobes = lobes.resolve(&mut self.rng, base.lobes, |rng| {
                    base.lobes.saturating_add(rng.next_int(-jitter, jitter)).max(2)
                });
                let amp_decay = self.decay.amp_decay;
                let amplitude = amplitude_mm
                    .map(|v| units.mm(v))
                    .resolve(&mut self.rng, base.amplitude, |_| base.amplitude * amp_decay.powi(layer));
                let points = points.resolve(&mut self.rng, base.points, |_| {
                    let grown = (base.points as f64 * (1.0 + POINTS_GROWTH_PER_LAYER * index as f64)).round();
                    (grown as i64).max(MIN_DERIVED_POINTS)
                });
                PatternParams::Guilloche(GuillocheParams {
                    lobes: to_count(lobes),
                    amplitude: amplitude.max(0.0),
                    points: to_count(points),
                })
            }
        }
    }
}

/// Narrow a resolved count; negatives become 0 so validation reports them.
fn to_count(v: i64) -> u32 {
    v.clamp(0, u32::MAX as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn base() -> BaseConfig {
        BaseConfig {
            ring_spacing: 0.6,
            rays: 120,
            lobes: 12,
            amplitude: 1.2,
            points: 1200,
            hatch_spacing: 0.7,
            hatch_angle_deg: 35.0,
            hatch_double: true,
            stroke_width: 0.1,
            stroke_color: "#000000".to_string(),
            stroke_opacity: 0.35,
        }
    }

    fn decay() -> DecayConfig {
        DecayConfig {
            stroke_decay: 0.85,
            opacity_decay: 0.75,
            amp_decay: 0.7,
            lobe_jitter: 10,
            rotate_jitter_deg: 6.0,
        }
    }

    fn mm() -> Units {
        Units::from_host(&crate::units::Canvas::millimeters(Default::default()))
    }

    fn guilloche(layer: &LayerSpec) -> GuillocheParams {
        match layer.params {
            PatternParams::Guilloche(p) => p,
            other => panic!("expected guilloche, got {:?}", other),
        }
    }

    #[test]
    fn derived_guilloche_follows_formulas() {
        let base = base();
        let mut engine = VariationEngine::new(1, &base, decay(), mm());
        let rule = LayerRule::derived(PatternKind::Guilloche);

        for i in 0..6 {
            let layer = engine.resolve(i, &rule);
            let p = guilloche(&layer);
            assert!((2..=22).contains(&p.lobes), "lobes {} outside 12 +/- 10", p.lobes);
            assert!((p.amplitude - 1.2 * 0.7f64.powi(i as i32)).abs() < 1e-12);
            let expected = ((1200.0 * (1.0 + 0.1 * i as f64)).round() as u32).max(800);
            assert_eq!(p.points, expected);
            assert!(layer.rotation_deg.abs() <= 6.0);
        }
    }

    #[test]
    fn fixed_fields_are_not_jittered() {
        let base = base();
        let mut engine = VariationEngine::new(5, &base, decay(), mm());
        let rule = LayerRule::Guilloche {
            lobes: Rule::Fixed(30),
            amplitude_mm: Rule::Fixed(0.5),
            points: Rule::AtLeast(1600),
        };
        for i in 0..4 {
            let p = guilloche(&engine.resolve(i, &rule));
            assert_eq!(p.lobes, 30);
            assert_eq!(p.amplitude, 0.5);
            assert_eq!(p.points, 1600);
        }
    }

    #[test]
    fn around_rule_stays_in_spread() {
        let base = base();
        let mut engine = VariationEngine::new(11, &base, decay(), mm());
        let rule = LayerRule::Guilloche {
            lobes: Rule::Around { center: 36, spread: 6 },
            amplitude_mm: Rule::Fixed(0.28),
            points: Rule::AtLeast(2400),
        };
        for i in 0..50 {
            let p = guilloche(&engine.resolve(i, &rule));
            assert!((30..=42).contains(&p.lobes));
            assert_eq!(p.points, 2400);
        }
    }

    #[test]
    fn extreme_jitter_saturates() {
        let mut b = base();
        b.lobes = i64::MAX;
        let rule = LayerRule::derived(PatternKind::Guilloche);
        for jitter in [i64::MAX, i64::MIN] {
            let mut d = decay();
            d.lobe_jitter = jitter;
            let mut engine = VariationEngine::new(4, &b, d, mm());
            for i in 0..20 {
                let p = guilloche(&engine.resolve(i, &rule));
                assert!(p.lobes >= 2);
            }
        }

        let base_spec = base();
        let mut engine = VariationEngine::new(4, &base_spec, decay(), mm());
        let rule = LayerRule::Guilloche {
            lobes: Rule::Around { center: i64::MIN, spread: i64::MIN },
            amplitude_mm: Rule::Fixed(0.3),
            points: Rule::Fixed(400),
        };
        for i in 0..20 {
            // Negative counts narrow to 0 and are left for validation
            assert_eq!(guilloche(&engine.resolve(i, &rule)).lobes, 0);
        }
    }

    #[test]
    fn fixed_lengths_use_run_units() {
        let base = base();
        let units = Units::default();
        let mut engine = VariationEngine::new(1, &base, decay(), units);
        let layer = engine.resolve(0, &LayerRule::Concentric { spacing_mm: Rule::Fixed(0.45) });
        let PatternParams::Concentric(p) = layer.params else { panic!("expected concentric") };
        assert!((p.spacing - 0.45 * 96.0 / 25.4).abs() < 1e-12);
    }

    #[test]
    fn derived_hatch_angle_jitters_within_five_degrees() {
        let base = base();
        let mut engine = VariationEngine::new(3, &base, decay(), mm());
        let rule = LayerRule::derived(PatternKind::Crosshatch);
        for i in 0..20 {
            let PatternParams::Crosshatch(p) = engine.resolve(i, &rule).params else { unreachable!() };
            assert!((p.angle_deg - 35.0).abs() <= 5.0);
            assert!(p.double);
            assert_eq!(p.spacing, 0.7);
        }
    }

    #[test]
    fn zero_jitter_still_consumes_draws() {
        // Rotation is always drawn, so two layers with zero jitter leave the
        // sequence in the same place as two with non-zero jitter.
        let base = base();
        let mut still = decay();
        still.rotate_jitter_deg = 0.0;
        still.lobe_jitter = 0;

        let rule = LayerRule::derived(PatternKind::Guilloche);
        let mut a = VariationEngine::new(9, &base, still, mm());
        let mut b = VariationEngine::new(9, &base, decay(), mm());
        for i in 0..2 {
            let layer = a.resolve(i, &rule);
            assert_eq!(layer.rotation_deg, 0.0);
            assert_eq!(guilloche(&layer).lobes, 12);
            b.resolve(i, &rule);
        }
        assert_eq!(a.rng.next_u64(), b.rng.next_u64());
    }

    #[test]
    fn opacity_is_floored() {
        let mut b = base();
        b.stroke_opacity = 0.35;
        let mut d = decay();
        d.opacity_decay = 0.1;
        let engine = VariationEngine::new(0, &b, d, mm());
        assert_eq!(engine.opacity(10), MIN_LAYER_OPACITY);
    }

    proptest! {
        #[test]
        fn stroke_and_opacity_never_increase(
            seed in any::<i64>(),
            stroke_decay in 0.01f64..=1.0,
            opacity_decay in 0.01f64..=1.0,
            opacity in 0.0f64..=1.0,
            layers in 1usize..16,
        ) {
            let mut b = base();
            b.stroke_opacity = opacity;
            let mut d = decay();
            d.stroke_decay = stroke_decay;
            d.opacity_decay = opacity_decay;

            let mut engine = VariationEngine::new(seed, &b, d, mm());
            let rule = LayerRule::derived(PatternKind::Guilloche);
            let specs: Vec<_> = (0..layers).map(|i| engine.resolve(i, &rule)).collect();

            for pair in specs.windows(2) {
                prop_assert!(pair[1].stroke.width <= pair[0].stroke.width);
                prop_assert!(pair[1].stroke.opacity <= pair[0].stroke.opacity);
            }
            for layer in &specs {
                prop_assert!(layer.stroke.opacity >= MIN_LAYER_OPACITY);
                prop_assert!(layer.stroke.opacity <= 1.0);
            }
        }

        #[test]
        fn same_seed_same_layers(seed in any::<i64>()) {
            let b = base();
            let rule = LayerRule::derived(PatternKind::Guilloche);
            let mut e1 = VariationEngine::new(seed, &b, decay(), mm());
            let mut e2 = VariationEngine::new(seed, &b, decay(), mm());
            for i in 0..4 {
                prop_assert_eq!(e1.resolve(i, &rule), e2.resolve(i, &rule));
            }
        }
    }
}
