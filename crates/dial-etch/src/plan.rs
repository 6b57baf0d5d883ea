//! Preset layer plans.
//!
//! A preset names a fixed sequence of pattern passes. Resolving it yields a
//! [`LayerPlan`]: the entries, cycled by layer index, and the final layer
//! count after the preset's minimum is applied.

use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{DialError, Result};
use crate::patterns::PatternKind;
use crate::variation::{LayerRule, Rule};

/// Named layer compositions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Repeated free rosettes.
    RosetteStack,
    /// Rings, rosette, faint sunburst, fine rosette.
    Breguet,
    /// Sunburst shimmer, crosshatch, rosette, fine rosette.
    Modern,
    /// Many rosettes with varying lobes.
    Pocketwatch,
}

impl Preset {
    /// Preset used when a name cannot be resolved.
    pub const FALLBACK: Preset = Preset::RosetteStack;

    pub fn all() -> &'static [Preset] {
        &[Preset::RosetteStack, Preset::Breguet, Preset::Modern, Preset::Pocketwatch]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::RosetteStack => "rosette_stack",
            Preset::Breguet => "breguet",
            Preset::Modern => "modern",
            Preset::Pocketwatch => "pocketwatch",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Preset::RosetteStack => "Stacked rosettes with jittered lobes and decaying amplitude",
            Preset::Breguet => "Subtle rings, rosette, faint sunburst, fine rosette",
            Preset::Modern => "Sunburst shimmer, crosshatch texture, rosette structure, fine rosette",
            Preset::Pocketwatch => "Many rosettes with alternating lobes and shrinking amplitudes",
        }
    }

    pub fn from_name(name: &str) -> Option<Preset> {
        match name.trim().to_lowercase().replace('-', "_").as_str() {
            "rosette_stack" | "rosette" => Some(Preset::RosetteStack),
            "breguet" => Some(Preset::Breguet),
            "modern" => Some(Preset::Modern),
            "pocketwatch" | "pocket_watch" => Some(Preset::Pocketwatch),
            _ => None,
        }
    }

    /// Resolve a preset name, falling back to [`Preset::FALLBACK`].
    pub fn resolve(name: &str) -> Preset {
        name.parse().unwrap_or_else(|err: DialError| {
            warn!("{}; using {}", err, Preset::FALLBACK.name());
            Preset::FALLBACK
        })
    }

    /// The preset's entries, in draw order.
    pub fn entries(&self) -> Vec<PlanEntry> {
        match self {
            Preset::RosetteStack | Preset::Pocketwatch => vec![PlanEntry::derived(PatternKind::Guilloche)],
            Preset::Breguet => vec![
                PlanEntry::new(LayerRule::Concentric { spacing_mm: Rule::Fixed(0.45) }),
                PlanEntry::new(LayerRule::Guilloche {
                    lobes: Rule::Around { center: 12, spread: 2 },
                    amplitude_mm: Rule::Fixed(1.0),
                    points: Rule::AtLeast(1600),
                }),
                PlanEntry::new(LayerRule::Sunburst { rays: Rule::Fixed(240) }),
                PlanEntry::new(LayerRule::Guilloche {
                    lobes: Rule::Around { center: 36, spread: 6 },
                    amplitude_mm: Rule::Fixed(0.28),
                    points: Rule::AtLeast(2400),
                }),
            ],
            Preset::Modern => vec![
                PlanEntry::new(LayerRule::Sunburst { rays: Rule::Fixed(300) }),
                PlanEntry::new(LayerRule::Crosshatch {
                    spacing_mm: Rule::Fixed(0.6),
                    angle_deg: Rule::Fixed(35.0),
                    double: Rule::Fixed(true),
                }),
                PlanEntry::new(LayerRule::Guilloche {
                    lobes: Rule::Around { center: 18, spread: 3 },
                    amplitude_mm: Rule::Fixed(0.75),
                    points: Rule::AtLeast(2000),
                }),
                PlanEntry::new(LayerRule::Guilloche {
                    lobes: Rule::Around { center: 48, spread: 8 },
                    amplitude_mm: Rule::Fixed(0.22),
                    points: Rule::AtLeast(3000),
                }),
            ],
        }
    }

    /// Fewest layers the preset draws, given the requested count.
    ///
    /// Repeating presets draw exactly what was asked for.
    pub fn min_layers(&self, requested: usize) -> usize {
        match self {
            Preset::RosetteStack | Preset::Pocketwatch => requested,
            Preset::Breguet | Preset::Modern => 4,
        }
    }
}

impl FromStr for Preset {
    type Err = DialError;

    fn from_str(s: &str) -> Result<Self> {
        Preset::from_name(s).ok_or_else(|| DialError::UnsupportedPresetOrKind {
            what: "preset",
            name: s.to_string(),
        })
    }
}

/// One plan step: a pattern kind and its override rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanEntry {
    pub rule: LayerRule,
}

impl PlanEntry {
    pub fn new(rule: LayerRule) -> Self {
        Self { rule }
    }

    pub fn derived(kind: PatternKind) -> Self {
        Self::new(LayerRule::derived(kind))
    }

    pub fn kind(&self) -> PatternKind {
        self.rule.kind()
    }
}

/// A resolved, cyclic layer plan.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPlan {
    pub preset: Preset,
    pub entries: Vec<PlanEntry>,
    /// Final layer count, at least the preset minimum and at least 1.
    pub layers: usize,
}

impl LayerPlan {
    /// Entry for layer `index`, cycling through the plan.
    pub fn entry(&self, index: usize) -> &PlanEntry {
        &self.entries[index % self.entries.len()]
    }

    /// Kinds for every layer, in draw order.
    pub fn kinds(&self) -> Vec<PatternKind> {
        (0..self.layers).map(|i| self.entry(i).kind()).collect()
    }
}

/// Resolve a preset name and requested layer count into a plan.
///
/// Unknown names resolve to `rosette_stack`. The count is raised to the
/// preset's minimum and never drops below one layer.
pub fn resolve_plan(preset_name: &str, requested_layers: usize) -> LayerPlan {
    let preset = Preset::resolve(preset_name);
    let layers = requested_layers.max(1).max(preset.min_layers(requested_layers));
    if layers != requested_layers {
        debug!("{}: layer count {} raised to {}", preset.name(), requested_layers, layers);
    }

    LayerPlan { preset, entries: preset.entries(), layers }
}
