//! The `generate` command: options in, SVG or JSON out.

use std::fs;
use std::time::Instant;

use clap::Args;
use log::{debug, info};
use rand::Rng;
use serde::Serialize;

use dial_etch::{
    canvas_from_svg, generate_on, insert_into_document, render_document, standalone_canvas, DialOptions,
    GeometryNode,
};

use super::common::{load_options, write_output, OutputFormat};

/// Seeds picked by `--random-seed` stay small enough to retype.
const RANDOM_SEED_MAX: i64 = 1_000_000;

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// YAML config file; command-line options override it
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Insert the dial into this SVG document instead of a new one
    #[arg(long, value_name = "HOST.svg")]
    pub into: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    #[arg(short, long, value_enum, default_value = "svg")]
    pub format: OutputFormat,

    /// Pick a random seed and report it on stderr
    #[arg(long)]
    pub random_seed: bool,

    // Option overrides. `None` keeps the config (or default) value.
    #[arg(long, value_name = "MM")]
    pub diameter: Option<f64>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub draw_outline: Option<bool>,
    #[arg(long, value_name = "MM")]
    pub outline_stroke: Option<f64>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub outline_compensate_stroke: Option<bool>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub clip_to_circle: Option<bool>,
    #[arg(long, value_name = "MM")]
    pub inner_radius: Option<f64>,

    /// Pattern kind for single-layer dials
    #[arg(short = 'p', long = "pattern", value_name = "KIND")]
    pub pattern_type: Option<String>,

    #[arg(long, value_name = "MM")]
    pub stroke: Option<f64>,
    #[arg(long, value_name = "COLOR")]
    pub stroke_color: Option<String>,
    #[arg(long)]
    pub stroke_opacity: Option<f64>,

    #[arg(long, value_name = "MM")]
    pub ring_spacing: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub rays: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    pub lobes: Option<i64>,
    #[arg(long, value_name = "MM")]
    pub amplitude: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub points: Option<i64>,
    #[arg(long, value_name = "MM")]
    pub hatch_spacing: Option<f64>,
    #[arg(long, value_name = "DEG", allow_negative_numbers = true)]
    pub hatch_angle: Option<f64>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub hatch_double: Option<bool>,

    /// Stack layers from a preset instead of drawing one pattern
    #[arg(short = 'a', long, num_args = 0..=1, default_missing_value = "true")]
    pub auto_complex: Option<bool>,
    #[arg(long)]
    pub preset: Option<String>,
    #[arg(short = 'l', long, allow_negative_numbers = true)]
    pub layers: Option<i64>,
    #[arg(short = 's', long, allow_negative_numbers = true)]
    pub seed: Option<i64>,
    #[arg(long, value_name = "DEG")]
    pub rotate_jitter: Option<f64>,
    #[arg(long)]
    pub opacity_decay: Option<f64>,
    #[arg(long)]
    pub stroke_decay: Option<f64>,
    #[arg(long)]
    pub lobe_jitter: Option<i64>,
    #[arg(long)]
    pub amp_decay: Option<f64>,

    /// Root group id
    #[arg(long)]
    pub group_name: Option<String>,
}

impl GenerateArgs {
    /// Apply command-line overrides on top of loaded options.
    pub fn apply_overrides(&self, opts: &mut DialOptions) {
        macro_rules! take {
            ($($arg:ident => $field:ident),* $(,)?) => {
                $(
                    if let Some(v) = &self.$arg {
                        opts.$field = v.clone();
                    }
                )*
            };
        }

        take!(
            diameter => dial_diameter_mm,
            draw_outline => draw_outline,
            outline_stroke => outline_stroke_mm,
            outline_compensate_stroke => outline_compensate_stroke,
            clip_to_circle => clip_to_circle,
            inner_radius => inner_radius_mm,
            pattern_type => pattern_type,
            stroke => stroke_mm,
            stroke_color => stroke_color,
            stroke_opacity => stroke_opacity,
            ring_spacing => ring_spacing_mm,
            rays => rays,
            lobes => lobes,
            amplitude => amplitude_mm,
            points => points,
            hatch_spacing => hatch_spacing_mm,
            hatch_angle => hatch_angle_deg,
            hatch_double => hatch_double,
            auto_complex => auto_complex,
            preset => preset,
            layers => layers,
            seed => seed,
            rotate_jitter => rotate_jitter_deg,
            opacity_decay => opacity_decay,
            stroke_decay => stroke_decay,
            lobe_jitter => lobe_jitter,
            amp_decay => amp_decay,
            group_name => group_name,
        );
    }

    /// Resolve the final options: config file, then overrides, then seed.
    pub fn resolve_options(&self) -> Result<DialOptions, String> {
        let mut opts = match &self.config {
            Some(path) => {
                info!("Loading config: {}", path);
                load_options(path)?
            }
            None => DialOptions::default(),
        };
        self.apply_overrides(&mut opts);

        if self.random_seed {
            opts.seed = rand::rng().random_range(0..RANDOM_SEED_MAX);
            eprintln!("Random seed: {} (rerun with --seed {} to reproduce)", opts.seed, opts.seed);
        }
        debug!("Resolved options: {:?}", opts);
        Ok(opts)
    }
}

/// JSON output: the resolved options next to the geometry tree.
#[derive(Serialize)]
struct JsonOutput<'a> {
    options: &'a DialOptions,
    shape_count: usize,
    dial: &'a GeometryNode,
}

pub fn cmd_generate(args: &GenerateArgs) -> Result<(), String> {
    let opts = args.resolve_options()?;
    let start = Instant::now();

    let (dial, host) = match &args.into {
        Some(path) => {
            info!("Loading host: {}", path);
            let host = fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
            let canvas = canvas_from_svg(&host).map_err(|e| e.to_string())?;
            if canvas.user_units_per_mm.is_none() {
                info!("{} has a viewBox but no absolute width; assuming 96 dpi", path);
            }
            (generate_on(&opts, &canvas).map_err(|e| e.to_string())?, Some(host))
        }
        None => {
            let canvas = standalone_canvas(opts.dial_diameter_mm);
            (generate_on(&opts, &canvas).map_err(|e| e.to_string())?, None)
        }
    };

    let shape_count = dial.shape_count();
    if opts.auto_complex {
        eprintln!(
            "Generated {} shapes in {} layers (preset {}, seed {}) in {:?}",
            shape_count,
            layer_count(&dial),
            opts.preset,
            opts.seed,
            start.elapsed()
        );
    } else {
        eprintln!("Generated {} shapes ({}) in {:?}", shape_count, opts.pattern_type, start.elapsed());
    }

    let output = match args.format {
        OutputFormat::Json => {
            let json = JsonOutput { options: &opts, shape_count, dial: &dial };
            serde_json::to_string_pretty(&json).map_err(|e| format!("Failed to serialize JSON: {}", e))?
        }
        OutputFormat::Svg => match &host {
            Some(host) => insert_into_document(host, &dial).map_err(|e| e.to_string())?,
            None => render_document(&dial, opts.dial_diameter_mm).map_err(|e| e.to_string())?,
        },
    };

    write_output(args.output.as_deref(), &output)
}

fn layer_count(dial: &GeometryNode) -> usize {
    let mut count = 0;
    dial.for_each_group(&mut |g| {
        if g.layer.is_some() {
            count += 1;
        }
    });
    count
}
