//! The `example` command: a commented config file to start from.

pub const EXAMPLE_CONFIG: &str = r##"# dial-etch config
#
# Every field is optional; missing fields keep the values shown here.
# Lengths ending in _mm are millimeters.
#
#   dial-etch generate --config dial.yaml -o dial.svg

# Dial
dial_diameter_mm: 28.5
draw_outline: true
outline_stroke_mm: 0.12
# Shrink the pattern so the outline's outer edge sits on the diameter
outline_compensate_stroke: true
clip_to_circle: true
inner_radius_mm: 0.0

# Single pattern (auto_complex: false)
# concentric | sunburst | crosshatch | guilloche
pattern_type: guilloche

stroke_mm: 0.10
stroke_color: "#000000"
stroke_opacity: 0.35

ring_spacing_mm: 0.6
rays: 120
lobes: 12
amplitude_mm: 1.2
points: 1200
hatch_spacing_mm: 0.7
hatch_angle_deg: 35.0
hatch_double: true

# Layered preset (auto_complex: true)
# rosette_stack | breguet | modern | pocketwatch
auto_complex: false
preset: rosette_stack
layers: 4
seed: 1
rotate_jitter_deg: 6.0
opacity_decay: 0.75
stroke_decay: 0.85
lobe_jitter: 10
amp_decay: 0.70

group_name: dial-pattern
"##;

pub fn cmd_example() {
    print!("{}", EXAMPLE_CONFIG);
}
