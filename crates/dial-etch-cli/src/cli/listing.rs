//! The `presets` and `kinds` listing commands.

use dial_etch::{PatternKind, Preset};

/// One line per preset: name, layer kinds, minimum layers, description.
pub fn preset_lines() -> Vec<String> {
    Preset::all()
        .iter()
        .map(|preset| {
            let kinds: Vec<_> = preset.entries().iter().map(|e| e.kind().name()).collect();
            let min = match preset.min_layers(0) {
                0 => "any".to_string(),
                n => n.to_string(),
            };
            format!(
                "  {:<14} [{}] min layers: {}\n      {}",
                preset.name(),
                kinds.join(", "),
                min,
                preset.description()
            )
        })
        .collect()
}

pub fn cmd_presets() {
    println!("Available presets:");
    for line in preset_lines() {
        println!("{}", line);
    }
}

pub fn cmd_kinds() {
    println!("Available pattern kinds:");
    for kind in PatternKind::all() {
        println!("  {:<12} {}", kind.name(), kind.description());
    }
}
