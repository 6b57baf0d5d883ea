//! Common utilities shared across CLI commands.

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use dial_etch::DialOptions;

/// Output format for generated dials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Svg,
    Json,
}

/// Load dial options from a YAML file.
///
/// Missing fields keep their defaults, so a config only needs the values
/// it changes.
pub fn load_options<P: AsRef<Path>>(path: P) -> Result<DialOptions, String> {
    let content = fs::read_to_string(path.as_ref())
        .map_err(|e| format!("Failed to read config file {}: {}", path.as_ref().display(), e))?;

    parse_options(&content)
}

/// Parse dial options from YAML text.
pub fn parse_options(content: &str) -> Result<DialOptions, String> {
    // An empty file is a valid "all defaults" config
    if content.trim().is_empty() {
        return Ok(DialOptions::default());
    }
    serde_yaml::from_str(content).map_err(|e| format!("Failed to parse config YAML: {}", e))
}

/// Write output to a file, or stdout for `None` and `-`.
pub fn write_output(path: Option<&str>, output: &str) -> Result<(), String> {
    match path {
        Some("-") | None => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
        }
        Some(path) => {
            fs::write(path, output).map_err(|e| format!("Failed to write {}: {}", path, e))?;
            eprintln!("Wrote: {}", path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let opts = parse_options("preset: breguet\nauto_complex: true\nlayers: 6\n").unwrap();
        assert_eq!(opts.preset, "breguet");
        assert!(opts.auto_complex);
        assert_eq!(opts.layers, 6);
        assert_eq!(opts.dial_diameter_mm, 28.5);
        assert_eq!(opts.stroke_color, "#000000");
    }

    #[test]
    fn empty_yaml_is_all_defaults() {
        assert_eq!(parse_options("").unwrap(), DialOptions::default());
        assert_eq!(parse_options("  \n").unwrap(), DialOptions::default());
    }

    #[test]
    fn bad_yaml_is_reported() {
        let err = parse_options("layers: [1, 2").unwrap_err();
        assert!(err.contains("Failed to parse config YAML"));

        let err = parse_options("layers: many").unwrap_err();
        assert!(err.contains("invalid type"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_options("/nonexistent/dial.yaml").unwrap_err();
        assert!(err.contains("Failed to read config file"));
    }
}
