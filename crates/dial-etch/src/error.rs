//! Error types for dial generation.
//!
//! ## Rust Lesson #20: Error Handling
//!
//! Rust uses `Result<T, E>` instead of exceptions. `thiserror` derives the
//! `Display` and `std::error::Error` impls from the `#[error(...)]`
//! attributes, so each variant carries its own message template.

use thiserror::Error;

/// Errors that can occur while generating a dial.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DialError {
    /// A parameter violated its constraint. Aborts the current dial.
    #[error("invalid parameter `{name}` = {value}: {constraint}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        constraint: &'static str,
    },

    /// Unknown preset or pattern kind name.
    ///
    /// Only the strict parsers return this; the generation path falls back
    /// to a documented default instead.
    #[error("unsupported {what}: {name:?}")]
    UnsupportedPresetOrKind { what: &'static str, name: String },

    /// The host could not convert millimeters to drawing units.
    #[error("unit conversion failed: {0}")]
    UnitConversion(String),

    /// Reading or writing the host SVG document failed.
    #[error("SVG error: {0}")]
    Svg(String),
}

impl DialError {
    /// Shorthand for an `InvalidParameter` error.
    pub fn invalid(name: &'static str, value: impl ToString, constraint: &'static str) -> Self {
        DialError::InvalidParameter {
            name,
            value: value.to_string(),
            constraint,
        }
    }
}

pub type Result<T> = std::result::Result<T, DialError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_names_parameter_and_value() {
        let err = DialError::invalid("spacing", 0.0, "must be > 0");
        let msg = err.to_string();
        assert!(msg.contains("spacing"));
        assert!(msg.contains('0'));
        assert!(msg.contains("must be > 0"));
    }

    #[test]
    fn unsupported_display() {
        let err = DialError::UnsupportedPresetOrKind {
            what: "preset",
            name: "nonexistent".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported preset: \"nonexistent\"");
    }
}
