//! CLI command implementations.
//!
//! - `generate` - Generate a dial as SVG or JSON
//! - `presets` / `kinds` - List presets and pattern kinds
//! - `example` - Print an example config file

pub mod common;
pub mod example;
pub mod generate;
pub mod listing;

pub use example::cmd_example;
pub use generate::cmd_generate;
pub use listing::{cmd_kinds, cmd_presets};
