//! # dial-etch
//!
//! Layered guilloche pattern generation for watch dial faces.
//!
//! Four line-art generators (concentric rings, sunburst rays, crosshatch and
//! the cosine rosette) are stacked into layers by a named preset. A seeded
//! variation engine jitters each layer, so the same options always produce
//! the same dial.
//!
//! ```no_run
//! use dial_etch::{generate, DialOptions};
//!
//! let options = DialOptions { auto_complex: true, preset: "breguet".into(), ..Default::default() };
//! let dial = generate(&options)?;
//! println!("{} shapes", dial.shape_count());
//! # Ok::<(), dial_etch::DialError>(())
//! ```
//!
//! ## Rust Lesson #7: Modules
//!
//! Rust modules are like ES6 modules but more explicit:
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level

pub mod compose;
pub mod error;
pub mod geometry;
pub mod node;
pub mod patterns;
pub mod plan;
pub mod rng;
pub mod svg;
pub mod units;
pub mod variation;

// Re-export common types at crate root for convenience.
pub use compose::{generate, generate_on, DialOptions, Stage};
pub use error::{DialError, Result};
pub use geometry::{polar_to_cartesian, Point};
pub use node::{ClipCircle, GeometryNode, Group, LineCap, LineJoin, Rotation, Shape, ShapeKind, Stroke};
pub use patterns::{generate_pattern, Bounds, PatternKind, PatternParams};
pub use plan::{resolve_plan, LayerPlan, Preset};
pub use rng::Rng;
pub use svg::{canvas_from_svg, insert_into_document, render_document, standalone_canvas};
pub use units::{Canvas, Host, Units};
pub use variation::{LayerSpec, VariationEngine};
