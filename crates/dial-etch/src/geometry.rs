//! Core geometry for dial layouts.
//!
//! ## Rust Lesson #3: Structs & Derives
//!
//! The `#[derive(...)]` macro auto-generates common functionality:
//! - `Debug` = print with `{:?}`
//! - `Clone`/`Copy` = small stack values copy implicitly
//! - `PartialEq` = compare with `==`
//! - `Serialize` = turn into JSON (via serde)
//!
//! Dial angles are measured in degrees clockwise from 12 o'clock, and the
//! Y axis grows downward like every SVG document.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// A 2D point with x,y coordinates in drawing units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Convert dial polar coordinates to a cartesian point.
///
/// Angle 0 points up (12 o'clock) and grows clockwise:
///   x = cx + r * sin(theta)
///   y = cy - r * cos(theta)
#[inline]
pub fn polar_to_cartesian(center: Point, radius: f64, angle_deg: f64) -> Point {
    let a = angle_deg.to_radians();
    Point::new(center.x + radius * a.sin(), center.y - radius * a.cos())
}

/// Build a path description through `points`.
///
/// Move to the first point, line to each following point. Never closes the
/// path; a closed curve repeats its first point at the end instead.
/// Returns an empty string for an empty slice.
pub fn path_data(points: &[Point]) -> String {
    let mut d = String::with_capacity(points.len() * 24);
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            d.push(' ');
        }
        let cmd = if i == 0 { 'M' } else { 'L' };
        // Writing into a String cannot fail.
        let _ = write!(d, "{} {:.6},{:.6}", cmd, p.x, p.y);
    }
    d
}
