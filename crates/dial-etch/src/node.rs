//! The output geometry tree.
//!
//! A generation run produces one `GeometryNode` tree: leaf shapes with a
//! stroke-only style, nested inside groups that may rotate their children
//! about a point and clip them to a circle. The tree is plain data; turning
//! it into a document is the job of [`crate::svg`].

use serde::{Deserialize, Serialize};

use crate::geometry::{path_data, Point};

/// Stroke line cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn name(&self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

/// Stroke line join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    pub fn name(&self) -> &'static str {
        match self {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        }
    }
}

/// Stroke style for a leaf shape.
///
/// There is no fill field: every shape is an engraving line and renders
/// with `fill: none`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
    /// Always within [0, 1].
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap: Option<LineCap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join: Option<LineJoin>,
}

impl Stroke {
    /// Create a stroke with opacity clamped to [0, 1] and a non-negative width.
    pub fn new(color: impl Into<String>, width: f64, opacity: f64) -> Self {
        Self {
            color: color.into(),
            width: width.max(0.0),
            opacity: opacity.clamp(0.0, 1.0),
            cap: None,
            join: None,
        }
    }

    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = Some(cap);
        self
    }

    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.join = Some(join);
        self
    }

    /// Fill is always none.
    #[inline]
    pub fn fill(&self) -> &'static str {
        "none"
    }

    /// Render as an inline CSS style declaration.
    pub fn to_css(&self) -> String {
        let mut css = format!(
            "fill:{};stroke:{};stroke-width:{};stroke-opacity:{}",
            self.fill(),
            self.color,
            self.width,
            self.opacity
        );
        if let Some(cap) = self.cap {
            css.push_str(";stroke-linecap:");
            css.push_str(cap.name());
        }
        if let Some(join) = self.join {
            css.push_str(";stroke-linejoin:");
            css.push_str(join.name());
        }
        css
    }
}

/// Geometry of a leaf shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeKind {
    Circle { center: Point, radius: f64 },
    Segment { from: Point, to: Point },
    /// Open polyline through `points`, never closed implicitly.
    Polyline { points: Vec<Point> },
}

impl ShapeKind {
    /// Path description for segment and polyline shapes.
    ///
    /// Circles are emitted as native circle elements and return `None`.
    pub fn path_data(&self) -> Option<String> {
        match self {
            ShapeKind::Circle { .. } => None,
            ShapeKind::Segment { from, to } => Some(path_data(&[*from, *to])),
            ShapeKind::Polyline { points } => Some(path_data(points)),
        }
    }
}

/// A leaf shape with its stroke style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(flatten)]
    pub kind: ShapeKind,
    pub stroke: Stroke,
}

impl Shape {
    pub fn circle(center: Point, radius: f64, stroke: Stroke) -> Self {
        Self {
            kind: ShapeKind::Circle { center, radius: radius.max(0.0) },
            stroke,
        }
    }

    pub fn segment(from: Point, to: Point, stroke: Stroke) -> Self {
        Self { kind: ShapeKind::Segment { from, to }, stroke }
    }

    pub fn polyline(points: Vec<Point>, stroke: Stroke) -> Self {
        Self { kind: ShapeKind::Polyline { points }, stroke }
    }
}

/// Rotation in degrees about a pivot point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub degrees: f64,
    pub pivot: Point,
}

impl Rotation {
    /// SVG transform attribute value.
    pub fn to_transform(&self) -> String {
        format!("rotate({:.6},{},{})", self.degrees, self.pivot.x, self.pivot.y)
    }
}

/// Circular clip boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipCircle {
    /// Id of the emitted clip path definition.
    pub id: String,
    pub center: Point,
    pub radius: f64,
}

/// A group of child nodes, drawn in order (later children on top).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub label: String,
    /// Z-order index for layer groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Rotation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip: Option<ClipCircle>,
    pub children: Vec<GeometryNode>,
}

impl Group {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            layer: None,
            rotation: None,
            clip: None,
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, node: impl Into<GeometryNode>) {
        self.children.push(node.into());
    }

    pub fn extend<I>(&mut self, nodes: I)
    where
        I: IntoIterator,
        I::Item: Into<GeometryNode>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
    }

    /// Direct child groups, in draw order.
    pub fn child_groups(&self) -> impl Iterator<Item = &Group> {
        self.children.iter().filter_map(|c| match c {
            GeometryNode::Group(g) => Some(g),
            GeometryNode::Shape(_) => None,
        })
    }

    /// Find a descendant group (or self) by id.
    pub fn find(&self, id: &str) -> Option<&Group> {
        if self.id == id {
            return Some(self);
        }
        self.child_groups().find_map(|g| g.find(id))
    }
}

/// Output tree node: a leaf shape or a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum GeometryNode {
    Shape(Shape),
    Group(Group),
}

impl From<Shape> for GeometryNode {
    fn from(shape: Shape) -> Self {
        GeometryNode::Shape(shape)
    }
}

impl From<Group> for GeometryNode {
    fn from(group: Group) -> Self {
        GeometryNode::Group(group)
    }
}

impl GeometryNode {
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            GeometryNode::Group(g) => Some(g),
            GeometryNode::Shape(_) => None,
        }
    }

    /// Visit every leaf shape depth-first, in draw order.
    pub fn for_each_shape<F: FnMut(&Shape)>(&self, f: &mut F) {
        match self {
            GeometryNode::Shape(s) => f(s),
            GeometryNode::Group(g) => {
                for child in &g.children {
                    child.for_each_shape(f);
                }
            }
        }
    }

    /// Total number of leaf shapes in the tree.
    pub fn shape_count(&self) -> usize {
        let mut count = 0;
        self.for_each_shape(&mut |_| count += 1);
        count
    }

    /// Visit every group depth-first (parents before children).
    pub fn for_each_group<F: FnMut(&Group)>(&self, f: &mut F) {
        if let GeometryNode::Group(g) = self {
            f(g);
            for child in &g.children {
                child.for_each_group(f);
            }
        }
    }

    pub fn for_each_group_mut<F: FnMut(&mut Group)>(&mut self, f: &mut F) {
        if let GeometryNode::Group(g) = self {
            f(g);
            for child in &mut g.children {
                child.for_each_group_mut(f);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke() -> Stroke {
        Stroke::new("#000000", 0.5, 0.35)
    }

    #[test]
    fn stroke_clamps_opacity_and_width() {
        let s = Stroke::new("#000", -1.0, 1.7);
        assert_eq!(s.width, 0.0);
        assert_eq!(s.opacity, 1.0);
        assert_eq!(Stroke::new("#000", 1.0, -0.2).opacity, 0.0);
    }

    #[test]
    fn css_is_fill_none_with_optional_cap() {
        let css = stroke().with_cap(LineCap::Round).to_css();
        assert!(css.starts_with("fill:none;"));
        assert!(css.contains("stroke-linecap:round"));
        assert!(!css.contains("linejoin"));
    }

    #[test]
    fn segment_path_is_two_points() {
        let shape = Shape::segment(Point::new(0.0, 0.0), Point::new(1.0, 1.0), stroke());
        assert_eq!(
            shape.kind.path_data().as_deref(),
            Some("M 0.000000,0.000000 L 1.000000,1.000000")
        );
        let circle = Shape::circle(Point::new(0.0, 0.0), 1.0, stroke());
        assert!(circle.kind.path_data().is_none());
    }

    #[test]
    fn counts_nested_shapes() {
        let mut inner = Group::new("inner", "inner");
        inner.push(Shape::circle(Point::new(0.0, 0.0), 1.0, stroke()));
        inner.push(Shape::circle(Point::new(0.0, 0.0), 2.0, stroke()));
        let mut outer = Group::new("outer", "outer");
        outer.push(inner);
        outer.push(Shape::circle(Point::new(0.0, 0.0), 3.0, stroke()));

        let node = GeometryNode::from(outer);
        assert_eq!(node.shape_count(), 3);
        let group = node.as_group().unwrap();
        assert!(group.find("inner").is_some());
        assert!(group.find("missing").is_none());
    }

    #[test]
    fn rotation_transform_format() {
        let r = Rotation { degrees: 2.5, pivot: Point::new(10.0, 20.0) };
        assert_eq!(r.to_transform(), "rotate(2.500000,10,20)");
    }
}
