//! SVG host boundary: read a host document, write geometry trees.
//!
//! Generation itself never touches a document. This module does the three
//! things around it:
//!
//! - [`canvas_from_svg`] reads the host root's `width` and `viewBox` to find
//!   the dial center and the mm to user-unit scale
//! - [`render_document`] writes a standalone document sized to the dial
//! - [`insert_into_document`] appends a finished tree as the last child of
//!   an existing document's root, leaving everything else byte-for-byte intact
//!
//! Reading uses quick-xml's streaming reader, so a host document is never
//! loaded into a DOM. Writing uses quick-xml's `Writer`, which escapes
//! attribute values for us.

use std::borrow::Cow;
use std::collections::HashSet;
use std::str::FromStr;

use log::debug;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::reader::Reader;
use quick_xml::Writer;
use svgtypes::{Length, LengthUnit, ViewBox};

use crate::error::{DialError, Result};
use crate::geometry::Point;
use crate::node::{ClipCircle, GeometryNode, Group, Shape, ShapeKind};
use crate::units::{Canvas, FALLBACK_USER_UNITS_PER_MM};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

fn svg_err(e: impl ToString) -> DialError {
    DialError::Svg(e.to_string())
}

// ============================================================================
// Reading the host
// ============================================================================

/// What a single pass over the host document found.
#[derive(Debug, Default)]
struct HostScan {
    width: Option<String>,
    height: Option<String>,
    view_box: Option<String>,
    /// Byte range of the root start tag.
    root_tag: (usize, usize),
    root_self_closing: bool,
    /// Byte offset of the root's closing tag.
    root_end: Option<usize>,
    defs: Option<DefsSlot>,
    /// Every `id` attribute inside the root, the root included.
    ids: HashSet<String>,
}

/// Where clip paths go when the root already has a `<defs>`.
#[derive(Debug, Clone, Copy)]
enum DefsSlot {
    /// Offset of `</defs>`.
    Open(usize),
    /// Byte range of a self-closing `<defs/>`.
    Empty(usize, usize),
}

fn attr_text(value: &[u8]) -> Result<String> {
    std::str::from_utf8(value).map(str::to_string).map_err(svg_err)
}

fn scan_host(content: &str) -> Result<HostScan> {
    let mut reader = Reader::from_str(content);
    let mut scan = HostScan::default();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut in_root_defs = false;

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader
            .read_event()
            .map_err(|e| svg_err(format!("XML parse error at position {}: {}", reader.error_position(), e)))?;
        let after = reader.buffer_position() as usize;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                let name = e.local_name();
                for attr in e.attributes().flatten() {
                    if attr.key.local_name().as_ref() == b"id" {
                        scan.ids.insert(attr_text(&attr.value)?);
                    }
                }

                if !seen_root {
                    if name.as_ref() != b"svg" {
                        return Err(svg_err("root element is not <svg>"));
                    }
                    seen_root = true;
                    scan.root_tag = (before, after);
                    scan.root_self_closing = is_empty;
                    for attr in e.attributes().flatten() {
                        match attr.key.local_name().as_ref() {
                            b"width" => scan.width = Some(attr_text(&attr.value)?),
                            b"height" => scan.height = Some(attr_text(&attr.value)?),
                            b"viewBox" | b"viewbox" => scan.view_box = Some(attr_text(&attr.value)?),
                            _ => {}
                        }
                    }
                    if is_empty {
                        break;
                    }
                } else if depth == 1 && name.as_ref() == b"defs" && scan.defs.is_none() {
                    if is_empty {
                        scan.defs = Some(DefsSlot::Empty(before, after));
                    } else {
                        in_root_defs = true;
                    }
                }

                if !is_empty {
                    depth += 1;
                }
            }
            Event::End(ref e) => {
                depth = depth.saturating_sub(1);
                if in_root_defs && depth == 1 && e.local_name().as_ref() == b"defs" {
                    scan.defs = Some(DefsSlot::Open(before));
                    in_root_defs = false;
                }
                if depth == 0 && seen_root {
                    scan.root_end = Some(before);
                    break;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(svg_err("document has no <svg> root"));
    }
    if !scan.root_self_closing && scan.root_end.is_none() {
        return Err(svg_err("unterminated <svg> root"));
    }
    Ok(scan)
}

/// Convert an absolute length to CSS pixels (user units without a viewBox).
fn length_to_px(length: &Length) -> Option<f64> {
    let n = length.number;
    let px = match length.unit {
        LengthUnit::None | LengthUnit::Px => n,
        LengthUnit::In => n * 96.0,
        LengthUnit::Cm => n * 96.0 / 2.54,
        LengthUnit::Mm => n * 96.0 / 25.4,
        LengthUnit::Pt => n * 4.0 / 3.0,
        LengthUnit::Pc => n * 16.0,
        _ => return None,
    };
    (px.is_finite() && px > 0.0).then_some(px)
}

fn parse_length(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| Length::from_str(v.trim()).ok()).as_ref().and_then(length_to_px)
}

fn parse_view_box(value: Option<&str>) -> Option<ViewBox> {
    value
        .and_then(|v| ViewBox::from_str(v).ok())
        .filter(|vb| vb.w > 0.0 && vb.h > 0.0)
}

/// Build a [`Canvas`] from a host SVG document's root element.
///
/// - center: middle of the `viewBox`, else half the `width`/`height`, else
///   the origin
/// - scale: user units per mm from the `viewBox` width over the physical
///   `width`. Without a `viewBox` a user unit is one CSS pixel. With a
///   `viewBox` but no absolute `width` the scale is unknown and generation
///   falls back to 96 dpi.
pub fn canvas_from_svg(content: &str) -> Result<Canvas> {
    let scan = scan_host(content)?;
    let view_box = parse_view_box(scan.view_box.as_deref());
    let width_px = parse_length(scan.width.as_deref());
    let height_px = parse_length(scan.height.as_deref());

    let center = match (view_box.as_ref(), width_px, height_px) {
        (Some(vb), _, _) => Point::new(vb.x + vb.w / 2.0, vb.y + vb.h / 2.0),
        (None, Some(w), Some(h)) => Point::new(w / 2.0, h / 2.0),
        _ => Point::default(),
    };

    let user_units_per_mm = match (view_box.as_ref(), width_px) {
        (Some(vb), Some(w)) => Some(vb.w / w * FALLBACK_USER_UNITS_PER_MM),
        (Some(_), None) => None,
        (None, _) => Some(FALLBACK_USER_UNITS_PER_MM),
    };

    debug!("host canvas: center=({:.3},{:.3}) units/mm={:?}", center.x, center.y, user_units_per_mm);
    Ok(Canvas::new(center, user_units_per_mm))
}

// ============================================================================
// Writing trees
// ============================================================================

fn emit<'a, W: std::io::Write>(writer: &mut Writer<W>, event: Event<'a>) -> Result<()> {
    writer.write_event(event).map_err(svg_err)
}

fn write_shape<W: std::io::Write>(writer: &mut Writer<W>, shape: &Shape) -> Result<()> {
    let style = shape.stroke.to_css();
    let elem = match &shape.kind {
        ShapeKind::Circle { center, radius } => {
            let (cx, cy, r) = (center.x.to_string(), center.y.to_string(), radius.to_string());
            BytesStart::new("circle").with_attributes([
                ("cx", cx.as_str()),
                ("cy", cy.as_str()),
                ("r", r.as_str()),
                ("style", style.as_str()),
            ])
        }
        kind => {
            let d = kind.path_data().unwrap_or_default();
            BytesStart::new("path").with_attributes([("d", d.as_str()), ("style", style.as_str())])
        }
    };
    emit(writer, Event::Empty(elem))
}

fn write_group<W: std::io::Write>(writer: &mut Writer<W>, group: &Group) -> Result<()> {
    let mut elem = BytesStart::new("g");
    elem.push_attribute(("id", group.id.as_str()));
    if let Some(layer) = group.layer {
        elem.push_attribute(("data-layer", layer.to_string().as_str()));
    }
    if let Some(rotation) = &group.rotation {
        elem.push_attribute(("transform", rotation.to_transform().as_str()));
    }
    if let Some(clip) = &group.clip {
        elem.push_attribute(("clip-path", format!("url(#{})", clip.id).as_str()));
    }

    if group.children.is_empty() {
        return emit(writer, Event::Empty(elem));
    }

    emit(writer, Event::Start(elem))?;
    for child in &group.children {
        write_node(writer, child)?;
    }
    emit(writer, Event::End(BytesEnd::new("g")))
}

fn write_node<W: std::io::Write>(writer: &mut Writer<W>, node: &GeometryNode) -> Result<()> {
    match node {
        GeometryNode::Shape(shape) => write_shape(writer, shape),
        GeometryNode::Group(group) => write_group(writer, group),
    }
}

fn write_clip<W: std::io::Write>(writer: &mut Writer<W>, clip: &ClipCircle) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new("clipPath").with_attributes([("id", clip.id.as_str())])))?;
    let (cx, cy, r) = (clip.center.x.to_string(), clip.center.y.to_string(), clip.radius.to_string());
    emit(
        writer,
        Event::Empty(BytesStart::new("circle").with_attributes([
            ("cx", cx.as_str()),
            ("cy", cy.as_str()),
            ("r", r.as_str()),
        ])),
    )?;
    emit(writer, Event::End(BytesEnd::new("clipPath")))
}

fn collect_clips(node: &GeometryNode) -> Vec<ClipCircle> {
    let mut clips = Vec::new();
    node.for_each_group(&mut |g| {
        if let Some(clip) = &g.clip {
            clips.push(clip.clone());
        }
    });
    clips
}

/// Group and clip ids a tree will write.
fn tree_ids(node: &GeometryNode) -> Vec<String> {
    let mut ids = Vec::new();
    node.for_each_group(&mut |g| {
        ids.push(g.id.clone());
        if let Some(clip) = &g.clip {
            ids.push(clip.id.clone());
        }
    });
    ids
}

fn numbered_id(id: &str, root: &str, n: usize) -> String {
    match id.strip_prefix(root) {
        Some(rest) => format!("{}-{}{}", root, n, rest),
        None => format!("{}-{}", id, n),
    }
}

/// Number the tree's ids when any of them is already in the host.
///
/// The root id gains the first free `-2`, `-3`, ... suffix and every id
/// under it follows, so `dial-pattern-clip` becomes `dial-pattern-2-clip`
/// and the `clip-path` reference moves with it.
fn unique_ids<'a>(node: &'a GeometryNode, taken: &HashSet<String>) -> Cow<'a, GeometryNode> {
    let ids = tree_ids(node);
    if !ids.iter().any(|id| taken.contains(id)) {
        return Cow::Borrowed(node);
    }
    let Some(root) = node.as_group().map(|g| g.id.clone()) else {
        return Cow::Borrowed(node);
    };

    let free = |n: &usize| ids.iter().all(|id| !taken.contains(&numbered_id(id, &root, *n)));
    let n = (2..).find(free).unwrap_or(2);
    debug!("host already uses id {:?}; numbering tree ids with -{}", root, n);

    let mut node = node.clone();
    node.for_each_group_mut(&mut |g| {
        g.id = numbered_id(&g.id, &root, n);
        if let Some(clip) = &mut g.clip {
            clip.id = numbered_id(&clip.id, &root, n);
        }
    });
    Cow::Owned(node)
}

fn new_writer() -> Writer<Vec<u8>> {
    Writer::new_with_indent(Vec::new(), b' ', 2)
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String> {
    String::from_utf8(writer.into_inner()).map_err(svg_err)
}

/// Render clip paths, optionally wrapped in a `<defs>` element.
fn clips_fragment(clips: &[ClipCircle], wrap_in_defs: bool) -> Result<String> {
    let mut writer = new_writer();
    if wrap_in_defs {
        emit(&mut writer, Event::Start(BytesStart::new("defs")))?;
    }
    for clip in clips {
        write_clip(&mut writer, clip)?;
    }
    if wrap_in_defs {
        emit(&mut writer, Event::End(BytesEnd::new("defs")))?;
    }
    finish(writer)
}

fn node_fragment(node: &GeometryNode) -> Result<String> {
    let mut writer = new_writer();
    write_node(&mut writer, node)?;
    finish(writer)
}

/// The host a standalone document of `size_mm` provides: mm user units,
/// centered in the page.
pub fn standalone_canvas(size_mm: f64) -> Canvas {
    Canvas::millimeters(Point::new(size_mm / 2.0, size_mm / 2.0))
}

/// Write a standalone SVG document `size_mm` wide and high.
///
/// The tree should have been generated against [`standalone_canvas`] with
/// the same size so that it lands in the middle of the page.
pub fn render_document(node: &GeometryNode, size_mm: f64) -> Result<String> {
    if !(size_mm > 0.0 && size_mm.is_finite()) {
        return Err(DialError::invalid("size_mm", size_mm, "must be a finite value > 0"));
    }

    let size = size_mm.to_string();
    let width = format!("{}mm", size);
    let view_box = format!("0 0 {} {}", size, size);

    let mut writer = new_writer();
    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    emit(
        &mut writer,
        Event::Start(BytesStart::new("svg").with_attributes([
            ("xmlns", SVG_NS),
            ("width", width.as_str()),
            ("height", width.as_str()),
            ("viewBox", view_box.as_str()),
        ])),
    )?;

    let clips = collect_clips(node);
    if !clips.is_empty() {
        emit(&mut writer, Event::Start(BytesStart::new("defs")))?;
        for clip in &clips {
            write_clip(&mut writer, clip)?;
        }
        emit(&mut writer, Event::End(BytesEnd::new("defs")))?;
    }

    write_node(&mut writer, node)?;
    emit(&mut writer, Event::End(BytesEnd::new("svg")))?;

    let mut out = finish(writer)?;
    out.push('\n');
    Ok(out)
}

/// Append a tree as the last child of a host document's root.
///
/// Clip paths go into the root's existing `<defs>`, or a new one placed
/// just before the tree. Content outside those two insertion points is
/// copied through unchanged. Tree ids that the host already uses are
/// numbered so repeated insertion never duplicates an id.
pub fn insert_into_document(host: &str, node: &GeometryNode) -> Result<String> {
    let scan = scan_host(host)?;
    let node = unique_ids(node, &scan.ids);
    let clips = collect_clips(&node);
    let tree = node_fragment(&node)?;

    // (offset, replaced length, text), applied back to front
    let mut edits: Vec<(usize, usize, String)> = Vec::new();

    let mut tail = String::new();
    match (clips.is_empty(), scan.defs) {
        (true, _) => {}
        (false, Some(DefsSlot::Open(at))) => edits.push((at, 0, clips_fragment(&clips, false)? + "\n")),
        (false, Some(DefsSlot::Empty(start, end))) => {
            edits.push((start, end - start, clips_fragment(&clips, true)?));
        }
        (false, None) => {
            tail.push_str(&clips_fragment(&clips, true)?);
            tail.push('\n');
        }
    }
    tail.push_str(&tree);
    tail.push('\n');

    if scan.root_self_closing {
        let (start, end) = scan.root_tag;
        let open_tag = host[start..end].trim_end_matches('>').trim_end_matches('/').trim_end();
        edits.push((start, end - start, format!("{}>\n{}</svg>", open_tag, tail)));
    } else if let Some(at) = scan.root_end {
        edits.push((at, 0, tail));
    }

    edits.sort_by(|a, b| b.0.cmp(&a.0));
    let mut out = host.to_string();
    for (at, len, text) in edits {
        out.replace_range(at..at + len, &text);
    }
    Ok(out)
}
